use crate::foundation::error::{CheckinError, CheckinResult};

/// Module count of the smallest standard symbol (version 1).
pub const MIN_MODULE_COUNT: usize = 21;

/// QR error-correction level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EccLevel {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery. The circular renderer drops modules and relies on this budget.
    #[default]
    H,
}

impl EccLevel {
    fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            EccLevel::L => qrcode::EcLevel::L,
            EccLevel::M => qrcode::EcLevel::M,
            EccLevel::Q => qrcode::EcLevel::Q,
            EccLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Immutable square grid of dark/light modules, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct QrMatrix {
    module_count: usize,
    version: u8,
    ecc: EccLevel,
    dark: Vec<bool>,
}

impl QrMatrix {
    /// Encode `payload` into the smallest symbol version that fits at `ecc`.
    ///
    /// Fails with [`CheckinError::Encode`] when the payload does not fit even the largest
    /// standard version.
    #[tracing::instrument(skip(payload), fields(payload_len = payload.len()))]
    pub fn generate(payload: &str, ecc: EccLevel) -> CheckinResult<Self> {
        let code = qrcode::QrCode::with_error_correction_level(payload.as_bytes(), ecc.to_qrcode())
            .map_err(|e| {
                CheckinError::encode(format!(
                    "payload of {} bytes cannot be encoded at level {ecc:?}: {e}",
                    payload.len()
                ))
            })?;

        let version = match code.version() {
            qrcode::Version::Normal(v) => u8::try_from(v)
                .map_err(|_| CheckinError::encode(format!("unexpected symbol version {v}")))?,
            qrcode::Version::Micro(v) => {
                return Err(CheckinError::encode(format!(
                    "encoder produced a micro symbol (M{v})"
                )));
            }
        };

        let module_count = code.width();
        let dark: Vec<bool> = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        if dark.len() != module_count * module_count {
            return Err(CheckinError::encode("encoder returned a non-square module grid"));
        }

        tracing::debug!(version, module_count, "encoded check-in payload");
        Ok(Self {
            module_count,
            version,
            ecc,
            dark,
        })
    }

    /// Build a matrix from explicit module rows. Used for tooling and tests.
    pub fn from_rows(rows: &[Vec<bool>]) -> CheckinResult<Self> {
        let n = rows.len();
        if n == 0 || rows.iter().any(|r| r.len() != n) {
            return Err(CheckinError::validation("module rows must form a non-empty square"));
        }
        Ok(Self {
            module_count: n,
            version: 0,
            ecc: EccLevel::H,
            dark: rows.iter().flatten().copied().collect(),
        })
    }

    /// Side length `N` in modules.
    pub fn module_count(&self) -> usize {
        self.module_count
    }

    /// Symbol version (1..=40), or 0 for hand-built matrices.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Error-correction level the symbol was encoded at.
    pub fn ecc(&self) -> EccLevel {
        self.ecc
    }

    /// Whether the module at `(row, col)` is dark. Out-of-range reads are light.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        if row >= self.module_count || col >= self.module_count {
            return false;
        }
        self.dark[row * self.module_count + col]
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.dark.iter().filter(|d| **d).count()
    }
}

impl std::fmt::Debug for QrMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrMatrix")
            .field("module_count", &self.module_count)
            .field("version", &self.version)
            .field("ecc", &self.ecc)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/qr/matrix.rs"]
mod tests;
