//! Render passes with stale-logo protection.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};

use crate::{
    assets::{
        logo::{LogoArt, LogoCompositor},
        source::LogoSource,
    },
    foundation::{
        config::EngineConfig,
        core::{CheckinIdentity, LocationId},
        error::{CheckinError, CheckinResult},
    },
    qr::{EccLevel, QrMatrix, checkin_url},
    render::{
        circular::{CircularRenderer, DotLayout, LayoutStats},
        surface::RenderSurface,
    },
    theme::Theme,
    token::TokenRotated,
};

/// Which artwork occupies the centre of a published surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogoState {
    /// Logo still loading; only the backing disc is drawn.
    Pending,
    /// A fetched raster logo.
    Image,
    /// The synthetic monogram.
    Monogram,
}

/// One published render result.
#[derive(Clone, Debug)]
pub struct RenderedQr {
    /// Pass that produced this result.
    pub generation: u64,
    /// Location the artifact belongs to.
    pub location_id: LocationId,
    /// Encoded check-in URL.
    pub payload: String,
    /// Symbol version of the encoded matrix.
    pub version: u8,
    /// Resolved colors.
    pub theme: Theme,
    /// Centre artwork state.
    pub logo: LogoState,
    /// Module drop accounting.
    pub stats: LayoutStats,
    /// The raster.
    pub surface: RenderSurface,
}

/// How the asynchronous logo step of a pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogoOutcome {
    /// The logo was composited and published.
    Applied,
    /// A newer pass started first; the result was discarded.
    Superseded,
}

/// Handle to an in-flight render pass.
#[derive(Debug)]
pub struct RenderPass {
    generation: u64,
    task: JoinHandle<CheckinResult<LogoOutcome>>,
}

impl RenderPass {
    /// Generation number of this pass.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the logo step.
    pub async fn finish(self) -> CheckinResult<LogoOutcome> {
        self.task
            .await
            .map_err(|e| CheckinError::render(format!("logo task failed: {e}")))?
    }
}

// Everything a pass captures at its start.
struct PreparedPass {
    generation: u64,
    identity: CheckinIdentity,
    payload: String,
    version: u8,
    theme: Theme,
    layout: DotLayout,
}

impl PreparedPass {
    fn result(&self, logo: LogoState, surface: RenderSurface) -> RenderedQr {
        RenderedQr {
            generation: self.generation,
            location_id: self.identity.location_id.clone(),
            payload: self.payload.clone(),
            version: self.version,
            theme: self.theme,
            logo,
            stats: self.layout.stats,
            surface,
        }
    }
}

struct Shared<S> {
    config: EngineConfig,
    renderer: CircularRenderer,
    logos: LogoCompositor<S>,
    generation: AtomicU64,
    latest: watch::Sender<Option<Arc<RenderedQr>>>,
}

impl<S> Shared<S> {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    // The generation check runs under the channel lock so a stale pass can never overwrite the
    // result of a newer one.
    fn publish_if_current(&self, rendered: Arc<RenderedQr>) -> bool {
        let generation = rendered.generation;
        let mut slot = Some(rendered);
        self.latest.send_if_modified(|cur| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *cur = slot.take();
            true
        })
    }
}

/// Drives render passes for one check-in display.
///
/// Each call to [`CheckinRenderer::render`] starts a new pass parameterized only by the inputs it
/// captured. The logo loads asynchronously; when it resolves after a newer pass has started, its
/// result is dropped.
pub struct CheckinRenderer<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for CheckinRenderer<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> std::fmt::Debug for CheckinRenderer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckinRenderer")
            .field("config", &self.shared.config)
            .field("generation", &self.shared.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<S: LogoSource + 'static> CheckinRenderer<S> {
    /// Renderer for `config`, loading logos through `source`.
    pub fn new(config: EngineConfig, source: S) -> CheckinResult<Self> {
        config.validate()?;
        let renderer = CircularRenderer::new(config.geometry)?;
        let (latest, _) = watch::channel(None);
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                renderer,
                logos: LogoCompositor::new(source),
                generation: AtomicU64::new(0),
                latest,
            }),
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Most recently published result.
    pub fn latest(&self) -> Option<Arc<RenderedQr>> {
        self.shared.latest.borrow().clone()
    }

    /// Watch published results.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<RenderedQr>>> {
        self.shared.latest.subscribe()
    }

    /// Start a pass: the dot field is painted and published synchronously, the logo is
    /// composited when it finishes loading.
    ///
    /// Encoding failures are returned here and nothing is published. Must be called from within
    /// a Tokio runtime.
    #[tracing::instrument(skip_all, fields(location = %identity.location_id))]
    pub fn render(&self, identity: &CheckinIdentity) -> CheckinResult<RenderPass> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| CheckinError::render("render passes need a tokio runtime"))?;
        let pass = self.prepare(identity)?;
        let generation = pass.generation;

        let base = self.shared.renderer.paint(&pass.layout, &pass.theme, None)?;
        self.shared
            .publish_if_current(Arc::new(pass.result(LogoState::Pending, base)));

        let shared = Arc::clone(&self.shared);
        let task = runtime.spawn(async move {
            let art = shared.logos.load(&pass.identity, &pass.theme).await;
            if !shared.is_current(pass.generation) {
                tracing::debug!(generation = pass.generation, "logo resolved for stale pass, discarding");
                return Ok(LogoOutcome::Superseded);
            }
            let surface = shared.renderer.paint(&pass.layout, &pass.theme, Some(&art))?;
            if shared.publish_if_current(Arc::new(pass.result(logo_state(&art), surface))) {
                Ok(LogoOutcome::Applied)
            } else {
                tracing::debug!(generation = pass.generation, "pass superseded while painting logo");
                Ok(LogoOutcome::Superseded)
            }
        });

        Ok(RenderPass { generation, task })
    }

    /// Run a whole pass, logo included, and return its result.
    ///
    /// The result is also published unless a newer pass started in the meantime.
    #[tracing::instrument(skip_all, fields(location = %identity.location_id))]
    pub async fn render_complete(&self, identity: &CheckinIdentity) -> CheckinResult<Arc<RenderedQr>> {
        let pass = self.prepare(identity)?;
        let art = self.shared.logos.load(&pass.identity, &pass.theme).await;
        let surface = self
            .shared
            .renderer
            .paint(&pass.layout, &pass.theme, Some(&art))?;
        let rendered = Arc::new(pass.result(logo_state(&art), surface));
        self.shared.publish_if_current(Arc::clone(&rendered));
        Ok(rendered)
    }

    /// Re-render `identity` with the new token every time its location's token rotates.
    ///
    /// The task ends when the rotation channel closes. Must be called from within a Tokio
    /// runtime.
    pub fn follow_rotations(
        &self,
        identity: CheckinIdentity,
        mut rotations: broadcast::Receiver<TokenRotated>,
    ) -> CheckinResult<JoinHandle<()>> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| CheckinError::render("following rotations needs a tokio runtime"))?;
        let this = self.clone();
        Ok(runtime.spawn(async move {
            let mut identity = identity;
            loop {
                match rotations.recv().await {
                    Ok(ev) if ev.location_id == identity.location_id => {
                        identity = identity.with_token(ev.token);
                        if let Err(err) = this.render(&identity) {
                            tracing::warn!(error = %err, "re-render after token rotation failed");
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "missed token rotation events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }))
    }

    fn prepare(&self, identity: &CheckinIdentity) -> CheckinResult<PreparedPass> {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cfg = &self.shared.config;

        let payload = checkin_url(&cfg.app_origin, &identity.checkin_token)?;
        let matrix = QrMatrix::generate(&payload, EccLevel::H)?;
        let theme = Theme::for_identity(identity, cfg.fallback_primary());
        let layout = self.shared.renderer.layout(&matrix, cfg.surface_size)?;

        Ok(PreparedPass {
            generation,
            identity: identity.clone(),
            payload,
            version: matrix.version(),
            theme,
            layout,
        })
    }
}

fn logo_state(art: &LogoArt) -> LogoState {
    match art {
        LogoArt::Image(_) => LogoState::Image,
        LogoArt::Monogram(_) => LogoState::Monogram,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
