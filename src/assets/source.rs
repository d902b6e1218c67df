//! Where logo bytes come from.

use std::{collections::HashMap, future::Future, path::PathBuf};

use anyhow::Context;

use crate::foundation::error::{CheckinError, CheckinResult};

/// Asynchronous access to logo bytes by resource reference.
///
/// Implementations report failure as an error; the compositor turns any error into the
/// synthetic fallback.
pub trait LogoSource: Send + Sync {
    /// Fetch the raw bytes behind `resource`.
    fn fetch(&self, resource: &str) -> impl Future<Output = CheckinResult<Vec<u8>>> + Send;
}

/// Fetches `http(s)://` resources over the network and everything else from disk.
///
/// Relative paths resolve against `root`. `file://` prefixes are accepted.
#[derive(Clone, Debug)]
pub struct ResourceLogoSource {
    root: PathBuf,
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

impl ResourceLogoSource {
    /// Source resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            #[cfg(feature = "http")]
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_file(&self, path: &str) -> CheckinResult<Vec<u8>> {
        let path = self.root.join(path);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("read logo from '{}'", path.display()))?;
        Ok(bytes)
    }

    #[cfg(feature = "http")]
    async fn fetch_http(&self, url: &str) -> CheckinResult<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request logo '{url}'"))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CheckinError::validation(format!(
                "logo request '{url}' returned {status}"
            )));
        }
        let bytes = resp
            .bytes()
            .await
            .with_context(|| format!("read logo body '{url}'"))?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "http"))]
    async fn fetch_http(&self, url: &str) -> CheckinResult<Vec<u8>> {
        Err(CheckinError::validation(format!(
            "http logo '{url}' requested but the `http` feature is disabled"
        )))
    }
}

impl Default for ResourceLogoSource {
    fn default() -> Self {
        Self::new(".")
    }
}

impl LogoSource for ResourceLogoSource {
    async fn fetch(&self, resource: &str) -> CheckinResult<Vec<u8>> {
        let resource = resource.trim();
        if resource.starts_with("http://") || resource.starts_with("https://") {
            self.fetch_http(resource).await
        } else {
            let path = resource.strip_prefix("file://").unwrap_or(resource);
            self.fetch_file(path).await
        }
    }
}

/// In-memory logos keyed by resource string.
#[derive(Clone, Debug, Default)]
pub struct StaticLogoSource {
    entries: HashMap<String, Vec<u8>>,
}

impl StaticLogoSource {
    /// Empty source; every fetch fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `resource`.
    pub fn with(mut self, resource: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.entries.insert(resource.into(), bytes);
        self
    }
}

impl LogoSource for StaticLogoSource {
    async fn fetch(&self, resource: &str) -> CheckinResult<Vec<u8>> {
        self.entries
            .get(resource)
            .cloned()
            .ok_or_else(|| CheckinError::validation(format!("unknown logo resource '{resource}'")))
    }
}
