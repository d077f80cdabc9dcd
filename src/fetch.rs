//! Download-and-cache resolution of the renderer executable

use crate::{Error, Result};
use headless_chrome::browser::fetcher::{Fetcher, FetcherOptions};
use log::info;
use std::path::{Path, PathBuf};

/// Download the given renderer revision and return its executable path
///
/// Already-downloaded revisions are reused from the cache. The cache
/// directory is honored only when it exists (canonicalized, the fetcher
/// expects an absolute path); otherwise the fetcher's default location is
/// used.
pub(crate) fn fetch_renderer(revision: &str, dir: Option<&Path>) -> Result<PathBuf> {
    if revision.is_empty() {
        return Err(Error::ConfigError(
            "no renderer revision specified for download".to_string(),
        ));
    }

    let install_dir = dir.and_then(|d| d.canonicalize().ok()).filter(|d| d.is_dir());

    info!("fetching renderer revision {}", revision);
    let options = FetcherOptions::default()
        .with_revision(revision.to_string())
        .with_install_dir(install_dir)
        .with_allow_download(true);

    Fetcher::new(options)
        .fetch()
        .map_err(|e| Error::ConfigError(format!("failed to fetch revision {}: {}", revision, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_revision_is_rejected() {
        assert!(matches!(
            fetch_renderer("", None),
            Err(Error::ConfigError(_))
        ));
    }
}
