//! python.org release index adapter
//!
//! Resolves the latest stable CPython release. Only entries named exactly
//! `Python X.Y.Z` count; pre-releases and release candidates are ignored.
//! API endpoint: https://www.python.org/api/v2/downloads/release/?is_published=true

use crate::domain::Registry;
use crate::error::FetchFailure;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// python.org release index URL
const PYTHON_RELEASES_URL: &str =
    "https://www.python.org/api/v2/downloads/release/?is_published=true";

/// Stable release names: `Python 3.13.1`
static STABLE_RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Python ((\d+)\.(\d+)\.(\d+))$").unwrap());

/// python.org release index adapter
pub struct PythonReleaseAdapter {
    client: HttpClient,
    url: String,
}

/// One release entry
#[derive(Debug, Deserialize)]
struct PythonRelease {
    #[serde(default)]
    name: String,
}

/// The index is a plain list; a paginated page wraps it in `results`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReleaseIndex {
    List(Vec<PythonRelease>),
    Page { results: Vec<PythonRelease> },
}

impl ReleaseIndex {
    fn into_releases(self) -> Vec<PythonRelease> {
        match self {
            ReleaseIndex::List(releases) | ReleaseIndex::Page { results: releases } => releases,
        }
    }
}

impl PythonReleaseAdapter {
    /// Create a new python.org adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_url(client, PYTHON_RELEASES_URL)
    }

    /// Create an adapter against a different index URL
    pub fn with_url(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

/// Pick the greatest `X.Y.Z` among release names of the form `Python X.Y.Z`
pub fn latest_stable_release<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<String> {
    names
        .into_iter()
        .filter_map(|name| {
            let caps = STABLE_RELEASE_RE.captures(name)?;
            let key = (
                caps[2].parse::<u64>().ok()?,
                caps[3].parse::<u64>().ok()?,
                caps[4].parse::<u64>().ok()?,
            );
            Some((key, caps[1].to_string()))
        })
        .max_by_key(|(key, _)| *key)
        .map(|(_, version)| version)
}

#[async_trait]
impl RegistryAdapter for PythonReleaseAdapter {
    fn registry(&self) -> Registry {
        Registry::PythonRuntime
    }

    async fn fetch_latest(&self, package: &str) -> Result<String, FetchFailure> {
        let index: ReleaseIndex = self
            .client
            .get_json(&self.url, package, self.registry_name())
            .await?;

        let releases = index.into_releases();
        latest_stable_release(releases.iter().map(|r| r.name.as_str()))
            .ok_or_else(|| FetchFailure::no_version(package, self.registry_name()))
    }
}
