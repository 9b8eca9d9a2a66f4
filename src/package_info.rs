/*============================================================
  Bundlescope
  Module: bundlescope::package_info
  ------------------------------------------------------------
  Purpose:
    The normalized bundle-size record served to callers, and
    the strict schema of the upstream size report it is
    projected from.

  Security / Safety Notes:
    Pure data container; no I/O performed in this module.

  Dependencies:
    serde for both directions of the JSON contract.

  Revision History:
    2026-10-16  Introduced PackageBundleInfo projection.
============================================================*/

use serde::{Deserialize, Serialize};

/// Normalized bundle-size data for one package version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageBundleInfo {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    /// Minified size in bytes.
    pub size: u64,
    /// Minified + gzipped size in bytes.
    pub gzip: u64,
    pub dependency_count: u64,
    #[serde(rename = "hasJSModule")]
    pub has_js_module: bool,
    #[serde(rename = "hasJSNext")]
    pub has_js_next: bool,
    pub has_side_effects: bool,
    pub repository: Option<String>,
    pub scoped: Option<bool>,
}

/// Size report as returned by the upstream service. Required fields must be
/// present, otherwise deserialization fails and the payload is rejected.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPackage {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub size: u64,
    pub gzip: u64,
    pub dependency_count: u64,
    #[serde(rename = "hasJSModule")]
    pub has_js_module: Marker,
    #[serde(rename = "hasJSNext")]
    pub has_js_next: Marker,
    pub has_side_effects: Marker,
    pub repository: Option<UpstreamRepository>,
    pub scoped: Option<bool>,
}

/// Flag fields the service reports either as booleans, as an entry-point
/// path (`"dist/index.mjs"`), or as a list of globs (`sideEffects`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Marker {
    Flag(bool),
    Path(String),
    Globs(Vec<String>),
}

impl Marker {
    pub fn is_set(&self) -> bool {
        match self {
            Marker::Flag(flag) => *flag,
            Marker::Path(path) => !path.is_empty(),
            Marker::Globs(globs) => !globs.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UpstreamRepository {
    Url(String),
    Object { url: Option<String> },
}

impl UpstreamRepository {
    fn url(&self) -> Option<&str> {
        match self {
            UpstreamRepository::Url(url) => Some(url),
            UpstreamRepository::Object { url } => url.as_deref(),
        }
    }
}

impl UpstreamPackage {
    /// Project the upstream report onto the served shape.
    pub fn into_bundle_info(self) -> PackageBundleInfo {
        let repository = self
            .repository
            .as_ref()
            .and_then(UpstreamRepository::url)
            .and_then(clean_repository_url);
        let scoped = self.scoped.or_else(|| Some(is_scoped(&self.name)));

        PackageBundleInfo {
            description: self.description,
            size: self.size,
            gzip: self.gzip,
            dependency_count: self.dependency_count,
            has_js_module: self.has_js_module.is_set(),
            has_js_next: self.has_js_next.is_set(),
            has_side_effects: self.has_side_effects.is_set(),
            repository,
            scoped,
            name: self.name,
            version: self.version,
        }
    }
}

/// Strip a leading `git+` and a trailing `.git`; empty results are dropped.
pub fn clean_repository_url(raw: &str) -> Option<String> {
    let url = raw.strip_prefix("git+").unwrap_or(raw);
    let url = url.strip_suffix(".git").unwrap_or(url);
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// `@scope/name` packages.
pub fn is_scoped(name: &str) -> bool {
    name.strip_prefix('@')
        .and_then(|rest| rest.split_once('/'))
        .map(|(scope, pkg)| !scope.is_empty() && !pkg.is_empty())
        .unwrap_or(false)
}
