use serde::Serialize;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build identity reported by `pkgmap version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Set when the build exports `PKGMAP_BUILD_GIT_HASH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_hash: Option<&'static str>,
}

#[must_use]
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: "pkgmap",
        version: VERSION,
        git_hash: option_env!("PKGMAP_BUILD_GIT_HASH"),
    }
}

/// One-line version, e.g. `pkgmap 0.1.0 (abc123)`.
#[must_use]
pub fn version_string() -> String {
    let info = version_info();
    match info.git_hash {
        Some(hash) => format!("{} {} ({hash})", info.name, info.version),
        None => format!("{} {}", info.name, info.version),
    }
}
