use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pkgmap operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read manifest at {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid subpath map value at {pointer}: expected string, null, array or object, found {found}")]
    InvalidSubpathMap { pointer: String, found: &'static str },
}

impl Error {
    /// Stable machine-readable code used by the CLI's JSON envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ManifestRead { .. } => "MANIFEST_NOT_FOUND",
            Self::ManifestParse { .. } => "MANIFEST_INVALID",
            Self::InvalidSubpathMap { .. } => "SUBPATH_MAP_INVALID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_subpath_map_message() {
        let err = Error::InvalidSubpathMap {
            pointer: "/exports/./feature".to_string(),
            found: "number",
        };
        let msg = err.to_string();
        assert!(msg.contains("/exports/./feature"));
        assert!(msg.contains("number"));
        assert_eq!(err.code(), "SUBPATH_MAP_INVALID");
    }

    #[test]
    fn test_manifest_read_code() {
        let err = Error::ManifestRead {
            path: PathBuf::from("/nope/package.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.code(), "MANIFEST_NOT_FOUND");
        assert!(err.to_string().contains("/nope/package.json"));
    }
}
