use std::path::PathBuf;

/// Failures while building a catalog from a directory.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("media directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Rejections of a detached-presentation request. These are logged and
/// otherwise ignored by the grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetachError {
    #[error("detached presentation is not supported")]
    Unsupported,

    #[error("tile {0} has no playable stream")]
    StreamUnavailable(usize),

    #[error("detached presentation host is unavailable: {0}")]
    HostUnavailable(String),
}
