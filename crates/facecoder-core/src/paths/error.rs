use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to locate or prepare the data directory.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("No platform data directory and {env} is not set", env = super::DATA_DIR_ENV)]
    NoDataDir,

    #[error("Cannot create {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
