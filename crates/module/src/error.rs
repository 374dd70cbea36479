use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModuleError>;

#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory '{0}' is not a go module")]
    NotAModule(PathBuf),
}

impl ModuleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
