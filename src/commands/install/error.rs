use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Target directory does not exist: {0}")]
    TargetMissing(PathBuf),

    #[error("--target-dir is required in non-interactive mode")]
    TargetRequired,

    #[error("Cannot write to directory {path}: {source}")]
    TargetNotWritable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Existing settings file {path} is not valid JSON: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to install hook binary to {path}: {source}")]
    InstallBinary {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to locate the running executable: {0}")]
    CurrentExe(std::io::Error),
}
