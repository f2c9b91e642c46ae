use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FocusError {
    #[error("SELECT A NODE FIRST TO FOCUS")]
    NoActiveNode,
    #[error("Unknown node: {0}")]
    UnknownNode(String),
}

#[derive(Error, Debug)]
pub enum RepairError {
    #[error("Failed to encode mask: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to serialize repair request: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No mask to export")]
    NoMask,
    #[error("Node has no local file to export next to")]
    NoLocalPath,
    #[error("Failed to encode mask: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
