//! Error type for the fallible edges of the renderer: file I/O, texture
//! decoding, settings parsing and mesh validation. The per-frame pipeline
//! itself never fails; it skips what it cannot draw.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("settings parse error: {0}")]
    SettingsParse(#[from] ron::error::SpannedError),

    #[error("settings serialize error: {0}")]
    SettingsSerialize(#[from] ron::Error),

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
