use std::collections::TryReserveError;

use thiserror::Error;

/// Errors surfaced by registration, layout, and vertex building.
///
/// Malformed markup and missing glyphs never show up here: they are recovered
/// locally and reported through `log`.
#[derive(Debug, Error)]
pub enum TextError {
    /// Text referenced a font that is not registered and no `default` font exists.
    #[error("font not found: {name}")]
    FontNotFound { name: String },

    /// `register_font_alias` was called for a target that is not registered.
    #[error("cannot alias {alias:?}: target font {target:?} is not registered")]
    AliasTargetMissing { alias: String, target: String },

    /// Font data that cannot be registered as given.
    #[error("invalid font {name:?}: {reason}")]
    InvalidFont { name: String, reason: String },

    /// Growing a vertex or index buffer failed.
    #[error("buffer allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, TextError>;
