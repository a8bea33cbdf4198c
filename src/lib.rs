//! # Fude
//!
//! Rich-text layout and batched SDF text rendering for Rust.
//!
//! ## Overview
//!
//! `Fude` turns markup strings such as `"[color=#FF0000]red[/color] plain"` into
//! word-wrapped, aligned glyph quads sampled from signed distance field atlases,
//! and merges the quads of many text objects into as few draw calls as the
//! graphics backend's texture units allow.
//!
//! The core of the library is the [`TextSystem`], which owns the font registry,
//! the record pools and the batch renderer.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use fude::{TextObject, TextSystem, text::TextStyle, renderer::RecordingBackend};
//! # fn fonts() -> (fude::font_registry::FontData, Vec<fude::texture_id::AtlasTexture>) { unimplemented!() }
//!
//! // 1. Create a TextSystem and register fonts loaded elsewhere.
//! let system = TextSystem::new();
//! let (data, pages) = fonts();
//! system.register_font(data, &pages, Some("default")).unwrap();
//!
//! // 2. Create text objects.
//! let mut label = TextObject::new("Hello [size=48]world[/size]", Arc::new(TextStyle::default()));
//! label.set_wrap_width(Some(320.0));
//!
//! // 3. Queue them every frame and flush.
//! let mut backend = RecordingBackend::new(16);
//! system.render(&mut label, &mut backend).unwrap();
//! system.flush(&mut backend).unwrap();
//! ```
//!
//! ## Features
//!
//! *   **Markup**: nested `font`, `color`, `size`, `scale`, `align` and spacing tags.
//! *   **Layout**: word wrapping, kerning, mixed sizes on a shared baseline, justification.
//! *   **Batching**: texture slot tables with mid-object splits, ordering preserved.
//! *   **Thread Safety**: the system uses internal locking for shared access.

pub mod error;
pub mod font_registry;
pub mod renderer;
pub mod text;
pub mod text_object;
pub mod text_system;
pub mod texture_id;

// common re-exports
pub use error::{Result, TextError};
pub use font_registry::{FontEntry, FontRegistry};
pub use text_object::{DirtyFlags, TextObject};
pub use text_system::TextSystem;
pub use texture_id::{AtlasTexture, TextureId};

// re-export dependencies
pub use euclid;
pub use parking_lot;
