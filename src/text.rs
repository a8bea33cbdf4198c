/// Line breaking, wrapping and glyph placement.
pub mod layout;
/// Inline markup parsing.
pub mod markup;
/// Reusable character and line records.
pub mod pool;
/// Style records and alignment.
pub mod style;

pub use layout::{CharRecord, LayoutConfig, LayoutMetrics, LineRecord, layout_text};
pub use markup::parse_markup;
pub use pool::{RecordPool, RecordPools, Recycle};
pub use style::{Align, TextStyle};
