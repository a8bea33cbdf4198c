/// Graphics primitives consumed by the batcher.
pub mod backend;
/// Cross-object batching under a texture unit budget.
pub mod batch;
pub mod vertex;

pub use backend::{GraphicsBackend, RecordedDraw, RecordingBackend};
pub use batch::{BatchConfig, BatchCursor, BatchRenderer, FlushStats, PackStep, SlotTable};
pub use vertex::{TextVertex, VertexBuffer, WorldTransform, pack_color};
