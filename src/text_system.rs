use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::{
    error::Result,
    font_registry::{FontData, FontEntry, FontRegistry},
    renderer::{
        backend::GraphicsBackend,
        batch::{BatchConfig, BatchRenderer, FlushStats},
    },
    text::{LayoutMetrics, RecordPools},
    text_object::TextObject,
    texture_id::AtlasTexture,
};

/// High-level entry point for the text rendering system.
///
/// Owns the font registry, the record pools and the batch renderer, and
/// drives [`TextObject`]s through layout, vertex building and batching.
///
/// The registry sits behind an `RwLock` since it is written only while fonts
/// are registered. The fields are public to allow direct access when a caller
/// needs to hold a lock across several calls.
pub struct TextSystem {
    pub registry: RwLock<FontRegistry>,
    pub pools: Mutex<RecordPools>,
    pub batch: Mutex<BatchRenderer>,
}

impl Default for TextSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSystem {
    /// Creates a system with the default batch configuration.
    pub fn new() -> Self {
        Self::with_config(BatchConfig::default())
    }

    /// Creates a system with an explicit batch configuration.
    pub fn with_config(config: BatchConfig) -> Self {
        Self {
            registry: RwLock::new(FontRegistry::new()),
            pools: Mutex::new(RecordPools::new()),
            batch: Mutex::new(BatchRenderer::new(config)),
        }
    }

    /// Returns a copy of the batch configuration.
    pub fn batch_config(&self) -> BatchConfig {
        self.batch.lock().config().clone()
    }

    /// Replaces the batch configuration.
    pub fn set_batch_config(&self, config: BatchConfig) {
        self.batch.lock().set_config(config);
    }
}

/// font registration
impl TextSystem {
    /// Registers a font and its atlas pages. See [`FontRegistry::register_font`].
    pub fn register_font(
        &self,
        data: FontData,
        textures: &[AtlasTexture],
        name: Option<&str>,
    ) -> Result<Arc<FontEntry>> {
        self.registry.write().register_font(data, textures, name)
    }

    /// Makes `alias` resolve to the font registered as `target`.
    pub fn register_font_alias(&self, alias: &str, target: &str) -> Result<()> {
        self.registry.write().register_font_alias(alias, target)
    }

    /// Exact font lookup without fallback.
    pub fn font(&self, name: &str) -> Option<Arc<FontEntry>> {
        self.registry.read().font(name)
    }

    /// Checks if `name` is registered.
    pub fn contains_font(&self, name: &str) -> bool {
        self.registry.read().contains(name)
    }
}

/// layout
impl TextSystem {
    /// Lays out `object` if stale and returns its box size.
    pub fn measure(&self, object: &mut TextObject) -> Result<[f32; 2]> {
        let registry = self.registry.read();
        object.size(&registry, &mut self.pools.lock())
    }

    /// Lays out `object` if stale and returns its metrics.
    pub fn layout(&self, object: &mut TextObject) -> Result<LayoutMetrics> {
        let registry = self.registry.read();
        object.update_layout(&registry, &mut self.pools.lock())?;
        Ok(*object.metrics())
    }
}

/// rendering
impl TextSystem {
    /// Brings `object` up to date and queues it for the next flush.
    ///
    /// Invisible, fully transparent and zero-width objects are skipped.
    /// Returns whether the object was queued.
    pub fn render<B: GraphicsBackend + ?Sized>(
        &self,
        object: &mut TextObject,
        backend: &mut B,
    ) -> Result<bool> {
        if !object.visible() || object.alpha() <= 0.0 {
            return Ok(false);
        }

        let registry = self.registry.read();
        let mut pools = self.pools.lock();

        let [width, _] = object.size(&registry, &mut pools)?;
        if width <= 0.0 {
            return Ok(false);
        }

        let buffer = object.update_vertices(&registry, &mut pools)?;
        if buffer.is_empty() {
            return Ok(false);
        }

        self.batch.lock().push(buffer, backend)?;
        Ok(true)
    }

    /// Draws every object queued since the last flush.
    pub fn flush<B: GraphicsBackend + ?Sized>(&self, backend: &mut B) -> Result<FlushStats> {
        self.batch.lock().flush(backend)
    }

    /// Forces pending text out before the caller issues unrelated draws that
    /// must land on top of it.
    pub fn flush_barrier<B: GraphicsBackend + ?Sized>(&self, backend: &mut B) -> Result<FlushStats> {
        self.batch.lock().flush_barrier(backend)
    }

    /// Returns the object's records to the shared pools.
    pub fn destroy(&self, mut object: TextObject) {
        object.release(&mut self.pools.lock());
    }
}
