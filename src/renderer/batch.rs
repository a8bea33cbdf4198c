use std::ops::Range;

use fxhash::FxHashMap;

use crate::{
    error::Result,
    texture_id::{AtlasTexture, TextureId},
};

use super::{
    backend::GraphicsBackend,
    vertex::{INDICES_PER_GLYPH, TextVertex, VERTICES_PER_GLYPH, VertexBuffer},
};

/// Configuration for [`BatchRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Upper bound on textures per draw; the backend's own limit may be lower.
    pub max_textures: usize,
    /// Draw every object on its own, even when it could share a draw call.
    pub force_single_object_batches: bool,
    /// Queued vertices beyond this trigger a flush before the next object is added.
    pub max_batch_vertices: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_textures: 16,
            force_single_object_batches: false,
            max_batch_vertices: 65_536,
        }
    }
}

/// Ordered texture → unit assignment for one draw call.
pub struct SlotTable {
    capacity: usize,
    slots: Vec<AtlasTexture>,
    lookup: FxHashMap<TextureId, u32>,
    /// Consecutive glyphs usually share an atlas page.
    last: Option<(TextureId, u32)>,
}

impl SlotTable {
    /// Creates a table holding at most `capacity` textures (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            slots: Vec::new(),
            lookup: FxHashMap::default(),
            last: None,
        }
    }

    /// Returns the unit of `texture`, assigning the next free one if needed.
    /// `None` means the table is full and `texture` is not in it.
    pub fn slot_for(&mut self, texture: AtlasTexture) -> Option<u32> {
        if let Some((id, slot)) = self.last
            && id == texture.id
        {
            return Some(slot);
        }

        let slot = match self.lookup.get(&texture.id) {
            Some(&slot) => slot,
            None => {
                if self.slots.len() >= self.capacity {
                    return None;
                }
                let slot = self.slots.len() as u32;
                self.slots.push(texture);
                self.lookup.insert(texture.id, slot);
                slot
            }
        };

        self.last = Some((texture.id, slot));
        Some(slot)
    }

    /// Empties the table for the next draw.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.lookup.clear();
        self.last = None;
    }

    fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.reset();
    }

    /// Textures in unit order.
    pub fn slots(&self) -> &[AtlasTexture] {
        &self.slots
    }

    /// Number of assigned slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Checks if no slot is assigned.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Position of the packer inside the queue.
///
/// `offset` is the vertex offset inside the current object where packing
/// resumes after a mid-object split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchCursor {
    pub object: usize,
    pub offset: usize,
}

/// Outcome of a [`BatchRenderer::pack`] step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackStep {
    /// The current object was fully appended; the cursor moved to the next one.
    Consumed,
    /// The texture budget ran out. The pending draw must be issued and the same
    /// object packed again from the cursor.
    Split,
    /// Every queued object has been packed.
    Done,
}

/// Counters for a single flush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub draw_calls: usize,
    pub vertices: usize,
    pub splits: usize,
}

/// Merges the vertex buffers of many text objects into as few draw calls as
/// the texture unit budget allows.
///
/// Objects are drawn in the order they were queued.
pub struct BatchRenderer {
    config: BatchConfig,

    input: Vec<TextVertex>,
    queue: Vec<Range<usize>>,
    textures: FxHashMap<TextureId, AtlasTexture>,

    output: Vec<TextVertex>,
    indices: Vec<u32>,
    slots: SlotTable,
}

impl Default for BatchRenderer {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}

impl BatchRenderer {
    /// Creates an empty batch renderer.
    pub fn new(config: BatchConfig) -> Self {
        let slots = SlotTable::new(config.max_textures);
        Self {
            config,
            input: Vec::new(),
            queue: Vec::new(),
            textures: FxHashMap::default(),
            output: Vec::new(),
            indices: Vec::new(),
            slots,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Replaces the configuration. Already queued objects are kept.
    pub fn set_config(&mut self, config: BatchConfig) {
        self.config = config;
    }

    /// Texture budget for draws on `backend`.
    pub fn texture_cap<B: GraphicsBackend + ?Sized>(&self, backend: &B) -> usize {
        backend
            .max_texture_units()
            .min(self.config.max_textures)
            .max(1)
    }

    /// Queues an object's vertex buffer for the next flush.
    pub fn push<B: GraphicsBackend + ?Sized>(
        &mut self,
        buffer: &VertexBuffer,
        backend: &mut B,
    ) -> Result<()> {
        self.push_vertices(buffer.vertices(), buffer.textures(), backend)
    }

    /// Queues raw vertices; `textures` must cover every texture id they use.
    ///
    /// When the batch already holds `max_batch_vertices`, it is flushed first.
    pub fn push_vertices<B: GraphicsBackend + ?Sized>(
        &mut self,
        vertices: &[TextVertex],
        textures: &FxHashMap<TextureId, AtlasTexture>,
        backend: &mut B,
    ) -> Result<()> {
        if vertices.is_empty() {
            return Ok(());
        }

        if !self.queue.is_empty()
            && self.input.len() + vertices.len() > self.config.max_batch_vertices
        {
            self.flush(backend)?;
        }

        self.input.try_reserve(vertices.len())?;
        let start = self.input.len();
        self.input.extend_from_slice(vertices);
        self.queue.push(start..self.input.len());
        self.textures
            .extend(textures.iter().map(|(id, texture)| (*id, *texture)));
        Ok(())
    }

    /// Number of objects waiting for the next flush.
    pub fn queued_objects(&self) -> usize {
        self.queue.len()
    }

    /// Size of the queued vertex data in bytes.
    pub fn queued_bytes(&self) -> usize {
        self.input.len() * std::mem::size_of::<TextVertex>()
    }

    /// Checks if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Prepares for a packing run with at most `texture_cap` textures per draw.
    pub fn begin(&mut self, texture_cap: usize) {
        self.slots.set_capacity(texture_cap);
        self.output.clear();
    }

    /// Appends glyphs of the object at `cursor` to the pending draw until the
    /// object ends or a new texture no longer fits the slot table.
    ///
    /// After [`PackStep::Split`] the caller issues the pending draw (see
    /// [`Self::take_draw`]) and calls `pack` again with the same cursor.
    pub fn pack(&mut self, cursor: &mut BatchCursor) -> Result<PackStep> {
        let Some(range) = self.queue.get(cursor.object).cloned() else {
            return Ok(PackStep::Done);
        };

        let mut offset = range.start + cursor.offset;
        self.output.try_reserve(range.end - offset)?;

        while offset < range.end {
            let quad_end = (offset + VERTICES_PER_GLYPH).min(range.end);
            let raw = TextureId::new(self.input[offset].texture);

            let Some(&texture) = self.textures.get(&raw) else {
                log::error!("No atlas texture registered for id {}; glyph dropped.", raw.raw());
                offset = quad_end;
                continue;
            };

            let Some(slot) = self.slots.slot_for(texture) else {
                cursor.offset = offset - range.start;
                return Ok(PackStep::Split);
            };

            for vertex in &self.input[offset..quad_end] {
                self.output.push(TextVertex {
                    texture: slot,
                    ..*vertex
                });
            }
            offset = quad_end;
        }

        cursor.object += 1;
        cursor.offset = 0;
        Ok(PackStep::Consumed)
    }

    /// Vertices of the pending draw, with texture fields holding unit indices.
    pub fn pending_vertices(&self) -> &[TextVertex] {
        &self.output
    }

    /// Textures of the pending draw in unit order.
    pub fn pending_textures(&self) -> &[AtlasTexture] {
        self.slots.slots()
    }

    /// Issues the pending draw on `backend` and starts a new one.
    /// Returns the number of vertices drawn.
    pub fn take_draw<B: GraphicsBackend + ?Sized>(&mut self, backend: &mut B) -> Result<usize> {
        if self.output.is_empty() {
            self.slots.reset();
            return Ok(0);
        }

        let glyphs = self.output.len().div_ceil(VERTICES_PER_GLYPH);
        let index_count = glyphs * INDICES_PER_GLYPH;
        self.ensure_indices(glyphs)?;

        backend.bind_shader(self.slots.capacity());
        for (unit, texture) in self.slots.slots().iter().enumerate() {
            backend.bind_texture(unit as u32, texture);
        }
        backend.bind_geometry(&self.output, &self.indices[..index_count]);
        backend.draw_indexed(index_count);

        let drawn = self.output.len();
        self.output.clear();
        self.slots.reset();
        Ok(drawn)
    }

    fn ensure_indices(&mut self, glyphs: usize) -> Result<()> {
        let have = self.indices.len() / INDICES_PER_GLYPH;
        if glyphs <= have {
            return Ok(());
        }

        let target = glyphs.next_power_of_two();
        self.indices
            .try_reserve_exact(target * INDICES_PER_GLYPH - self.indices.len())?;
        for glyph in have..target {
            let base = (glyph * VERTICES_PER_GLYPH) as u32;
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Ok(())
    }

    /// Draws everything queued this frame and clears the queue.
    pub fn flush<B: GraphicsBackend + ?Sized>(&mut self, backend: &mut B) -> Result<FlushStats> {
        let mut stats = FlushStats::default();
        if self.queue.is_empty() {
            return Ok(stats);
        }

        self.begin(self.texture_cap(backend));
        let mut cursor = BatchCursor::default();

        let result = loop {
            match self.pack(&mut cursor) {
                Ok(PackStep::Done) => break Ok(()),
                Ok(PackStep::Split) => {
                    log::debug!(
                        "Texture budget of {} exhausted; splitting object {} at vertex {}.",
                        self.slots.capacity(),
                        cursor.object,
                        cursor.offset
                    );
                    stats.splits += 1;
                    if let Err(e) = self.record_draw(backend, &mut stats) {
                        break Err(e);
                    }
                }
                Ok(PackStep::Consumed) => {
                    if self.config.force_single_object_batches
                        && let Err(e) = self.record_draw(backend, &mut stats)
                    {
                        break Err(e);
                    }
                }
                Err(e) => break Err(e),
            }
        };

        let result = result.and_then(|()| self.record_draw(backend, &mut stats));

        self.input.clear();
        self.queue.clear();
        self.textures.clear();
        self.output.clear();
        self.slots.reset();

        result.map(|()| stats)
    }

    /// Flushes pending text right now so that draws issued afterwards by other
    /// renderers land on top of it.
    pub fn flush_barrier<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<FlushStats> {
        self.flush(backend)
    }

    fn record_draw<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        stats: &mut FlushStats,
    ) -> Result<()> {
        let drawn = self.take_draw(backend)?;
        if drawn > 0 {
            stats.draw_calls += 1;
            stats.vertices += drawn;
        }
        Ok(())
    }
}
