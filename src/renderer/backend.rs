use crate::texture_id::AtlasTexture;

use super::vertex::TextVertex;

/// Graphics primitives the batch renderer draws through.
///
/// Implementations wrap a real GPU API; [`RecordingBackend`] keeps the calls
/// in memory instead.
pub trait GraphicsBackend {
    /// Number of textures a single draw call can sample.
    fn max_texture_units(&self) -> usize;

    /// Activates the SDF text program for a draw using `texture_units` slots.
    fn bind_shader(&mut self, texture_units: usize);

    fn bind_texture(&mut self, unit: u32, texture: &AtlasTexture);

    /// Uploads the geometry of the next draw. `vertices[i].texture` is a unit index.
    fn bind_geometry(&mut self, vertices: &[TextVertex], indices: &[u32]);

    fn draw_indexed(&mut self, index_count: usize);
}

/// A draw call captured by [`RecordingBackend`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordedDraw {
    /// Bound textures, indexed by unit.
    pub textures: Vec<AtlasTexture>,
    pub vertices: Vec<TextVertex>,
    pub indices: Vec<u32>,
    pub index_count: usize,
}

/// Headless backend that records every draw.
#[derive(Debug)]
pub struct RecordingBackend {
    max_texture_units: usize,
    pending: RecordedDraw,
    pub draws: Vec<RecordedDraw>,
    pub shader_binds: usize,
}

impl RecordingBackend {
    /// Creates a backend reporting `max_texture_units` texture units.
    pub fn new(max_texture_units: usize) -> Self {
        Self {
            max_texture_units,
            pending: RecordedDraw::default(),
            draws: Vec::new(),
            shader_binds: 0,
        }
    }

    /// Drops everything recorded so far.
    pub fn clear(&mut self) {
        self.pending = RecordedDraw::default();
        self.draws.clear();
        self.shader_binds = 0;
    }
}

impl GraphicsBackend for RecordingBackend {
    fn max_texture_units(&self) -> usize {
        self.max_texture_units
    }

    fn bind_shader(&mut self, _texture_units: usize) {
        self.shader_binds += 1;
        self.pending.textures.clear();
    }

    fn bind_texture(&mut self, unit: u32, texture: &AtlasTexture) {
        let unit = unit as usize;
        if self.pending.textures.len() <= unit {
            self.pending.textures.resize(unit + 1, *texture);
        }
        self.pending.textures[unit] = *texture;
    }

    fn bind_geometry(&mut self, vertices: &[TextVertex], indices: &[u32]) {
        self.pending.vertices = vertices.to_vec();
        self.pending.indices = indices.to_vec();
    }

    fn draw_indexed(&mut self, index_count: usize) {
        let mut draw = std::mem::take(&mut self.pending);
        draw.index_count = index_count;
        self.pending.textures = draw.textures.clone();
        self.draws.push(draw);
    }
}
