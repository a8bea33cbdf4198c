use bytemuck::{Pod, Zeroable};
use euclid::{Point2D, Transform2D, UnknownUnit};
use fxhash::FxHashMap;

use crate::{
    error::Result,
    text::CharRecord,
    texture_id::{AtlasTexture, TextureId},
};

pub const VERTICES_PER_GLYPH: usize = 4;
pub const INDICES_PER_GLYPH: usize = 6;

/// Interleaved vertex consumed by the SDF text shader.
///
/// `texture` holds the raw [`TextureId`] in per-object buffers and the
/// texture unit slot in the batch renderer's output.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    /// Distance-field smoothing band for one screen pixel.
    pub aa_width: f32,
    pub thickness: f32,
    pub texture: u32,
    /// RGBA8, red in the low byte.
    pub color: u32,
}

/// Packs a `0xRRGGBB` tint and an alpha in `[0, 1]` into RGBA8.
pub fn pack_color(tint: u32, alpha: f32) -> u32 {
    let r = (tint >> 16) & 0xFF;
    let g = (tint >> 8) & 0xFF;
    let b = tint & 0xFF;
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u32;
    r | (g << 8) | (b << 16) | (a << 24)
}

/// Object-to-world transform plus alpha, with a change counter.
///
/// Every mutation bumps `version`, which is how vertex buffers notice they are
/// stale without comparing matrices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldTransform {
    matrix: Transform2D<f32, UnknownUnit, UnknownUnit>,
    alpha: f32,
    version: u64,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self {
            matrix: Transform2D::identity(),
            alpha: 1.0,
            version: 0,
        }
    }
}

impl WorldTransform {
    /// Creates a transform at version 0.
    pub fn new(matrix: Transform2D<f32, UnknownUnit, UnknownUnit>, alpha: f32) -> Self {
        Self {
            matrix,
            alpha,
            version: 0,
        }
    }

    /// Object-to-world matrix.
    pub fn matrix(&self) -> &Transform2D<f32, UnknownUnit, UnknownUnit> {
        &self.matrix
    }

    /// World alpha in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Bumped by every effective change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces the matrix; the version only moves if it differs.
    pub fn set_matrix(&mut self, matrix: Transform2D<f32, UnknownUnit, UnknownUnit>) {
        if self.matrix != matrix {
            self.matrix = matrix;
            self.version = self.version.wrapping_add(1);
        }
    }

    /// Replaces the alpha; the version only moves if it differs.
    pub fn set_alpha(&mut self, alpha: f32) {
        if self.alpha != alpha {
            self.alpha = alpha;
            self.version = self.version.wrapping_add(1);
        }
    }

    /// Mean length of the transformed unit axes.
    pub fn average_scale(&self) -> f32 {
        let m = &self.matrix;
        let sx = (m.m11 * m.m11 + m.m12 * m.m12).sqrt();
        let sy = (m.m21 * m.m21 + m.m22 * m.m22).sqrt();
        (sx + sy) / 2.0
    }
}

/// Per-object vertex storage with dirty tracking.
#[derive(Default)]
pub struct VertexBuffer {
    vertices: Vec<TextVertex>,
    textures: FxHashMap<TextureId, AtlasTexture>,
    built_version: Option<u64>,
}

impl VertexBuffer {
    /// Creates an empty buffer that builds on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the quads of every visible glyph in `chars`.
    ///
    /// Nothing happens unless `text_dirty` is set or `transform` changed since
    /// the previous build. Returns whether the buffer was rebuilt.
    pub fn build(
        &mut self,
        chars: &[CharRecord],
        transform: &WorldTransform,
        text_dirty: bool,
    ) -> Result<bool> {
        if !text_dirty && self.built_version == Some(transform.version()) {
            return Ok(false);
        }

        self.vertices.clear();
        self.textures.clear();
        self.built_version = Some(transform.version());

        if chars.is_empty() {
            return Ok(true);
        }

        let visible = chars.iter().filter(|ch| ch.is_visible()).count();
        self.reserve(visible * VERTICES_PER_GLYPH)?;

        let matrix = transform.matrix();
        let world_scale = transform.average_scale();
        let alpha = transform.alpha();

        for ch in chars.iter().filter(|ch| ch.is_visible()) {
            let Some(texture) = ch.texture else {
                continue;
            };
            self.textures.insert(texture.id, texture);

            let band = ch.distance * ch.scale * world_scale;
            let aa_width = if band > 0.0 { (1.0 / band).min(0.5) } else { 0.5 };
            let color = pack_color(ch.tint, alpha);
            let shear = ch.style.slant * ch.height;

            let (x0, y0) = (ch.x, ch.y);
            let (x1, y1) = (ch.x + ch.width, ch.y + ch.height);
            let corners = [
                (Point2D::new(x0 + shear, y0), [ch.uv.min.x, ch.uv.min.y]),
                (Point2D::new(x1 + shear, y0), [ch.uv.max.x, ch.uv.min.y]),
                (Point2D::new(x1, y1), [ch.uv.max.x, ch.uv.max.y]),
                (Point2D::new(x0, y1), [ch.uv.min.x, ch.uv.max.y]),
            ];

            for (corner, uv) in corners {
                let p = matrix.transform_point(corner);
                self.vertices.push(TextVertex {
                    position: [p.x, p.y],
                    uv,
                    aa_width,
                    thickness: ch.thickness,
                    texture: texture.id.raw(),
                    color,
                });
            }
        }

        Ok(true)
    }

    /// Grows capacity to the next power of two that fits `needed` vertices.
    fn reserve(&mut self, needed: usize) -> Result<()> {
        if needed > self.vertices.capacity() {
            let target = needed.next_power_of_two();
            self.vertices
                .try_reserve_exact(target - self.vertices.len())?;
        }
        Ok(())
    }

    /// Vertices of the last build, four per glyph.
    pub fn vertices(&self) -> &[TextVertex] {
        &self.vertices
    }

    /// Raw texture identity → atlas page, for every texture the vertices use.
    pub fn textures(&self) -> &FxHashMap<TextureId, AtlasTexture> {
        &self.textures
    }

    /// Number of quads in the buffer.
    pub fn glyph_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_GLYPH
    }

    /// Allocated vertex capacity.
    pub fn capacity(&self) -> usize {
        self.vertices.capacity()
    }

    /// Checks if the last build emitted nothing.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Drops all vertices and forces the next build.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.textures.clear();
        self.built_version = None;
    }
}
