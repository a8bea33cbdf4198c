use std::sync::Arc;

use bitflags::bitflags;
use euclid::{Transform2D, UnknownUnit};

use crate::{
    error::Result,
    font_registry::FontRegistry,
    renderer::vertex::{VertexBuffer, WorldTransform},
    text::{
        CharRecord, LayoutConfig, LayoutMetrics, LineRecord, RecordPools, TextStyle, layout_text,
        parse_markup,
    },
};

bitflags! {
    /// What changed on a [`TextObject`] since it was last laid out or built.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        const TEXT = 1;
        const STYLE = 1 << 1;
        const WRAP = 1 << 2;
        /// World matrix or alpha changed.
        const TRANSFORM = 1 << 3;

        /// Changes that require the markup to be parsed again.
        const PARSE = Self::TEXT.bits() | Self::STYLE.bits();
        /// Changes that require a new layout.
        const LAYOUT = Self::TEXT.bits() | Self::STYLE.bits() | Self::WRAP.bits();
    }
}

/// A piece of markup text owned by a scene element.
///
/// Mutators only mark the object dirty. Parsing, layout and vertex building
/// happen lazily the next time the size or the vertices are requested.
pub struct TextObject {
    text: String,
    style: Arc<TextStyle>,
    config: LayoutConfig,
    visible: bool,

    chars: Vec<CharRecord>,
    lines: Vec<LineRecord>,
    metrics: LayoutMetrics,
    layout_generation: u64,

    transform: WorldTransform,
    vertices: VertexBuffer,
    /// Set when the placement records changed after the last vertex build.
    vertices_stale: bool,

    dirty: DirtyFlags,
}

impl TextObject {
    /// Creates an object with the default layout configuration.
    pub fn new(text: impl Into<String>, style: Arc<TextStyle>) -> Self {
        Self::with_config(text, style, LayoutConfig::default())
    }

    /// Creates an object with an explicit layout configuration.
    pub fn with_config(text: impl Into<String>, style: Arc<TextStyle>, config: LayoutConfig) -> Self {
        Self {
            text: text.into(),
            style,
            config,
            visible: true,
            chars: Vec::new(),
            lines: Vec::new(),
            metrics: LayoutMetrics::default(),
            layout_generation: 0,
            transform: WorldTransform::default(),
            vertices: VertexBuffer::new(),
            vertices_stale: true,
            dirty: DirtyFlags::all(),
        }
    }

    /// Returns the markup source.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the markup source.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.dirty |= DirtyFlags::TEXT;
        }
    }

    /// Returns the base style markup tags derive from.
    pub fn style(&self) -> &Arc<TextStyle> {
        &self.style
    }

    /// Replaces the base style.
    pub fn set_style(&mut self, style: Arc<TextStyle>) {
        if !Arc::ptr_eq(&self.style, &style) && *self.style != *style {
            self.style = style;
            self.dirty |= DirtyFlags::STYLE;
        }
    }

    /// Returns the wrap width, if wrapping is enabled.
    pub fn wrap_width(&self) -> Option<f32> {
        self.config.wrap_width
    }

    /// Sets the wrap width; `None` disables wrapping.
    pub fn set_wrap_width(&mut self, wrap_width: Option<f32>) {
        if self.config.wrap_width != wrap_width {
            self.config.wrap_width = wrap_width;
            self.dirty |= DirtyFlags::WRAP;
        }
    }

    /// Returns the layout configuration.
    pub fn layout_config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Sets the multiplier applied on top of every style's scale.
    pub fn set_global_font_scale(&mut self, scale: f32) {
        if self.config.global_font_scale != scale {
            self.config.global_font_scale = scale;
            self.dirty |= DirtyFlags::WRAP;
        }
    }

    /// Returns the world transform and alpha.
    pub fn transform(&self) -> &WorldTransform {
        &self.transform
    }

    /// Sets the object-to-world matrix.
    pub fn set_transform(&mut self, matrix: Transform2D<f32, UnknownUnit, UnknownUnit>) {
        let version = self.transform.version();
        self.transform.set_matrix(matrix);
        if self.transform.version() != version {
            self.dirty |= DirtyFlags::TRANSFORM;
        }
    }

    /// Returns the world alpha.
    pub fn alpha(&self) -> f32 {
        self.transform.alpha()
    }

    /// Sets the world alpha.
    pub fn set_alpha(&mut self, alpha: f32) {
        let version = self.transform.version();
        self.transform.set_alpha(alpha);
        if self.transform.version() != version {
            self.dirty |= DirtyFlags::TRANSFORM;
        }
    }

    /// Checks if the object is rendered.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the object.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Returns the pending changes.
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Checks if any change is pending.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Incremented every time the layout actually runs.
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    /// Re-parses and re-lays out the text if anything affecting layout changed.
    /// Returns whether layout ran.
    pub fn update_layout(&mut self, registry: &FontRegistry, pools: &mut RecordPools) -> Result<bool> {
        if !self.dirty.intersects(DirtyFlags::LAYOUT) {
            return Ok(false);
        }

        if self.dirty.intersects(DirtyFlags::PARSE) {
            parse_markup(&self.text, &self.style, &mut pools.chars, &mut self.chars);
        }

        self.metrics = layout_text(
            &mut self.chars,
            &mut self.lines,
            &mut pools.lines,
            registry,
            &self.config,
        )?;

        self.layout_generation += 1;
        self.vertices_stale = true;
        self.dirty.remove(DirtyFlags::LAYOUT);
        Ok(true)
    }

    /// Box size `[width, height]`, laying out first if stale.
    pub fn size(&mut self, registry: &FontRegistry, pools: &mut RecordPools) -> Result<[f32; 2]> {
        self.update_layout(registry, pools)?;
        Ok([self.metrics.width, self.metrics.height])
    }

    /// Brings layout and vertices up to date.
    pub fn update_vertices(
        &mut self,
        registry: &FontRegistry,
        pools: &mut RecordPools,
    ) -> Result<&VertexBuffer> {
        self.update_layout(registry, pools)?;

        if self.vertices_stale || self.dirty.contains(DirtyFlags::TRANSFORM) {
            self.vertices
                .build(&self.chars, &self.transform, self.vertices_stale)?;
            self.vertices_stale = false;
            self.dirty.remove(DirtyFlags::TRANSFORM);
        }

        Ok(&self.vertices)
    }

    /// Metrics of the most recent layout.
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Returns the character records of the most recent layout.
    pub fn chars(&self) -> &[CharRecord] {
        &self.chars
    }

    /// Returns the line records of the most recent layout.
    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    /// Returns the most recently built vertices.
    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    /// Returns every pooled record to `pools`. The object stays usable and
    /// lays itself out again on next use.
    pub fn release(&mut self, pools: &mut RecordPools) {
        pools.chars.release_all(&mut self.chars);
        pools.lines.release_all(&mut self.lines);
        self.vertices.clear();
        self.metrics = LayoutMetrics::default();
        self.vertices_stale = true;
        self.dirty |= DirtyFlags::TEXT;
    }
}
