use std::sync::Arc;

use euclid::{Box2D, Point2D, UnknownUnit};
use fxhash::FxHashMap;

use crate::{
    error::{Result, TextError},
    texture_id::AtlasTexture,
};

/// Name of the font used when a style references an unknown font.
pub const DEFAULT_FONT: &str = "default";

/// Pre-baked font description handed over by an atlas loader.
///
/// Coordinates follow the BMFont convention: pixels in atlas space, Y down,
/// `base` measured from the top of a line to the baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct FontData {
    /// Face name; used as the registry key when no explicit name is given.
    pub face: String,
    /// Size the atlas was rasterized at.
    pub size: f32,
    pub line_height: f32,
    pub base: f32,
    /// Spread of the signed distance field, in atlas pixels.
    pub distance_range: f32,
    pub glyphs: Vec<GlyphData>,
    pub kernings: Vec<KerningData>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphData {
    pub id: char,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    pub x_advance: f32,
    /// Index into the atlas textures passed to [`FontRegistry::register_font`].
    pub page: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KerningData {
    pub first: char,
    pub second: char,
    pub amount: f32,
}

/// Immutable metrics of a single glyph, with its atlas page resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub id: char,
    /// Rectangle occupied in the atlas page, in pixels.
    pub atlas_rect: Box2D<f32, UnknownUnit>,
    pub x_offset: f32,
    pub y_offset: f32,
    pub x_advance: f32,
    pub texture: AtlasTexture,
}

impl Glyph {
    /// Width of the atlas rectangle.
    pub fn width(&self) -> f32 {
        self.atlas_rect.width()
    }

    /// Height of the atlas rectangle.
    pub fn height(&self) -> f32 {
        self.atlas_rect.height()
    }

    /// Normalized texture coordinates of the glyph inside its atlas page.
    pub fn uv(&self) -> Box2D<f32, UnknownUnit> {
        let w = self.texture.width.max(1) as f32;
        let h = self.texture.height.max(1) as f32;
        Box2D::new(
            Point2D::new(self.atlas_rect.min.x / w, self.atlas_rect.min.y / h),
            Point2D::new(self.atlas_rect.max.x / w, self.atlas_rect.max.y / h),
        )
    }
}

/// A registered font. Never mutated after registration.
#[derive(Debug)]
pub struct FontEntry {
    name: String,
    size: f32,
    line_height: f32,
    base: f32,
    distance_range: f32,
    glyphs: FxHashMap<char, Glyph>,
    kernings: FxHashMap<(char, char), f32>,
    pages: Vec<AtlasTexture>,
}

impl FontEntry {
    fn from_data(name: &str, data: FontData, textures: &[AtlasTexture]) -> Result<Self> {
        let invalid = |reason: String| TextError::InvalidFont {
            name: name.to_string(),
            reason,
        };

        if data.size.is_nan() || data.size <= 0.0 {
            return Err(invalid(format!("base size must be positive, got {}", data.size)));
        }

        let mut glyphs = FxHashMap::default();
        glyphs.reserve(data.glyphs.len());
        for glyph in &data.glyphs {
            let Some(&texture) = textures.get(glyph.page) else {
                return Err(invalid(format!(
                    "glyph {:?} references page {} but only {} textures were given",
                    glyph.id,
                    glyph.page,
                    textures.len()
                )));
            };

            glyphs.insert(
                glyph.id,
                Glyph {
                    id: glyph.id,
                    atlas_rect: Box2D::new(
                        Point2D::new(glyph.x, glyph.y),
                        Point2D::new(glyph.x + glyph.width, glyph.y + glyph.height),
                    ),
                    x_offset: glyph.x_offset,
                    y_offset: glyph.y_offset,
                    x_advance: glyph.x_advance,
                    texture,
                },
            );
        }

        let kernings = data
            .kernings
            .iter()
            .map(|k| ((k.first, k.second), k.amount))
            .collect();

        Ok(Self {
            name: name.to_string(),
            size: data.size,
            line_height: data.line_height,
            base: data.base,
            distance_range: data.distance_range,
            glyphs,
            kernings,
            pages: textures.to_vec(),
        })
    }

    /// Name the entry was registered under (aliases do not change it).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size the atlas was rasterized at.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Distance between consecutive baselines at atlas size.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Distance from the top of a line to its baseline at atlas size.
    pub fn base(&self) -> f32 {
        self.base
    }

    /// Distance field range in atlas pixels.
    pub fn distance_range(&self) -> f32 {
        self.distance_range
    }

    /// Returns the glyph for `ch`, if the atlas has one.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Kerning adjustment between two glyphs in unscaled atlas pixels.
    pub fn kerning(&self, first: char, second: char) -> f32 {
        self.kernings.get(&(first, second)).copied().unwrap_or(0.0)
    }

    /// Atlas pages, indexed by glyph page.
    pub fn pages(&self) -> &[AtlasTexture] {
        &self.pages
    }
}

/// Name → font table.
///
/// Populated during startup and read-only while rendering. Aliases share the
/// same [`FontEntry`].
#[derive(Default)]
pub struct FontRegistry {
    fonts: FxHashMap<String, Arc<FontEntry>>,
}

impl FontRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `data` under `name`, or under `data.face` when no name is given.
    ///
    /// Registering an existing name replaces the previous entry. Every glyph page
    /// index must point into `textures`.
    pub fn register_font(
        &mut self,
        data: FontData,
        textures: &[AtlasTexture],
        name: Option<&str>,
    ) -> Result<Arc<FontEntry>> {
        let name = name.unwrap_or(&data.face).to_string();
        let entry = Arc::new(FontEntry::from_data(&name, data, textures)?);

        if self.fonts.insert(name.clone(), Arc::clone(&entry)).is_some() {
            log::warn!("Font {name:?} registered twice; replacing previous entry.");
        }

        Ok(entry)
    }

    /// Makes `alias` resolve to the entry registered as `target`.
    pub fn register_font_alias(&mut self, alias: &str, target: &str) -> Result<()> {
        let Some(entry) = self.fonts.get(target).cloned() else {
            return Err(TextError::AliasTargetMissing {
                alias: alias.to_string(),
                target: target.to_string(),
            });
        };
        self.fonts.insert(alias.to_string(), entry);
        Ok(())
    }

    /// Exact lookup without fallback.
    pub fn font(&self, name: &str) -> Option<Arc<FontEntry>> {
        self.fonts.get(name).cloned()
    }

    /// Looks up `name`, falling back to [`DEFAULT_FONT`].
    pub fn resolve(&self, name: &str) -> Result<Arc<FontEntry>> {
        if let Some(entry) = self.fonts.get(name) {
            return Ok(Arc::clone(entry));
        }

        match self.fonts.get(DEFAULT_FONT) {
            Some(entry) => {
                log::warn!("Font {name:?} is not registered; using {DEFAULT_FONT:?}.");
                Ok(Arc::clone(entry))
            }
            None => Err(TextError::FontNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Checks if `name` is registered, directly or as an alias.
    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Returns every registered name, aliases included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    /// Checks if no font is registered.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Returns the number of registered names.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }
}

/// Synthetic fonts shared by the unit tests of every module.
#[cfg(test)]
pub(crate) mod test_fonts {
    use super::*;
    use crate::texture_id::TextureId;

    /// Every printable ASCII glyph is 20px wide with a 20px advance; the space
    /// has an advance but no visible extent. `A`→`V` kerns by -4.
    pub fn mono_data(face: &str) -> FontData {
        let glyphs = (0x20u8..0x7f)
            .map(|b| {
                let ch = b as char;
                let index = (b - 0x20) as f32;
                GlyphData {
                    id: ch,
                    x: (index % 16.0) * 24.0,
                    y: (index / 16.0).floor() * 32.0,
                    width: if ch == ' ' { 0.0 } else { 20.0 },
                    height: if ch == ' ' { 0.0 } else { 24.0 },
                    x_offset: 0.0,
                    y_offset: 6.0,
                    x_advance: 20.0,
                    page: 0,
                }
            })
            .collect();

        FontData {
            face: face.to_string(),
            size: 32.0,
            line_height: 40.0,
            base: 30.0,
            distance_range: 4.0,
            glyphs,
            kernings: vec![KerningData {
                first: 'A',
                second: 'V',
                amount: -4.0,
            }],
        }
    }

    /// A 512x512 atlas page with the given identity.
    pub fn page(id: u32) -> AtlasTexture {
        AtlasTexture::new(TextureId::new(id), 512, 512)
    }

    /// Registry with `default` on texture 1 and `alt` on texture 2.
    pub fn registry() -> FontRegistry {
        let mut registry = FontRegistry::new();
        registry
            .register_font(mono_data(DEFAULT_FONT), &[page(1)], None)
            .expect("test font");
        registry
            .register_font(mono_data("alt"), &[page(2)], None)
            .expect("test font");
        registry
    }
}
