use std::sync::Arc;

use crate::font_registry::DEFAULT_FONT;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Horizontal placement of a line inside the layout box.
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    /// Stretch wrapped lines to the box width by widening their spaces.
    Justify,
}

impl Align {
    /// Parses the markup spelling (`left`, `center`, `right`, `justify`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            "justify" => Some(Self::Justify),
            _ => None,
        }
    }
}

/// Visual attributes applied to a run of characters.
///
/// Styles are shared through `Arc`; nested markup derives child styles with
/// [`TextStyle::derive`] instead of mutating the parent.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font_name: Arc<str>,
    /// Requested size in pixels; the atlas is scaled by `font_size / atlas size`.
    pub font_size: f32,
    pub font_scale: f32,
    /// `0xRRGGBB`.
    pub tint: u32,
    pub align: Align,
    /// Extra vertical space after each line, in unscaled font pixels.
    pub line_spacing: f32,
    /// Extra advance after each glyph, in unscaled font pixels.
    pub letter_spacing: f32,
    /// Distance-field threshold; 0.5 is the glyph outline.
    pub thickness: f32,
    /// Horizontal shear of the glyph top edge as a fraction of glyph height.
    pub slant: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_name: Arc::from(DEFAULT_FONT),
            font_size: 32.0,
            font_scale: 1.0,
            tint: 0xFF_FF_FF,
            align: Align::Left,
            line_spacing: 0.0,
            letter_spacing: 0.0,
            thickness: 0.5,
            slant: 0.0,
        }
    }
}

impl TextStyle {
    /// Builds a child style: all fields are copied from `self`, then `f`
    /// applies the overrides. `self` is left untouched.
    pub fn derive(&self, f: impl FnOnce(&mut TextStyle)) -> Arc<TextStyle> {
        let mut child = self.clone();
        f(&mut child);
        Arc::new(child)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_does_not_touch_parent() {
        let parent = Arc::new(TextStyle::default());
        let child = parent.derive(|s| s.tint = 0xFF0000);

        assert_eq!(parent.tint, 0xFFFFFF);
        assert_eq!(child.tint, 0xFF0000);
        assert_eq!(child.font_name, parent.font_name);
        assert!(!Arc::ptr_eq(&parent, &child));
    }

    #[test]
    fn test_derive_chain_inherits_every_field() {
        let root = Arc::new(TextStyle::default());
        let sized = root.derive(|s| s.font_size = 48.0);
        let leaf = sized.derive(|s| s.align = Align::Justify);

        assert_eq!(leaf.font_size, 48.0);
        assert_eq!(leaf.align, Align::Justify);
        assert_eq!(sized.align, Align::Left);
    }

    #[test]
    fn test_align_names() {
        assert_eq!(Align::from_name("Center"), Some(Align::Center));
        assert_eq!(Align::from_name(" justify "), Some(Align::Justify));
        assert_eq!(Align::from_name("middle"), None);
    }
}
