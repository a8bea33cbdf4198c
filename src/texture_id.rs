/// Raw identity of an atlas texture.
///
/// Vertices carry this value untranslated; the batch renderer maps it onto a
/// texture unit slot at flush time. Identities are chosen by whoever uploads the
/// atlas pages and must be unique per texture for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    /// Wraps a raw identity.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identity.
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl From<u32> for TextureId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// One page of a font atlas, as known to the graphics backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AtlasTexture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl AtlasTexture {
    /// Describes an uploaded atlas page.
    pub const fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }
}
