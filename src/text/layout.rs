use std::sync::{Arc, LazyLock};

use euclid::{Box2D, UnknownUnit};

use crate::{
    error::Result,
    font_registry::{FontEntry, FontRegistry, Glyph},
    texture_id::AtlasTexture,
};

use super::{
    pool::{RecordPool, Recycle},
    style::{Align, TextStyle},
};

/// Configuration knobs used by the layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Lines wider than this are broken at their last space. `None` or a
    /// non-positive width disables wrapping.
    pub wrap_width: Option<f32>,
    /// Multiplier applied on top of every style's own scale.
    pub global_font_scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            wrap_width: None,
            global_font_scale: 1.0,
        }
    }
}

/// Size and baseline of a finished layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutMetrics {
    pub width: f32,
    pub height: f32,
    /// Offset from the top of the box to the baseline of the last content line.
    pub baseline: f32,
    pub line_count: usize,
}

/// One codepoint of parsed text and, after layout, its placement.
///
/// **Y-axis goes down.** `glyph == None` marks a newline, a space consumed by
/// a wrap, or a codepoint missing from the font; such records render nothing.
#[derive(Clone, Debug)]
pub struct CharRecord {
    pub codepoint: char,
    pub style: Arc<TextStyle>,

    pub line: usize,
    pub font: Option<Arc<FontEntry>>,
    pub glyph: Option<Glyph>,
    pub scale: f32,
    /// Pen position plus bearing, relative to the start of the line.
    pub offset_x: f32,

    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub uv: Box2D<f32, UnknownUnit>,
    pub distance: f32,
    pub thickness: f32,
    pub texture: Option<AtlasTexture>,
    pub tint: u32,
}

/// Style held by idle records, so pooled records keep no markup styles alive.
static UNSTYLED: LazyLock<Arc<TextStyle>> = LazyLock::new(Arc::default);

impl Default for CharRecord {
    fn default() -> Self {
        Self {
            codepoint: '\0',
            style: Arc::clone(&UNSTYLED),
            line: 0,
            font: None,
            glyph: None,
            scale: 1.0,
            offset_x: 0.0,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            uv: Box2D::zero(),
            distance: 0.0,
            thickness: 0.0,
            texture: None,
            tint: 0,
        }
    }
}

impl CharRecord {
    /// Checks if the record produces a quad.
    pub fn is_visible(&self) -> bool {
        self.glyph.is_some() && self.width > 0.0 && self.height > 0.0
    }

    /// Clears everything a layout pass writes, keeping codepoint and style.
    fn clear_placement(&mut self) {
        self.glyph = None;
        self.offset_x = 0.0;
        self.x = 0.0;
        self.y = 0.0;
        self.width = 0.0;
        self.height = 0.0;
        self.uv = Box2D::zero();
        self.distance = 0.0;
        self.thickness = 0.0;
        self.texture = None;
        self.tint = 0;
    }
}

impl Recycle for CharRecord {
    fn reset(&mut self) {
        self.codepoint = '\0';
        self.style = Arc::clone(&UNSTYLED);
        self.line = 0;
        self.font = None;
        self.scale = 1.0;
        self.clear_placement();
    }
}

/// A single row of the layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineRecord {
    pub align: Align,
    pub height: f32,
    /// Distance from the top of the line to the shared baseline.
    pub base: f32,
    pub width: f32,
    pub space_count: usize,
    pub align_offset: f32,
    /// Extra advance inserted at every space of a justified line.
    pub justify_spacer: f32,
    pub y: f32,
    /// The line ended because of a wrap rather than an explicit newline.
    pub wrapped: bool,
}

impl Recycle for LineRecord {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Accumulators for the line currently being filled.
#[derive(Default)]
struct LineState {
    pen_x: f32,
    width: f32,
    height: f32,
    base: f32,
    spaces: usize,
    last_break: Option<usize>,
    /// Previous glyph and its font, for kerning.
    prev: Option<(char, Arc<FontEntry>)>,
    has_content: bool,
}

impl LineState {
    /// Starts an empty line. Height and base grow with the glyphs placed on it.
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copies the running values onto `line`. At a space this is the
    /// pre-break state a later wrap falls back to.
    ///
    /// A line without glyphs takes its metrics from `font` at `scale`.
    fn snapshot(&self, line: &mut LineRecord, font: &FontEntry, scale: f32) {
        line.width = self.width;
        line.space_count = self.spaces;
        if self.has_content {
            line.height = self.height;
            line.base = self.base;
        } else {
            line.height = font.line_height() * scale;
            line.base = font.base() * scale;
        }
    }
}

/// Caches the font and scale of the most recently seen style.
struct StyleResolver<'a> {
    registry: &'a FontRegistry,
    global_scale: f32,
    last: Option<(Arc<TextStyle>, Arc<FontEntry>, f32)>,
}

impl<'a> StyleResolver<'a> {
    fn new(registry: &'a FontRegistry, global_scale: f32) -> Self {
        Self {
            registry,
            global_scale,
            last: None,
        }
    }

    fn resolve(&mut self, style: &Arc<TextStyle>) -> Result<(Arc<FontEntry>, f32)> {
        if let Some((cached, font, scale)) = &self.last
            && Arc::ptr_eq(cached, style)
        {
            return Ok((Arc::clone(font), *scale));
        }

        let font = self.registry.resolve(&style.font_name)?;
        let scale = style.font_size / font.size() * style.font_scale * self.global_scale;
        self.last = Some((Arc::clone(style), Arc::clone(&font), scale));
        Ok((font, scale))
    }
}

/// Breaks `chars` into lines and computes every glyph's final placement.
///
/// `lines` is refilled from `line_pool`. Layout runs in two stages:
/// 1. A left-to-right scan assigns characters to lines. When a line overflows
///    the wrap width, the last space becomes the break, the line is closed at
///    the state recorded at that space, and the scan restarts right after it.
///    Records visited before the rewind are simply overwritten.
/// 2. Alignment offsets and justify spacers are computed per line, then each
///    visible glyph gets its final position, UVs and tint.
pub fn layout_text(
    chars: &mut [CharRecord],
    lines: &mut Vec<LineRecord>,
    line_pool: &mut RecordPool<LineRecord>,
    registry: &FontRegistry,
    config: &LayoutConfig,
) -> Result<LayoutMetrics> {
    line_pool.release_all(lines);

    let wrap_width = config.wrap_width.filter(|w| *w > 0.0);
    let mut resolver = StyleResolver::new(registry, config.global_font_scale);

    let mut line = line_pool.acquire();
    let mut state = LineState::default();
    let mut cursor_y = 0.0f32;
    let mut max_line_width = 0.0f32;
    let mut last_align = Align::Left;
    let mut last_font: Option<(Arc<FontEntry>, f32)> = None;

    // Closes `line` below the previous one and starts a fresh record.
    let mut push_line = |line: &mut LineRecord,
                         lines: &mut Vec<LineRecord>,
                         line_pool: &mut RecordPool<LineRecord>,
                         spacing: f32| {
        line.y = cursor_y;
        cursor_y += line.height + spacing;
        max_line_width = max_line_width.max(line.width);
        lines.push(std::mem::replace(line, line_pool.acquire()));
    };

    let mut i = 0;
    while i < chars.len() {
        let style = Arc::clone(&chars[i].style);
        let (font, scale) = resolver.resolve(&style)?;
        last_align = style.align;
        last_font = Some((Arc::clone(&font), scale));

        let ch = &mut chars[i];
        ch.line = lines.len();
        ch.font = Some(Arc::clone(&font));
        ch.scale = scale;
        ch.clear_placement();

        match ch.codepoint {
            '\n' => {
                state.snapshot(&mut line, &font, scale);
                line.align = style.align;
                line.wrapped = false;
                push_line(&mut line, lines, line_pool, style.line_spacing * scale);
                state.reset();
            }
            ' ' => {
                state.snapshot(&mut line, &font, scale);
                state.last_break = Some(i);
                state.spaces += 1;
                state.prev = None;

                if let Some(glyph) = font.glyph(' ') {
                    ch.glyph = Some(*glyph);
                    ch.offset_x = state.pen_x + glyph.x_offset * scale;
                    state.pen_x += (glyph.x_advance + style.letter_spacing) * scale;
                }
            }
            codepoint => {
                let Some(glyph) = font.glyph(codepoint) else {
                    state.prev = None;
                    i += 1;
                    continue;
                };

                // Kerning pairs only apply within one font.
                if let Some((prev, prev_font)) = &state.prev
                    && Arc::ptr_eq(prev_font, &font)
                {
                    state.pen_x += font.kerning(*prev, codepoint) * scale;
                }

                ch.glyph = Some(*glyph);
                ch.offset_x = state.pen_x + glyph.x_offset * scale;
                state.pen_x += (glyph.x_advance + style.letter_spacing) * scale;
                state.width = state.width.max(ch.offset_x + glyph.width() * scale);
                state.height = state.height.max(font.line_height() * scale);
                state.base = state.base.max(font.base() * scale);
                state.prev = Some((codepoint, Arc::clone(&font)));
                state.has_content = true;

                if let (Some(limit), Some(break_at)) = (wrap_width, state.last_break)
                    && state.width > limit
                {
                    // The break space renders nothing; `line` already holds the
                    // state snapshotted when that space was reached.
                    let breaker = &mut chars[break_at];
                    breaker.glyph = None;
                    let break_style = Arc::clone(&breaker.style);
                    let (_, break_scale) = resolver.resolve(&break_style)?;

                    line.align = break_style.align;
                    line.wrapped = true;
                    push_line(
                        &mut line,
                        lines,
                        line_pool,
                        break_style.line_spacing * break_scale,
                    );
                    state.reset();

                    i = break_at + 1;
                    continue;
                }
            }
        }

        i += 1;
    }

    // The final line has no terminating newline (it is empty for parsed text).
    let trailing_has_content = state.has_content;
    match &last_font {
        Some((font, scale)) => state.snapshot(&mut line, font, *scale),
        None => {
            line.width = state.width;
            line.space_count = state.spaces;
        }
    }
    line.align = last_align;
    line.wrapped = false;
    push_line(&mut line, lines, line_pool, 0.0);
    line_pool.release(line);

    let content_lines = if trailing_has_content {
        lines.len()
    } else {
        lines.len() - 1
    };

    let baseline = match lines.len() {
        0 => 0.0,
        1 => lines[0].y + lines[0].base,
        n => lines[n - 2].y + lines[n - 2].base,
    };

    let box_width = wrap_width.unwrap_or(max_line_width);
    let box_height = lines[..content_lines]
        .iter()
        .map(|line| line.y + line.height)
        .fold(0.0f32, f32::max);

    for line in lines.iter_mut() {
        line.align_offset = 0.0;
        line.justify_spacer = 0.0;
        match line.align {
            Align::Left => {}
            Align::Right => line.align_offset = box_width - line.width,
            Align::Center => line.align_offset = (box_width - line.width) / 2.0,
            Align::Justify => {
                if line.wrapped && line.space_count > 0 {
                    line.justify_spacer = (box_width - line.width) / line.space_count as f32;
                }
            }
        }
    }

    place_glyphs(chars, lines);

    Ok(LayoutMetrics {
        width: box_width,
        height: box_height,
        baseline,
        line_count: lines.len(),
    })
}

/// Converts line-relative offsets into final glyph rectangles.
fn place_glyphs(chars: &mut [CharRecord], lines: &[LineRecord]) {
    let mut current_line = usize::MAX;
    let mut offset = 0.0;

    for ch in chars.iter_mut() {
        let Some(line) = lines.get(ch.line) else {
            continue;
        };

        if ch.line != current_line {
            current_line = ch.line;
            offset = line.align_offset;
        }

        if ch.codepoint == ' ' {
            offset += line.justify_spacer;
        }

        let (Some(glyph), Some(font)) = (ch.glyph, ch.font.as_ref()) else {
            continue;
        };

        let scale = ch.scale;
        let width = glyph.width() * scale;
        let height = glyph.height() * scale;
        if width <= 0.0 || height <= 0.0 {
            continue;
        }

        ch.x = ch.offset_x + offset;
        // Glyphs of every size on the line sit on the line's shared baseline.
        ch.y = line.y + line.base + (glyph.y_offset - font.base()) * scale;
        ch.width = width;
        ch.height = height;
        ch.uv = glyph.uv();
        ch.distance = font.distance_range();
        ch.thickness = ch.style.thickness;
        ch.texture = Some(glyph.texture);
        ch.tint = ch.style.tint;
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::TextError;
    use crate::font_registry::test_fonts::{mono_data, page, registry};
    use crate::text::markup::parse_markup;

    struct Laid {
        chars: Vec<CharRecord>,
        lines: Vec<LineRecord>,
        metrics: LayoutMetrics,
    }

    fn layout_with(
        registry: &FontRegistry,
        text: &str,
        style: TextStyle,
        wrap_width: Option<f32>,
    ) -> Result<Laid> {
        let mut char_pool = RecordPool::new();
        let mut line_pool = RecordPool::new();
        let mut chars = Vec::new();
        let mut lines = Vec::new();
        parse_markup(text, &Arc::new(style), &mut char_pool, &mut chars);

        let config = LayoutConfig {
            wrap_width,
            ..LayoutConfig::default()
        };
        let metrics = layout_text(&mut chars, &mut lines, &mut line_pool, registry, &config)?;
        Ok(Laid {
            chars,
            lines,
            metrics,
        })
    }

    fn layout(text: &str, wrap_width: Option<f32>) -> Laid {
        layout_with(&registry(), text, TextStyle::default(), wrap_width).unwrap()
    }

    /// Visible text of each line, in order.
    fn line_texts(laid: &Laid) -> Vec<String> {
        let mut texts = vec![String::new(); laid.lines.len()];
        for ch in &laid.chars {
            if ch.glyph.is_some() {
                texts[ch.line].push(ch.codepoint);
            }
        }
        texts
    }

    #[test]
    fn test_one_line_per_segment_plus_trailing() {
        let laid = layout("ab\ncd\n\nxyz", None);

        assert_eq!(laid.lines.len(), 5);
        assert_eq!(line_texts(&laid), vec!["ab", "cd", "", "xyz", ""]);
        assert_eq!(laid.chars.len(), "ab\ncd\n\nxyz".chars().count() + 1);
        assert!(laid.lines.iter().all(|line| !line.wrapped));
    }

    #[test]
    fn test_box_size_without_wrap() {
        let laid = layout("abc\nde", None);

        assert_eq!(laid.metrics.width, 60.0);
        assert_eq!(laid.metrics.height, 80.0);
        assert_eq!(laid.metrics.line_count, 3);
        // Baseline of the second line: y 40 + base 30.
        assert_eq!(laid.metrics.baseline, 70.0);
    }

    #[test]
    fn test_glyph_positions() {
        let laid = layout("ab", None);
        let b = &laid.chars[1];

        assert_eq!(b.x, 20.0);
        assert_eq!(b.y, 6.0);
        assert_eq!(b.width, 20.0);
        assert_eq!(b.height, 24.0);
        assert_eq!(b.texture.unwrap().id.raw(), 1);
        assert_eq!(b.tint, 0xFFFFFF);
        assert_eq!(b.distance, 4.0);
    }

    #[test]
    fn test_wrap_after_first_space() {
        // "a" is 40 wide at size 64, "a b" is 80, "b c" is 60.
        let laid = layout("[size=64]a[/size] b c", Some(70.0));

        assert_eq!(line_texts(&laid), vec!["a", "b c", ""]);
        assert!(laid.lines[0].wrapped);
        assert!(!laid.lines[1].wrapped);

        let consumed = &laid.chars[1];
        assert_eq!(consumed.codepoint, ' ');
        assert!(consumed.glyph.is_none());
        assert_eq!(consumed.width, 0.0);

        // "b" restarts at the left edge of the new line.
        assert_eq!(laid.chars[2].x, 0.0);
        assert_eq!(laid.chars[2].line, 1);
        assert_eq!(laid.metrics.width, 70.0);
    }

    #[test]
    fn test_wrap_rolls_back_multiple_times() {
        let laid = layout("aa bb cc dd", Some(110.0));
        assert_eq!(line_texts(&laid), vec!["aa bb", "cc dd", ""]);
        assert_eq!(laid.lines[0].width, 100.0);
        assert_eq!(laid.lines[0].space_count, 1);
        assert_eq!(laid.lines[1].y, 40.0);
    }

    #[test]
    fn test_long_word_without_break_overflows() {
        let laid = layout("abcdef", Some(50.0));
        assert_eq!(line_texts(&laid), vec!["abcdef", ""]);
        assert_eq!(laid.lines[0].width, 120.0);
    }

    #[test]
    fn test_wide_wrap_matches_unwrapped() {
        let text = "the quick brown\nfox jumps";
        let unwrapped = layout(text, None);
        let wrapped = layout(text, Some(unwrapped.metrics.width));

        assert_eq!(line_texts(&unwrapped), line_texts(&wrapped));
        assert!(wrapped.lines.iter().all(|line| !line.wrapped));
        for (a, b) in unwrapped.chars.iter().zip(&wrapped.chars) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, b.y);
        }
    }

    #[test]
    fn test_justify_fills_box_for_wrapped_lines_only() {
        let laid = layout("[align=justify]aa bb cc dd[/align]", Some(130.0));
        let first = &laid.lines[0];
        let last = &laid.lines[1];

        assert!(first.wrapped);
        assert_eq!(first.space_count, 1);
        assert_relative_eq!(
            first.width + first.space_count as f32 * first.justify_spacer,
            130.0,
            epsilon = 1e-4
        );
        assert_eq!(last.justify_spacer, 0.0);

        // "bb" is pushed right by one spacer.
        assert_relative_eq!(laid.chars[3].x, 60.0 + first.justify_spacer, epsilon = 1e-4);
        assert_relative_eq!(laid.chars[4].x + laid.chars[4].width, 130.0, epsilon = 1e-4);
    }

    #[test]
    fn test_justify_multiple_spaces() {
        let laid = layout("[align=justify]a b c ddddd[/align]", Some(150.0));
        let first = &laid.lines[0];

        assert_eq!(line_texts(&laid)[0], "a b c");
        assert_eq!(first.space_count, 2);
        let c = laid.chars.iter().find(|c| c.codepoint == 'c').unwrap();
        assert_relative_eq!(c.x + c.width, 150.0, epsilon = 1e-4);
    }

    #[test]
    fn test_right_and_center_alignment() {
        // A line takes the alignment of the newline that ends it.
        let laid = layout("[align=right]abcd\nab\n[/align][align=center]ab\n[/align]", None);

        assert_eq!(laid.lines[1].align_offset, 40.0);
        assert_eq!(laid.chars[5].x, 40.0);
        assert_eq!(laid.lines[2].align_offset, 20.0);
    }

    #[test]
    fn test_mixed_sizes_share_baseline() {
        let laid = layout("[size=64]A[/size]a", None);
        let line = &laid.lines[0];
        assert_eq!(line.base, 60.0);
        assert_eq!(line.height, 80.0);

        for ch in &laid.chars[..2] {
            let font = ch.font.as_ref().unwrap();
            let glyph = ch.glyph.unwrap();
            let baseline = ch.y - (glyph.y_offset - font.base()) * ch.scale;
            assert_relative_eq!(baseline, line.y + line.base);
        }
    }

    #[test]
    fn test_kerning_and_letter_spacing() {
        let laid = layout("AV", None);
        assert_eq!(laid.chars[1].x, 16.0);

        let laid = layout("[letterSpacing=5]ab", None);
        assert_eq!(laid.chars[1].x, 25.0);
    }

    #[test]
    fn test_line_after_wrap_takes_its_own_metrics() {
        // The break space is size 64 but the wrapped line only holds size 32 glyphs.
        let laid = layout("[size=64]aa [/size]bb", Some(90.0));
        assert_eq!(line_texts(&laid), vec!["aa", "bb", ""]);

        let second = &laid.lines[1];
        assert_eq!(second.y, 80.0);
        assert_eq!(second.height, 40.0);
        assert_eq!(second.base, 30.0);
        assert_eq!(second.width, 40.0);
        assert_eq!(laid.chars[3].y, 86.0);
        assert_eq!(laid.metrics.height, 120.0);
    }

    #[test]
    fn test_empty_line_uses_newline_style() {
        let laid = layout("[size=64]a\n\n[/size]b", None);

        assert_eq!(laid.lines[1].height, 80.0);
        assert_eq!(laid.lines[2].y, 160.0);
        assert_eq!(laid.lines[2].height, 40.0);
        assert_eq!(laid.lines[2].base, 30.0);
    }

    #[test]
    fn test_kerning_skipped_across_fonts() {
        let laid = layout("[font=alt]A[/font]V", None);
        assert_eq!(laid.chars[1].x, 20.0);
    }

    #[test]
    fn test_global_font_scale() {
        let registry = registry();
        let mut chars = Vec::new();
        let mut lines = Vec::new();
        parse_markup(
            "ab",
            &Arc::new(TextStyle::default()),
            &mut RecordPool::new(),
            &mut chars,
        );
        let config = LayoutConfig {
            global_font_scale: 2.0,
            ..LayoutConfig::default()
        };
        let metrics =
            layout_text(&mut chars, &mut lines, &mut RecordPool::new(), &registry, &config).unwrap();

        assert_eq!(chars[1].scale, 2.0);
        assert_eq!(chars[1].x, 40.0);
        assert_eq!(chars[1].width, 40.0);
        assert_eq!(metrics.width, 80.0);
        assert_eq!(metrics.height, 80.0);
    }

    #[test]
    fn test_reset_drops_style() {
        let style = Arc::new(TextStyle::default()).derive(|s| s.tint = 0x123456);
        let mut record = CharRecord {
            codepoint: 'x',
            style: Arc::clone(&style),
            ..CharRecord::default()
        };
        assert_eq!(Arc::strong_count(&style), 2);

        record.reset();
        assert_eq!(Arc::strong_count(&style), 1);
        assert_eq!(*record.style, TextStyle::default());
    }

    #[test]
    fn test_line_spacing_and_scale() {
        let laid = layout("[lineSpacing=10]a\nb[/lineSpacing]", None);
        assert_eq!(laid.lines[1].y, 50.0);

        let laid = layout("[scale=0.5]ab", None);
        assert_eq!(laid.chars[1].x, 10.0);
        assert_eq!(laid.chars[1].width, 10.0);
    }

    #[test]
    fn test_unmapped_codepoint_is_invisible() {
        let laid = layout("a\u{00e9}b", None);
        let missing = &laid.chars[1];

        assert!(missing.glyph.is_none());
        assert!(!missing.is_visible());
        assert_eq!(laid.chars[2].x, 20.0);
    }

    #[test]
    fn test_missing_font_is_fatal() {
        let mut registry = FontRegistry::new();
        registry
            .register_font(mono_data("body"), &[page(3)], None)
            .unwrap();

        let style = TextStyle {
            font_name: Arc::from("nope"),
            ..TextStyle::default()
        };
        let err = layout_with(&registry, "x", style, None).err().unwrap();
        assert!(matches!(err, TextError::FontNotFound { .. }));
    }

    #[test]
    fn test_alias_resolves_to_same_metrics() {
        let mut registry = FontRegistry::new();
        registry
            .register_font(mono_data("body"), &[page(3)], None)
            .unwrap();
        registry.register_font_alias("heading", "body").unwrap();

        let heading = TextStyle {
            font_name: Arc::from("heading"),
            ..TextStyle::default()
        };
        let body = TextStyle {
            font_name: Arc::from("body"),
            ..TextStyle::default()
        };
        let a = layout_with(&registry, "Hi", heading, None).unwrap();
        let b = layout_with(&registry, "Hi", body, None).unwrap();

        assert!(Arc::ptr_eq(
            a.chars[0].font.as_ref().unwrap(),
            b.chars[0].font.as_ref().unwrap()
        ));
        assert_eq!(a.chars[1].glyph, b.chars[1].glyph);
        assert_eq!(a.chars[1].x, b.chars[1].x);
    }

    #[test]
    fn test_layout_without_trailing_newline() {
        let registry = registry();
        let style = Arc::new(TextStyle::default());
        let mut chars: Vec<CharRecord> = "ab"
            .chars()
            .map(|codepoint| CharRecord {
                codepoint,
                style: Arc::clone(&style),
                ..CharRecord::default()
            })
            .collect();
        let mut lines = Vec::new();
        let metrics = layout_text(
            &mut chars,
            &mut lines,
            &mut RecordPool::new(),
            &registry,
            &LayoutConfig::default(),
        )
        .unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(metrics.width, 40.0);
        assert_eq!(metrics.height, 40.0);
    }
}
