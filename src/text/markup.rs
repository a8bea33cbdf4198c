//! Inline markup such as `[color=#FF0000]red[/color]`.
//!
//! Supported tags: `font`, `color`, `size`, `scale`, `lineSpacing`,
//! `letterSpacing`, `align`, `thickness` and `slant`. `\X` emits `X` literally.
//! Nothing in here fails: malformed input is logged and parsed as plain text.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::{
    layout::CharRecord,
    pool::RecordPool,
    style::{Align, TextStyle},
};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\(.)|\[(/?)([A-Za-z]+)(?:=([^\[\]]*))?\]|(\s)|(.)")
        .expect("markup token pattern is valid")
});

/// Converts `text` into one [`CharRecord`] per codepoint, each tagged with the
/// style in effect at that position.
///
/// Records already in `out` are returned to `pool` first. `\r` is dropped,
/// `\n` is kept, every other whitespace becomes `' '`, and a final `'\n'` is
/// always appended.
pub fn parse_markup(
    text: &str,
    base: &Arc<TextStyle>,
    pool: &mut RecordPool<CharRecord>,
    out: &mut Vec<CharRecord>,
) {
    pool.release_all(out);

    let mut stack: Vec<Arc<TextStyle>> = Vec::new();
    let mut current = Arc::clone(base);

    let mut emit = |codepoint: char, style: &Arc<TextStyle>| {
        let mut record = pool.acquire();
        record.codepoint = codepoint;
        record.style = Arc::clone(style);
        out.push(record);
    };

    for caps in TOKEN.captures_iter(text) {
        if let Some(escaped) = caps.get(1) {
            for ch in escaped.as_str().chars() {
                emit(ch, &current);
            }
        } else if let Some(name) = caps.get(3) {
            let closing = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
            let name = name.as_str();

            if !is_known_tag(name) {
                log::warn!("Ignoring unknown markup tag {:?}.", &caps[0]);
                continue;
            }

            if closing {
                match stack.pop() {
                    Some(parent) => current = parent,
                    None => log::warn!("Ignoring unbalanced closing tag {:?}.", &caps[0]),
                }
                continue;
            }

            let value = caps.get(4).map(|m| m.as_str());
            let child = derive_style(&current, name, value);
            stack.push(std::mem::replace(&mut current, child));
        } else if let Some(space) = caps.get(5) {
            match space.as_str() {
                "\r" => {}
                "\n" => emit('\n', &current),
                _ => emit(' ', &current),
            }
        } else if let Some(other) = caps.get(6) {
            let Some(ch) = other.as_str().chars().next() else {
                continue;
            };
            if ch == '[' {
                log::warn!("Unrecognized markup near byte {}; keeping '[' as text.", other.start());
            }
            emit(ch, &current);
        }
    }

    emit('\n', &current);

    if !stack.is_empty() {
        log::debug!("{} markup tag(s) left open at end of text.", stack.len());
    }
}

fn is_known_tag(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "font"
            | "color"
            | "size"
            | "scale"
            | "linespacing"
            | "letterspacing"
            | "align"
            | "thickness"
            | "slant"
    )
}

/// Derives the child style for an opening tag.
///
/// An invalid or missing value still produces a child (equal to its parent)
/// so the matching closing tag pops the right level.
fn derive_style(parent: &Arc<TextStyle>, name: &str, value: Option<&str>) -> Arc<TextStyle> {
    let Some(value) = value.map(str::trim) else {
        log::warn!("Markup tag [{name}] requires a value.");
        return parent.derive(|_| {});
    };

    let number = || value.parse::<f32>().ok().filter(|v| v.is_finite());
    let tag = name.to_ascii_lowercase();

    let applied = match tag.as_str() {
        "font" if !value.is_empty() => {
            let font: Arc<str> = Arc::from(value);
            Some(parent.derive(|s| s.font_name = font))
        }
        "color" => parse_color(value).map(|tint| parent.derive(|s| s.tint = tint)),
        "size" => number().map(|v| parent.derive(|s| s.font_size = v)),
        "scale" => number().map(|v| parent.derive(|s| s.font_scale = v)),
        "linespacing" => number().map(|v| parent.derive(|s| s.line_spacing = v)),
        "letterspacing" => number().map(|v| parent.derive(|s| s.letter_spacing = v)),
        "thickness" => number().map(|v| parent.derive(|s| s.thickness = v)),
        "slant" => number().map(|v| parent.derive(|s| s.slant = v)),
        "align" => Align::from_name(value).map(|align| parent.derive(|s| s.align = align)),
        _ => None,
    };

    applied.unwrap_or_else(|| {
        log::warn!("Invalid value {value:?} for markup tag [{name}].");
        parent.derive(|_| {})
    })
}

/// Accepts `#RRGGBB`, `0xRRGGBB` and `RRGGBB`.
fn parse_color(value: &str) -> Option<u32> {
    let hex = value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if hex.is_empty() || hex.len() > 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
