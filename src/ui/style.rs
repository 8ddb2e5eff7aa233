use std::fmt::{self, Display, Formatter};

use crossterm::style::{Color, ResetColor, SetForegroundColor};
use unicode_width::UnicodeWidthChar;

const ESC: char = '\x1b';

/// Foreground-colored run of text. Displays as
/// `<set color><content><reset>` so the color never outlives the span; with
/// no color it displays the bare content.
#[derive(Debug, Clone, Copy)]
pub struct StyleSpan<T> {
    color: Option<Color>,
    content: T,
}

pub fn span<T: Display>(color: Option<Color>, content: T) -> StyleSpan<T> {
    StyleSpan { color, content }
}

impl<T: Display> Display for StyleSpan<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "{}{}{}", SetForegroundColor(color), self.content, ResetColor),
            None => write!(f, "{}", self.content),
        }
    }
}

/// Columns `s` occupies on screen. Escape sequences count as zero.
pub fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESC {
            skip_escape(&mut chars);
        } else {
            width += c.width().unwrap_or(0);
        }
    }
    width
}

/// Pad `s` with `fill` (or cut it) to exactly `width` visible columns.
///
/// When a styled line has to be cut, a color reset is appended so an
/// unterminated span cannot bleed into the border or the next row.
pub fn fit_to_width(s: &str, width: usize, fill: char) -> String {
    let current = visible_width(s);
    if current <= width {
        let fill_width = fill.width().unwrap_or(1).max(1);
        let mut out = String::with_capacity(s.len() + (width - current));
        out.push_str(s);
        for _ in 0..(width - current) / fill_width {
            out.push(fill);
        }
        return out;
    }

    let mut out = String::with_capacity(s.len());
    let mut used = 0;
    let mut styled = false;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESC {
            styled = true;
            out.push(c);
            out.push_str(&skip_escape(&mut chars));
            continue;
        }
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    // A wide glyph may not fit the last column.
    for _ in used..width {
        out.push(' ');
    }
    if styled {
        out.push_str(&ResetColor.to_string());
    }
    out
}

/// Consume one escape sequence (after the ESC) and return its characters.
///
/// CSI (`ESC [ params final`) and two-character `ESC x` forms are handled.
fn skip_escape<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) -> String {
    let mut seq = String::new();
    match chars.next() {
        Some('[') => {
            seq.push('[');
            for c in chars.by_ref() {
                seq.push(c);
                if ('\x40'..='\x7e').contains(&c) {
                    break;
                }
            }
        }
        Some(c) => seq.push(c),
        None => {}
    }
    seq
}
