use fancy_regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

/// SGR sequences only: `ESC [ <digits/semicolons> m`. Cursor movement and other CSI
/// sequences are not stripped, matching what color libraries actually emit into cells.
static SGR_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x1b\[\d*(?:;\d+)*m").unwrap());

/// Removes ANSI SGR (color) escape sequences from `text`.
pub(crate) fn strip_ansi(text: &str) -> Cow<'_, str> {
    SGR_PATTERN.replace_all(text, "")
}

/// Returns the width of `text` in terminal columns.
///
/// With `ansi` set, ANSI color sequences are removed before measuring; they occupy
/// characters but no columns. With `unicode` set, each character contributes its
/// East-Asian width (2 for wide/CJK, 0 for combining marks); otherwise the width is
/// simply the character count.
pub fn display_width(text: &str, unicode: bool, ansi: bool) -> usize {
    let text = if ansi { strip_ansi(text) } else { Cow::Borrowed(text) };
    if unicode {
        UnicodeWidthStr::width(text.as_ref())
    } else {
        text.chars().count()
    }
}

/// Splits a cell's text into physical lines.
///
/// A trailing newline does not produce an extra empty line, interior blank lines are
/// kept, and the empty string is one empty line (never zero lines).
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        vec![""]
    } else {
        text.lines().collect()
    }
}

/// Left-justifies `text` to `width` *characters* (not columns), padding with `pad`.
/// Text already at or past the width is returned unchanged.
pub(crate) fn ljust(text: &str, width: usize, pad: char) -> String {
    let mut result = String::from(text);
    let chars = text.chars().count();
    for _ in chars..width {
        result.push(pad);
    }
    result
}

/// Right-justifies `text` to `width` characters, padding with `pad`.
pub(crate) fn rjust(text: &str, width: usize, pad: char) -> String {
    let chars = text.chars().count();
    if chars >= width {
        return String::from(text);
    }
    let mut result = String::with_capacity(width);
    for _ in chars..width {
        result.push(pad);
    }
    result.push_str(text);
    result
}
