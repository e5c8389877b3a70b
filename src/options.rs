use crate::str_width::display_width;
use derive_builder::Builder;
use std::fmt::{Display, Formatter};

/// Horizontal alignment of a cell within its column.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

/// Vertical alignment of a cell within its row's line band.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VAlign {
    #[default]
    Top,
    Bottom,
    Middle,
}

/// A preset border glyph set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BorderStyle {
    /// `-`, `|` and `+` everywhere.
    Ascii,
    /// Box-drawing characters (`─`, `│`, `┌┬┐├┼┤└┴┘`).
    Unicode,
}

impl BorderStyle {
    pub(crate) fn glyphs(self) -> (char, char, [char; 9]) {
        match self {
            BorderStyle::Ascii => ('-', '|', ['+'; 9]),
            BorderStyle::Unicode => ('─', '│', ['┌', '┬', '┐', '├', '┼', '┤', '└', '┴', '┘']),
        }
    }
}

/// Strings wrapped around every border glyph and rule, typically an SGR color
/// sequence and its reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorderColor {
    pub prefix: String,
    pub suffix: String,
}

impl BorderColor {
    /// A border color with the given prefix and the standard SGR reset as suffix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: "\u{1b}[0m".to_string(),
        }
    }

    pub fn with_suffix(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

/// Formatting options for [`format_cells`](crate::format_cells) and [`Table`](crate::Table).
///
/// The struct's `Default` matches the one-shot formatting functions: no padding around
/// cells. [`TableOptions::bordered`] is the bordered-table variant with one pad character
/// on each side of every cell, and is what [`Table::new`](crate::Table::new) uses.
#[derive(Clone, Debug, PartialEq, Builder)]
#[builder(build_fn(validate = "Self::check", error = "ConfigError"))]
pub struct TableOptions {
    /// Per-column horizontal alignment. A list shorter than the table is extended by
    /// repeating its last element, so a one-element list aligns every column.
    #[builder(default = "vec![Align::Left]")]
    pub align: Vec<Align>,
    /// Per-column vertical alignment; same extension rule as `align`.
    #[builder(default = "vec![VAlign::Top]")]
    pub valign: Vec<VAlign>,
    /// Padding character. Must occupy exactly one terminal column.
    #[builder(default = "' '")]
    pub pad: char,
    /// Fixed margin of `pad` characters to the left of every cell.
    #[builder(default = "0")]
    pub pad_left: usize,
    /// Fixed margin of `pad` characters to the right of every cell.
    #[builder(default = "0")]
    pub pad_right: usize,
    /// Horizontal rule character.
    #[builder(default = "'-'")]
    pub hborder: char,
    /// Vertical border character.
    #[builder(default = "'|'")]
    pub vborder: char,
    /// Intersection glyphs, three rows of three: top-left/top-mid/top-right,
    /// mid-left/center/mid-right, bottom-left/bottom-mid/bottom-right.
    #[builder(default = "['+'; 9]")]
    pub iborder: [char; 9],
    /// Color wrapping applied to borders (not cell content).
    #[builder(default, setter(strip_option))]
    pub border_color: Option<BorderColor>,
    /// Measure cell widths with Unicode East-Asian widths rather than character counts.
    #[builder(default = "true")]
    pub unicode: bool,
    /// Strip ANSI color sequences when measuring cell widths.
    #[builder(default = "true")]
    pub ansi: bool,
    /// Marker appended where a table is cut off by `screen_width`.
    #[builder(default = "\">\".to_string()", setter(into))]
    pub ellipsis: String,
    /// Maximum display width of the rendered table; columns that do not fit are
    /// dropped and replaced with the ellipsis marker.
    #[builder(default, setter(strip_option))]
    pub screen_width: Option<usize>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            align: vec![Align::Left],
            valign: vec![VAlign::Top],
            pad: ' ',
            pad_left: 0,
            pad_right: 0,
            hborder: '-',
            vborder: '|',
            iborder: ['+'; 9],
            border_color: None,
            unicode: true,
            ansi: true,
            ellipsis: ">".to_string(),
            screen_width: None,
        }
    }
}

impl TableOptions {
    /// Defaults for bordered tables: one pad character on each side of every cell.
    pub fn bordered() -> Self {
        Self {
            pad_left: 1,
            pad_right: 1,
            ..Self::default()
        }
    }

    pub fn builder() -> TableOptionsBuilder {
        TableOptionsBuilder::default()
    }

    /// Checks the constraints that the field types cannot express.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        check_pad(self.pad)?;
        if self.align.is_empty() {
            return Err(ConfigError::EmptyAlign);
        }
        if self.valign.is_empty() {
            return Err(ConfigError::EmptyValign);
        }
        check_screen_width(self.screen_width)?;
        Ok(())
    }
}

impl TableOptionsBuilder {
    /// Sets `hborder`, `vborder` and `iborder` from a preset style.
    pub fn border_style(&mut self, style: BorderStyle) -> &mut Self {
        let (h, v, i) = style.glyphs();
        self.hborder = Some(h);
        self.vborder = Some(v);
        self.iborder = Some(i);
        self
    }

    /// Broadcasts a single glyph to all nine intersection positions.
    pub fn iborder_all(&mut self, glyph: char) -> &mut Self {
        self.iborder = Some([glyph; 9]);
        self
    }

    fn check(&self) -> Result<(), ConfigError> {
        if let Some(pad) = self.pad {
            check_pad(pad)?;
        }
        if let Some(ref align) = self.align {
            if align.is_empty() {
                return Err(ConfigError::EmptyAlign);
            }
        }
        if let Some(ref valign) = self.valign {
            if valign.is_empty() {
                return Err(ConfigError::EmptyValign);
            }
        }
        if let Some(screen_width) = self.screen_width {
            check_screen_width(screen_width)?;
        }
        Ok(())
    }
}

fn check_pad(pad: char) -> Result<(), ConfigError> {
    let mut buf = [0u8; 4];
    if display_width(pad.encode_utf8(&mut buf), true, false) != 1 {
        return Err(ConfigError::InvalidPad(pad));
    }
    Ok(())
}

fn check_screen_width(screen_width: Option<usize>) -> Result<(), ConfigError> {
    match screen_width {
        Some(0) => Err(ConfigError::InvalidScreenWidth),
        _ => Ok(()),
    }
}

/// A configuration constraint violation, reported before any formatting work happens.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The pad character does not occupy exactly one terminal column.
    InvalidPad(char),
    /// `align` has no entries, so there is no default alignment to extend.
    EmptyAlign,
    /// `valign` has no entries.
    EmptyValign,
    /// `screen_width` was set to zero.
    InvalidScreenWidth,
    /// A required builder field was never set. Unreachable in practice: every
    /// field has a default.
    UninitializedField(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPad(pad) => {
                write!(f, "pad must be exactly one display column wide, got {pad:?}")
            }
            ConfigError::EmptyAlign => f.write_str("align must contain at least one alignment"),
            ConfigError::EmptyValign => f.write_str("valign must contain at least one alignment"),
            ConfigError::InvalidScreenWidth => {
                f.write_str("screen_width must be a positive integer")
            }
            ConfigError::UninitializedField(field) => {
                write!(f, "field {field} was not initialized")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<derive_builder::UninitializedFieldError> for ConfigError {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        ConfigError::UninitializedField(err.field_name())
    }
}
