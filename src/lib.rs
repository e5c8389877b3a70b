//! Renders two-dimensional data as bordered, aligned, fixed-width text blocks for
//! terminal display.
//!
//! The stateful entry point is [`Table`]: append rows, mark separators, render. Column
//! widths are measured Unicode- and ANSI-aware, cells may span multiple lines, and
//! re-rendering a growing table only formats the rows appended since the last render.
//! For borderless output there is the one-shot [`format_cells`], and the measurement
//! passes underneath it ([`analyze`], [`display_width`]) are public too.
//!
//! ```
//! use tabularize::{Table, TableOptions, BorderStyle};
//!
//! let mut table = Table::with_options(
//!     TableOptions::builder()
//!         .pad_left(1)
//!         .pad_right(1)
//!         .border_style(BorderStyle::Unicode)
//!         .build()?,
//! )?;
//! table.append(["lang", "greeting"]);
//! table.separator();
//! table.append(["en", "hello"]);
//! table.append(["ja", "こんにちは"]);
//! println!("{}", table.render()?.unwrap());
//! # Ok::<(), tabularize::ConfigError>(())
//! ```

mod analyze;
mod border;
mod fmt_cells;
mod options;
mod str_width;
mod table;

pub use analyze::{analyze, Analysis};
pub use fmt_cells::format_cells;
pub use options::{
    Align, BorderColor, BorderStyle, ConfigError, TableOptions, TableOptionsBuilder, VAlign,
};
pub use str_width::display_width;
pub use table::Table;
