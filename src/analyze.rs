use crate::str_width::{display_width, split_lines};
use std::fmt::Display;

/// The measurement pass over a batch of rows: per-column maximum display widths and
/// per-row line counts, plus the rows themselves normalized to a uniform cell count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Analysis {
    /// The analyzed rows, each padded on the right with empty cells up to the widest
    /// row seen. When analysis was seeded, this holds only the new batch.
    pub rows: Vec<Vec<String>>,
    /// Maximum display width per column, over every row ever analyzed.
    pub max_widths: Vec<usize>,
    /// Line count of the tallest cell per row (at least 1), one entry per row ever
    /// analyzed; the new batch's entries come last.
    pub max_heights: Vec<usize>,
}

/// Measures a batch of rows from scratch.
///
/// Cells are coerced to text via [`Display`]. A row shorter than the widest row in the
/// batch is padded with empty cells on the right; the table's column count is the
/// maximum row length, not a fixed schema.
pub fn analyze<I, R, C>(rows: I, unicode: bool, ansi: bool) -> Analysis
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = C>,
    C: Display,
{
    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(|cell| cell.to_string()).collect())
        .collect();
    analyze_seeded(rows, Vec::new(), Vec::new(), unicode, ansi)
}

/// Measures a new batch of rows on top of a previous analysis.
///
/// `max_widths` folds element-wise (columns only ever widen); `max_heights` entries for
/// the batch are appended after the seed, keyed by absolute row index. The returned
/// `rows` contain only the new batch, normalized against the global column count.
pub(crate) fn analyze_seeded(
    rows: Vec<Vec<String>>,
    seed_widths: Vec<usize>,
    seed_heights: Vec<usize>,
    unicode: bool,
    ansi: bool,
) -> Analysis {
    let mut max_widths = seed_widths;
    let mut max_heights = seed_heights;
    let mut rows = rows;

    for row in &rows {
        let mut height = 1;
        for (idx, cell) in row.iter().enumerate() {
            if max_widths.len() <= idx {
                max_widths.resize(idx + 1, 0);
            }
            let lines = split_lines(cell);
            for line in &lines {
                let width = display_width(line, unicode, ansi);
                if width > max_widths[idx] {
                    max_widths[idx] = width;
                }
            }
            height = height.max(lines.len());
        }
        max_heights.push(height);
    }

    let num_cells = max_widths.len();
    for row in &mut rows {
        while row.len() < num_cells {
            row.push(String::new());
        }
    }

    Analysis {
        rows,
        max_widths,
        max_heights,
    }
}
