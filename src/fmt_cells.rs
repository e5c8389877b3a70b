use crate::analyze::analyze;
use crate::options::{Align, ConfigError, TableOptions, VAlign};
use crate::str_width::{display_width, ljust, rjust, split_lines};
use std::fmt::Display;

/// Formats rows into a padded, aligned cell grid without borders.
///
/// Every cell in a column comes back with the same display width (column maximum plus
/// `pad_left` and `pad_right`), and every cell in a row with the same number of
/// physical lines, joined by `\n`. One-dimensional data works too: each row is any
/// iterable of displayable cells.
///
/// ```
/// use tabularize::{format_cells, TableOptions};
///
/// let grid = format_cells([["a", "bb"], ["ccc", "d"]], &TableOptions::default()).unwrap();
/// assert_eq!(vec!["a  ", "bb"], grid[0]);
/// assert_eq!(vec!["ccc", "d "], grid[1]);
/// ```
pub fn format_cells<I, R, C>(
    rows: I,
    options: &TableOptions,
) -> Result<Vec<Vec<String>>, ConfigError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = C>,
    C: Display,
{
    options.validate()?;
    let analysis = analyze(rows, options.unicode, options.ansi);
    let laid = layout_rows(
        &analysis.rows,
        &analysis.max_widths,
        &analysis.max_heights,
        options,
    );
    Ok(laid
        .into_iter()
        .map(|row| row.into_iter().map(|cell| cell.join("\n")).collect())
        .collect())
}

/// Lays out analyzed rows: each cell becomes its row's full line band, every line
/// padded and aligned to the column width. `heights[i]` is the band height of
/// `rows[i]`.
pub(crate) fn layout_rows(
    rows: &[Vec<String>],
    max_widths: &[usize],
    heights: &[usize],
    options: &TableOptions,
) -> Vec<Vec<Vec<String>>> {
    rows.iter()
        .zip(heights)
        .map(|(row, &max_height)| {
            row.iter()
                .enumerate()
                .map(|(idx, cell)| layout_cell(cell, idx, max_height, max_widths, options))
                .collect()
        })
        .collect()
}

fn layout_cell(
    cell: &str,
    col: usize,
    max_height: usize,
    max_widths: &[usize],
    options: &TableOptions,
) -> Vec<String> {
    let lines = split_lines(cell);
    let offset = match resolve(&options.valign, col) {
        VAlign::Top => 0,
        VAlign::Bottom => max_height.saturating_sub(lines.len()),
        VAlign::Middle => max_height.saturating_sub(lines.len()) / 2,
    };
    let align = resolve(&options.align, col);
    let max_width = max_widths.get(col).copied().unwrap_or(0);

    let mut blank = None;
    (0..max_height)
        .map(|ln| {
            let line = ln.checked_sub(offset).and_then(|i| lines.get(i).copied());
            let line = match line {
                Some(line) => line,
                None => blank.insert(pad_run(options.pad, max_width)).as_str(),
            };
            align_line(line, max_width, align, options)
        })
        .collect()
}

/// Pads one physical line out to its column's width, in display columns.
///
/// Padding is applied by character count, so the target is adjusted by two
/// compensation terms: `alen`, the characters consumed by ANSI color sequences
/// (zero columns, nonzero characters), and the surplus of columns over characters
/// in wide (CJK) text. The compensation terms are measured on the ANSI-stripped
/// text. Centering puts the odd leftover pad character on the right.
fn align_line(text: &str, max_width: usize, align: Align, options: &TableOptions) -> String {
    let raw_chars = text.chars().count();
    let (slen, alen) = if options.ansi {
        let stripped_chars = display_width(text, false, true);
        (stripped_chars, raw_chars - stripped_chars)
    } else {
        (raw_chars, 0)
    };
    let mut w = max_width;
    if options.unicode {
        let visible = display_width(text, true, options.ansi);
        w = w + slen - visible;
    }

    let pad = options.pad;
    let aligned = match align {
        Align::Left => ljust(text, w + alen, pad),
        Align::Right => rjust(text, w + alen, pad),
        Align::Center => {
            let shifted = rjust(text, (w - slen) / 2 + slen + alen, pad);
            ljust(&shifted, w + alen, pad)
        }
    };

    let mut out = String::with_capacity(aligned.len() + options.pad_left + options.pad_right);
    for _ in 0..options.pad_left {
        out.push(pad);
    }
    out.push_str(&aligned);
    for _ in 0..options.pad_right {
        out.push(pad);
    }
    out
}

/// Per-column option lookup: a list shorter than the table repeats its last element.
fn resolve<T: Copy + Default>(values: &[T], idx: usize) -> T {
    values
        .get(idx)
        .or(values.last())
        .copied()
        .unwrap_or_default()
}

fn pad_run(pad: char, count: usize) -> String {
    let mut s = String::with_capacity(count);
    for _ in 0..count {
        s.push(pad);
    }
    s
}
