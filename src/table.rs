use crate::analyze::{analyze_seeded, Analysis};
use crate::border::{build_rules, Rules};
use crate::fmt_cells::layout_rows;
use crate::options::{ConfigError, TableOptions};
use crate::str_width::display_width;
use std::collections::HashMap;
use std::fmt::Display;

/// An append-only table accumulator with an incremental render cache.
///
/// Rows go in via [`append`](Table::append), horizontal rules between rows via
/// [`separator`](Table::separator), and [`render`](Table::render) produces the
/// bordered text. Re-rendering after appends only formats the new rows, unless a new
/// row widened a column, in which case everything is relaid from scratch.
///
/// ```
/// use tabularize::Table;
///
/// let mut table = Table::new();
/// table.append(["name", "count"]);
/// table.separator();
/// table.append(["apples", "7"]);
/// assert_eq!(
///     [
///         "+--------+-------+",
///         "| name   | count |",
///         "+--------+-------+",
///         "| apples | 7     |",
///         "+--------+-------+",
///     ]
///     .join("\n"),
///     table.render().unwrap().unwrap(),
/// );
/// ```
pub struct Table {
    options: TableOptions,
    rows: Vec<Vec<String>>,
    seps: HashMap<usize, usize>,
    cache: Option<RenderCache>,
}

/// The previous render and the analysis it was built from. Owned by the table and
/// replaced wholesale on update; dropped entirely on invalidation.
struct RenderCache {
    max_widths: Vec<usize>,
    max_heights: Vec<usize>,
    rules: Rules,
    /// How many rows of the log `buffer` covers.
    num_rows: usize,
    /// Top rule, covered rows with their separators, and any trailing separator
    /// rules. The bottom rule is never stored; it is appended on return.
    buffer: String,
    /// How many separator rules at the `num_rows` boundary are already in `buffer`.
    last_seps: usize,
}

impl Table {
    /// A table with [`TableOptions::bordered`] defaults.
    pub fn new() -> Self {
        Self::with_valid_options(TableOptions::bordered())
    }

    /// A table with the given options, validated eagerly.
    pub fn with_options(options: TableOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self::with_valid_options(options))
    }

    fn with_valid_options(options: TableOptions) -> Self {
        Self {
            options,
            rows: Vec::new(),
            seps: HashMap::new(),
            cache: None,
        }
    }

    /// Appends one row. Cells are coerced to text immediately; no layout work happens
    /// until [`render`](Table::render).
    pub fn append<R, C>(&mut self, row: R)
    where
        R: IntoIterator<Item = C>,
        C: Display,
    {
        self.rows.push(row.into_iter().map(|cell| cell.to_string()).collect());
    }

    /// Requests a horizontal rule at the current position. Repeated calls at the same
    /// position accumulate.
    pub fn separator(&mut self) {
        *self.seps.entry(self.rows.len()).or_insert(0) += 1;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the whole table. Returns `Ok(None)` if no rows were ever appended.
    ///
    /// On any failure the cache is cleared before the error propagates, so the next
    /// call starts from a consistent full rebuild.
    pub fn render(&mut self) -> Result<Option<String>, ConfigError> {
        if self.rows.is_empty() {
            return Ok(None);
        }
        match self.render_dirty() {
            Ok(rendered) => Ok(Some(rendered)),
            Err(err) => {
                self.cache = None;
                Err(err)
            }
        }
    }

    fn render_dirty(&mut self) -> Result<String, ConfigError> {
        self.options.validate()?;
        let (unicode, ansi) = (self.options.unicode, self.options.ansi);

        // Analyze the suffix the cache has not seen. If any column grew, every cached
        // line for it was padded to a now-insufficient width: drop the cache and
        // re-analyze the entire log.
        let mut num_cached = self.cache.as_ref().map_or(0, |c| c.num_rows);
        let mut analysis = analyze_seeded(
            self.rows[num_cached..].to_vec(),
            self.cache.as_ref().map_or(Vec::new(), |c| c.max_widths.clone()),
            self.cache.as_ref().map_or(Vec::new(), |c| c.max_heights.clone()),
            unicode,
            ansi,
        );
        if let Some(cache) = &self.cache {
            let grew = analysis
                .max_widths
                .iter()
                .enumerate()
                .any(|(idx, &width)| width > cache.max_widths.get(idx).copied().unwrap_or(0));
            if grew {
                self.cache = None;
                num_cached = 0;
                analysis = analyze_seeded(self.rows.clone(), Vec::new(), Vec::new(), unicode, ansi);
            }
        }

        // Separators marked at the covered boundary since the last render.
        let (mut buffer, cached_rules, boundary_emitted) = match self.cache.take() {
            Some(cache) => {
                let mut buffer = cache.buffer;
                let due = self.seps_at(num_cached);
                for _ in cache.last_seps..due {
                    buffer.push_str(&cache.rules.middle);
                    buffer.push('\n');
                }
                (buffer, Some(cache.rules), due)
            }
            None => (String::new(), None, 0),
        };

        // Nothing appended since last time: the cached buffer is the whole table.
        let cached_rules = match cached_rules {
            Some(rules) if num_cached == self.rows.len() => {
                let rendered = format!("{buffer}{}", rules.bottom);
                self.install_cache(analysis, rules, buffer, boundary_emitted);
                return Ok(rendered);
            }
            other => other,
        };

        let laid = layout_rows(
            &analysis.rows,
            &analysis.max_widths,
            &analysis.max_heights[num_cached..],
            &self.options,
        );

        let rules = match cached_rules {
            Some(rules) => rules,
            None => {
                let col_widths: Vec<usize> = laid
                    .first()
                    .map(|row| {
                        row.iter()
                            .map(|cell| {
                                let first_line = cell.first().map(String::as_str).unwrap_or("");
                                display_width(first_line, unicode, ansi)
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                let rules = build_rules(&col_widths, &self.options);
                buffer.push_str(&rules.top);
                buffer.push('\n');
                rules
            }
        };

        let color = self.options.border_color.clone();
        let (prefix, suffix) = match &color {
            Some(color) => (color.prefix.as_str(), color.suffix.as_str()),
            None => ("", ""),
        };
        let vborder = format!("{prefix}{}{suffix}", self.options.vborder);
        let right_edge = format!("{prefix}{}{suffix}", rules.right_edge(&self.options));

        for (offset, row) in laid.iter().enumerate() {
            let abs = num_cached + offset;
            let due = self.seps_at(abs);
            let already = if offset == 0 { boundary_emitted } else { 0 };
            for _ in already..due {
                buffer.push_str(&rules.middle);
                buffer.push('\n');
            }

            let cells: &[Vec<String>] = match rules.truncate_at {
                Some(count) => &row[..count.min(row.len())],
                None => row,
            };
            let height = cells.first().map_or(1, Vec::len);
            for line in 0..height {
                if !cells.is_empty() {
                    buffer.push_str(&vborder);
                }
                for (idx, cell) in cells.iter().enumerate() {
                    if idx > 0 {
                        buffer.push_str(&vborder);
                    }
                    buffer.push_str(&cell[line]);
                }
                buffer.push_str(&right_edge);
                buffer.push('\n');
            }
        }

        let trailing = self.seps_at(self.rows.len());
        for _ in 0..trailing {
            buffer.push_str(&rules.middle);
            buffer.push('\n');
        }

        let rendered = format!("{buffer}{}", rules.bottom);
        self.install_cache(analysis, rules, buffer, trailing);
        Ok(rendered)
    }

    fn install_cache(
        &mut self,
        analysis: Analysis,
        rules: Rules,
        buffer: String,
        last_seps: usize,
    ) {
        self.cache = Some(RenderCache {
            max_widths: analysis.max_widths,
            max_heights: analysis.max_heights,
            rules,
            num_rows: self.rows.len(),
            buffer,
            last_seps,
        });
    }

    fn seps_at(&self, boundary: usize) -> usize {
        self.seps.get(&boundary).copied().unwrap_or(0)
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::options::{Align, BorderStyle};

    fn render(table: &mut Table) -> String {
        table.render().unwrap().unwrap()
    }

    #[test]
    fn empty_table_renders_nothing() {
        let mut table = Table::new();
        assert_eq!(None, table.render().unwrap());
    }

    #[test]
    fn double_render_is_idempotent() {
        let mut table = Table::new();
        table.append(["a", "bb"]);
        table.append(["ccc", "d"]);
        let first = render(&mut table);
        assert_eq!(first, render(&mut table));
    }

    #[test]
    fn incremental_render_matches_batch_render() {
        let rows = [
            vec!["a", "bb", "c"],
            vec!["dd", "e"],
            vec!["f", "gg", "hhh\nh"],
            vec!["i"],
        ];

        let mut incremental = Table::new();
        let mut last = String::new();
        for row in &rows {
            incremental.append(row.clone());
            last = render(&mut incremental);
        }

        let mut batch = Table::new();
        for row in &rows {
            batch.append(row.clone());
        }
        assert_eq!(render(&mut batch), last);
    }

    #[test]
    fn widening_append_forces_full_rebuild() {
        let mut table = Table::new();
        table.append(["a"]);
        render(&mut table);
        table.append(["wider than before"]);
        let rebuilt = render(&mut table);

        let mut fresh = Table::new();
        fresh.append(["a"]);
        fresh.append(["wider than before"]);
        assert_eq!(render(&mut fresh), rebuilt);
    }

    #[test]
    fn narrower_append_reuses_cached_widths() {
        let mut table = Table::new();
        table.append(["wide row here"]);
        let first = render(&mut table);
        table.append(["x"]);
        let second = render(&mut table);
        // same top rule, and the old row's line is unchanged within the output
        assert!(second.starts_with(first.lines().next().unwrap()));
        assert!(second.contains("| wide row here |"));
        assert!(second.contains("| x             |"));
    }

    #[test]
    fn separators_render_once_per_mark_in_order() {
        let mut table = Table::new();
        table.separator();
        table.append(["a"]);
        table.append(["b"]);
        table.separator();
        let expected = [
            "+---+",
            "+---+",
            "| a |",
            "| b |",
            "+---+",
            "+---+",
        ]
        .join("\n");
        assert_eq!(expected, render(&mut table));
    }

    #[test]
    fn separator_marks_accumulate() {
        let mut table = Table::new();
        table.append(["a"]);
        table.separator();
        table.separator();
        table.append(["b"]);
        let expected = [
            "+---+",
            "| a |",
            "+---+",
            "+---+",
            "| b |",
            "+---+",
        ]
        .join("\n");
        assert_eq!(expected, render(&mut table));
    }

    #[test]
    fn separator_after_render_appends_only_the_delta() {
        let mut table = Table::new();
        table.append(["a"]);
        render(&mut table);
        table.separator();
        let with_sep = render(&mut table);
        let expected = ["+---+", "| a |", "+---+", "+---+"].join("\n");
        assert_eq!(expected, with_sep);
        // and again: still exactly one separator
        assert_eq!(expected, render(&mut table));
    }

    #[test]
    fn trailing_separator_then_append_keeps_its_position() {
        let mut incremental = Table::new();
        incremental.append(["a"]);
        render(&mut incremental);
        incremental.separator();
        render(&mut incremental);
        incremental.append(["b"]);
        let out = render(&mut incremental);

        let mut batch = Table::new();
        batch.append(["a"]);
        batch.separator();
        batch.append(["b"]);
        assert_eq!(render(&mut batch), out);
    }

    #[test]
    fn column_count_grows_with_widest_row() {
        let mut table = Table::new();
        table.append(["a"]);
        table.append(["b", "c"]);
        let expected = [
            "+---+---+",
            "| a |   |",
            "| b | c |",
            "+---+---+",
        ]
        .join("\n");
        assert_eq!(expected, render(&mut table));
    }

    #[test]
    fn zero_width_new_column_keeps_the_cache() {
        let mut incremental = Table::new();
        incremental.append(["a"]);
        render(&mut incremental);
        // the new column is all-empty, so no cached width grows and the buffered
        // rows stay as rendered; only the new row carries the extra cell
        incremental.append(["b", ""]);
        let expected = ["+---+", "| a |", "| b |  |", "+---+"].join("\n");
        assert_eq!(expected, render(&mut incremental));

        let mut batch = Table::new();
        batch.append(["a"]);
        batch.append(["b", ""]);
        let batch_expected = ["+---+--+", "| a |  |", "| b |  |", "+---+--+"].join("\n");
        assert_eq!(batch_expected, render(&mut batch));
    }

    #[test]
    fn zero_cell_rows_render_only_the_right_edge() {
        let mut table = Table::new();
        table.append(Vec::<String>::new());
        assert_eq!(["+", "|", "+"].join("\n"), render(&mut table));
    }

    #[test]
    fn multiline_rows_render_full_bands() {
        let mut table = Table::new();
        table.append(["x\n\ny", "z"]);
        let expected = [
            "+---+---+",
            "| x | z |",
            "|   |   |",
            "| y |   |",
            "+---+---+",
        ]
        .join("\n");
        assert_eq!(expected, render(&mut table));
    }

    #[test]
    fn unicode_border_style() {
        let mut table = Table::with_options(
            TableOptions::builder()
                .pad_left(1)
                .pad_right(1)
                .border_style(BorderStyle::Unicode)
                .build()
                .unwrap(),
        )
        .unwrap();
        table.append(["a"]);
        table.separator();
        table.append(["b"]);
        let expected = [
            "┌───┐",
            "│ a │",
            "├───┤",
            "│ b │",
            "└───┘",
        ]
        .join("\n");
        assert_eq!(expected, render(&mut table));
    }

    #[test]
    fn screen_width_truncates_rows_and_rules() {
        let mut table = Table::with_options(
            TableOptions::builder()
                .pad_left(1)
                .pad_right(1)
                .screen_width(12)
                .build()
                .unwrap(),
        )
        .unwrap();
        table.append(["aaa", "bbb", "ccc"]);
        let out = render(&mut table);
        let expected = ["+----->", "| aaa >", "+----->"].join("\n");
        assert_eq!(expected, out);
        for line in out.lines() {
            let width = display_width(line, true, true);
            assert!(width <= 12 && width >= 12 - 9, "line width {width}: {line:?}");
            assert!(line.ends_with('>'));
        }
    }

    #[test]
    fn right_alignment_in_bordered_table() {
        let mut table = Table::with_options(
            TableOptions::builder()
                .pad_left(1)
                .pad_right(1)
                .align(vec![Align::Right])
                .build()
                .unwrap(),
        )
        .unwrap();
        table.append(["a", "aa"]);
        table.append(["bbbb", "b"]);
        let expected = [
            "+------+----+",
            "|    a | aa |",
            "| bbbb |  b |",
            "+------+----+",
        ]
        .join("\n");
        assert_eq!(expected, render(&mut table));
    }

    #[test]
    fn failed_options_build_leaves_existing_table_usable() {
        let mut table = Table::new();
        table.append(["a"]);
        let before = render(&mut table);

        let err = TableOptions::builder().pad('あ').build().unwrap_err();
        assert_eq!(ConfigError::InvalidPad('あ'), err);

        assert_eq!(before, render(&mut table));
    }

    #[test]
    fn render_error_clears_cache_and_recovers() {
        let mut table = Table::new();
        table.append(["a"]);
        let good = render(&mut table);

        // break the options behind the validator's back, render, then restore
        table.options.align = vec![];
        assert_eq!(Err(ConfigError::EmptyAlign), table.render());
        table.options.align = vec![Align::Left];

        assert_eq!(good, render(&mut table));
    }
}
