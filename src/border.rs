use crate::options::TableOptions;
use crate::str_width::display_width;

/// The three horizontal rules of a table, plus the column count that survived
/// screen-width truncation (if any).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Rules {
    pub top: String,
    pub middle: String,
    pub bottom: String,
    /// `Some(n)`: only the first `n` columns fit the configured screen width; data
    /// rows must be sliced to `n` cells and end in the ellipsis marker.
    pub truncate_at: Option<usize>,
}

impl Rules {
    pub fn right_edge(&self, options: &TableOptions) -> String {
        if self.truncate_at.is_some() {
            options.ellipsis.clone()
        } else {
            options.vborder.to_string()
        }
    }
}

/// Builds the top/middle/bottom rules from the display widths of the first formatted
/// row's cells (which already include the pad margins).
///
/// With a screen width set, each rule accumulates columns left to right and stops
/// before the segment that would push it past `screen_width` minus the ellipsis; the
/// rule then ends in the ellipsis instead of its right-edge glyph.
pub(crate) fn build_rules(col_widths: &[usize], options: &TableOptions) -> Rules {
    let ellipsis_width = display_width(&options.ellipsis, options.unicode, options.ansi);
    let mut truncate_at = None;

    let mut rules = (0..3).map(|band| {
        let glyphs = &options.iborder[band * 3..band * 3 + 3];
        let mut rule = String::new();
        let mut truncated = false;
        for (idx, &width) in col_widths.iter().enumerate() {
            let mut candidate = rule.clone();
            candidate.push(if idx == 0 { glyphs[0] } else { glyphs[1] });
            for _ in 0..width {
                candidate.push(options.hborder);
            }
            if let Some(screen_width) = options.screen_width {
                // the rule itself is measured unicode- and ansi-aware regardless of
                // the table's own flags
                let budget = screen_width.saturating_sub(ellipsis_width);
                if display_width(&candidate, true, true) > budget {
                    truncate_at = Some(idx);
                    truncated = true;
                    break;
                }
            }
            rule = candidate;
        }
        if truncated || truncate_at.is_some() {
            rule.push_str(&options.ellipsis);
        } else {
            rule.push(glyphs[2]);
        }
        match &options.border_color {
            Some(color) => format!("{}{}{}", color.prefix, rule, color.suffix),
            None => rule,
        }
    });

    let top = rules.next().unwrap_or_default();
    let middle = rules.next().unwrap_or_default();
    let bottom = rules.next().unwrap_or_default();
    Rules {
        top,
        middle,
        bottom,
        truncate_at,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::options::{BorderColor, BorderStyle, TableOptions};

    #[test]
    fn ascii_rules() {
        let rules = build_rules(&[3, 2], &TableOptions::default());
        assert_eq!("+---+--+", rules.top);
        assert_eq!(rules.top, rules.middle);
        assert_eq!(rules.top, rules.bottom);
        assert_eq!(None, rules.truncate_at);
    }

    #[test]
    fn unicode_rules_use_the_nine_glyph_table() {
        let options = TableOptions::builder()
            .border_style(BorderStyle::Unicode)
            .build()
            .unwrap();
        let rules = build_rules(&[3, 2], &options);
        assert_eq!("┌───┬──┐", rules.top);
        assert_eq!("├───┼──┤", rules.middle);
        assert_eq!("└───┴──┘", rules.bottom);
    }

    #[test]
    fn screen_width_truncates_and_ends_in_ellipsis() {
        let options = TableOptions::builder().screen_width(12).build().unwrap();
        let rules = build_rules(&[5, 5, 5], &options);
        assert_eq!(Some(1), rules.truncate_at);
        assert_eq!("+----->", rules.top);
        assert_eq!(">", rules.right_edge(&options));
    }

    #[test]
    fn screen_width_wider_than_table_changes_nothing() {
        let options = TableOptions::builder().screen_width(80).build().unwrap();
        let rules = build_rules(&[3, 2], &options);
        assert_eq!(None, rules.truncate_at);
        assert_eq!("+---+--+", rules.top);
    }

    #[test]
    fn screen_narrower_than_first_column_truncates_to_zero() {
        let options = TableOptions::builder().screen_width(3).build().unwrap();
        let rules = build_rules(&[10], &options);
        assert_eq!(Some(0), rules.truncate_at);
        assert_eq!(">", rules.top);
    }

    #[test]
    fn border_color_wraps_whole_rule() {
        let options = TableOptions::builder()
            .border_color(BorderColor::new("\u{1b}[36m"))
            .build()
            .unwrap();
        let rules = build_rules(&[1], &options);
        assert_eq!("\u{1b}[36m+-+\u{1b}[0m", rules.top);
    }

    #[test]
    fn colored_rule_still_measures_within_screen_width() {
        let options = TableOptions::builder()
            .border_color(BorderColor::new("\u{1b}[36m"))
            .screen_width(6)
            .build()
            .unwrap();
        let rules = build_rules(&[3, 3], &options);
        // "+---" fits in 5 columns, the second column does not
        assert_eq!(Some(1), rules.truncate_at);
        assert_eq!("\u{1b}[36m+--->\u{1b}[0m", rules.top);
    }
}
