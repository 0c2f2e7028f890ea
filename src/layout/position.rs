use crate::widget::Widget;
use crate::width::display_width;

/// Screen cell assigned to one displayable widget, plus the rendered width
/// recorded for `JoinPrevious` column math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: u16,
    pub col: u16,
    pub width: u16,
}

/// Single forward flow pass over the widget list.
///
/// Maintains a `(row, col)` cursor and the previous displayable widget's
/// placement. Labels and inputs claim the cursor cell and advance one row;
/// gaps and column directives only steer the cursor. `JoinPrevious` cancels
/// the pending row advance so the next widget appends directly after the
/// previous widget's text.
///
/// The result is deterministic for a given widget list and is computed once;
/// redraws reuse the cached placements.
pub fn solve(widgets: &[Widget]) -> Vec<Option<Placement>> {
    let mut placements: Vec<Option<Placement>> = vec![None; widgets.len()];
    let mut row: u16 = 0;
    let mut col: u16 = 0;
    let mut previous: Option<Placement> = None;
    let mut join_pending = false;

    for (idx, widget) in widgets.iter().enumerate() {
        match widget {
            Widget::RowGap(rows) => {
                row = row.saturating_add(rows.saturating_sub(1));
            }
            Widget::ColGap(cols) => {
                col = col.saturating_add(*cols);
            }
            Widget::AbsoluteCol(target) => {
                col = *target;
            }
            Widget::JoinPrevious => {
                join_pending = true;
            }
            Widget::Label(_) | Widget::Input(_) => {
                if join_pending {
                    if let Some(prev) = previous {
                        row = prev.row;
                        col = prev.col.saturating_add(prev.width);
                    }
                    join_pending = false;
                }

                let width = widget
                    .render_line()
                    .map(|line| display_width(&line) as u16)
                    .unwrap_or(0);
                let placement = Placement { row, col, width };
                placements[idx] = Some(placement);
                previous = Some(placement);
                row = row.saturating_add(1);
                col = 0;
            }
        }
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyledText;

    fn label(text: &str) -> Widget {
        Widget::Label(StyledText::plain(text))
    }

    #[test]
    fn rows_advance_monotonically() {
        let widgets = vec![label("one"), label("two"), label("three")];
        let placements = solve(&widgets);
        assert_eq!(placements[0].unwrap().row, 0);
        assert_eq!(placements[1].unwrap().row, 1);
        assert_eq!(placements[2].unwrap().row, 2);
        assert!(placements.iter().all(|p| p.unwrap().col == 0));
    }

    #[test]
    fn row_gap_leaves_blank_rows() {
        let widgets = vec![label("top"), Widget::RowGap(3), label("bottom")];
        let placements = solve(&widgets);
        assert_eq!(placements[2].unwrap().row, 3);
    }

    #[test]
    fn col_gap_and_absolute_col_steer_the_next_widget() {
        let widgets = vec![
            Widget::ColGap(4),
            label("indented"),
            Widget::AbsoluteCol(10),
            label("anchored"),
        ];
        let placements = solve(&widgets);
        assert_eq!(placements[1].unwrap().col, 4);
        let anchored = placements[3].unwrap();
        assert_eq!(anchored.col, 10);
        assert_eq!(anchored.row, 1);
    }

    #[test]
    fn join_previous_appends_after_the_prior_text() {
        let widgets = vec![
            Widget::RowGap(3),
            label("hello"),
            Widget::JoinPrevious,
            label(" world"),
        ];
        let placements = solve(&widgets);
        let first = placements[1].unwrap();
        assert_eq!((first.row, first.col, first.width), (2, 0, 5));
        let joined = placements[3].unwrap();
        assert_eq!((joined.row, joined.col), (2, 5));
    }

    #[test]
    fn flow_resumes_below_a_joined_row() {
        let widgets = vec![
            label("ab"),
            Widget::JoinPrevious,
            label("cd"),
            label("next"),
        ];
        let placements = solve(&widgets);
        assert_eq!(placements[2].unwrap(), Placement { row: 0, col: 2, width: 2 });
        assert_eq!(placements[3].unwrap().row, 1);
    }

    #[test]
    fn width_ignores_ansi_prefixes() {
        use crate::style::Style;
        use crossterm::style::Attribute;
        let widgets = vec![
            Widget::Label(StyledText::new("hey", vec![Style::Attr(Attribute::Bold)])),
            Widget::JoinPrevious,
            label("!"),
        ];
        let placements = solve(&widgets);
        assert_eq!(placements[2].unwrap().col, 3);
    }
}
