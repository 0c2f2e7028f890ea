use crate::style::StyledText;
use crate::widget::input::TextInput;

/// One element of the ordered widget list.
///
/// Creation order is load-bearing: the positioning pass walks the list once,
/// and spacing directives act on whatever displayable widget follows them.
#[derive(Debug, Clone)]
pub enum Widget {
    /// Styled text occupying one row.
    Label(StyledText),
    /// Vertical spacing; a gap of `n` leaves the next widget `n` rows below
    /// the previous one.
    RowGap(u16),
    /// Horizontal spacing before the next widget on the same logical row.
    ColGap(u16),
    /// Sets the next widget's column directly without consuming a row.
    AbsoluteCol(u16),
    /// Fuses the next widget onto the previous widget's row, appended after
    /// its rendered text.
    JoinPrevious,
    /// Focusable text-input field.
    Input(TextInput),
}

impl Widget {
    /// Directives position their neighbours; only labels and inputs occupy
    /// screen cells.
    pub fn is_displayable(&self) -> bool {
        matches!(self, Widget::Label(_) | Widget::Input(_))
    }

    /// Current rendered line for displayable widgets.
    pub fn render_line(&self) -> Option<String> {
        match self {
            Widget::Label(text) => Some(text.render()),
            Widget::Input(input) => Some(input.render_line()),
            _ => None,
        }
    }
}
