use crossterm::Command;
use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};

/// One named style transform from the terminal driver's name table.
///
/// Transforms serialize to ANSI through crossterm commands; they are never
/// applied to a local terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Fg(Color),
    Attr(Attribute),
}

impl Style {
    /// ANSI prefix enabling this transform.
    pub fn prefix(&self) -> String {
        let mut out = String::new();
        match self {
            Style::Fg(color) => {
                let _ = SetForegroundColor(*color).write_ansi(&mut out);
            }
            Style::Attr(attr) => {
                let _ = SetAttribute(*attr).write_ansi(&mut out);
            }
        }
        out
    }
}

/// ANSI reset suffix closing any open transforms.
pub fn reset() -> String {
    let mut out = String::new();
    let _ = SetAttribute(Attribute::Reset).write_ansi(&mut out);
    out
}

/// Apply an ordered style pipeline to `text`, left to right.
///
/// The transform order is preserved, so repeated renders of the same pipeline
/// produce byte-identical output.
pub fn paint(styles: &[Style], text: &str) -> String {
    if styles.is_empty() || text.is_empty() {
        return text.to_string();
    }
    let mut out = String::new();
    for style in styles {
        out.push_str(&style.prefix());
    }
    out.push_str(text);
    out.push_str(&reset());
    out
}

/// Text plus its ordered style pipeline, resolved once at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    pub text: String,
    pub styles: Vec<Style>,
}

impl StyledText {
    pub fn new(text: impl Into<String>, styles: Vec<Style>) -> Self {
        Self {
            text: text.into(),
            styles,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    pub fn push_style(&mut self, style: Style) {
        self.styles.push(style);
    }

    /// Render the text with its pipeline applied.
    pub fn render(&self) -> String {
        paint(&self.styles, &self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_renders_verbatim() {
        assert_eq!(StyledText::plain("hello").render(), "hello");
    }

    #[test]
    fn pipeline_order_is_preserved() {
        let styled = StyledText::new(
            "x",
            vec![Style::Attr(Attribute::Bold), Style::Fg(Color::Red)],
        );
        let first = styled.render();
        let bold = Style::Attr(Attribute::Bold).prefix();
        let red = Style::Fg(Color::Red).prefix();
        assert!(first.starts_with(&format!("{bold}{red}")));
        // Deterministic across redraws.
        assert_eq!(first, styled.render());
    }

    #[test]
    fn empty_pipeline_skips_reset() {
        assert!(!StyledText::plain("a").render().contains('\x1b'));
    }
}
