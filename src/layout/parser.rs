use crate::error::{Result, UiError};
use crate::style::{Style, StyledText};
use crate::terminal::TerminalDriver;
use crate::widget::{TextInput, Widget};

/// Ordered widget list plus the derived focus-order list of inputs.
///
/// Built once per session, either by [`Layout::parse`] or programmatically
/// through [`Layout::push`]. The focus list stores widget-list indices in
/// registration order; the first registered input starts active.
#[derive(Debug, Default)]
pub struct Layout {
    widgets: Vec<Widget>,
    inputs: Vec<usize>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    /// Append a widget, registering inputs in focus order. The first input
    /// is activated immediately.
    pub fn push(&mut self, mut widget: Widget) {
        if let Widget::Input(ref mut input) = widget {
            if self.inputs.is_empty() {
                input.set_active(true);
            }
            self.inputs.push(self.widgets.len());
        }
        self.widgets.push(widget);
    }

    pub fn with(mut self, widget: Widget) -> Self {
        self.push(widget);
        self
    }

    pub(crate) fn into_parts(self) -> (Vec<Widget>, Vec<usize>) {
        (self.widgets, self.inputs)
    }

    /// Parse a layout description: repeated `Kind {\n key: value\n }` blocks.
    ///
    /// Kind names resolve against a closed set; property keys either belong
    /// to the reserved layout set (translated into spacing directives around
    /// the widget) or bind to the widget's own fields. Values are literals
    /// optionally pipe-suffixed with style identifiers resolved through the
    /// driver's name table.
    ///
    /// Fail-fast: any fault aborts with no partial widget list.
    pub fn parse(text: &str, driver: &dyn TerminalDriver) -> Result<Self> {
        let mut layout = Layout::new();
        let mut lines = text.lines();

        while let Some(raw) = lines.next() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let kind = line
                .strip_suffix('{')
                .map(str::trim)
                .ok_or_else(|| UiError::Malformed(line.to_string()))?;

            let mut props = Vec::new();
            loop {
                let Some(prop_raw) = lines.next() else {
                    return Err(UiError::Malformed(format!("{kind} block is not closed")));
                };
                let prop = prop_raw.trim();
                if prop == "}" {
                    break;
                }
                if prop.is_empty() {
                    continue;
                }
                let (key, value) = prop
                    .split_once(':')
                    .ok_or_else(|| UiError::Malformed(prop.to_string()))?;
                props.push((key.trim().to_string(), value.trim().to_string()));
            }

            append_block(&mut layout, kind, &props, driver)?;
        }

        Ok(layout)
    }
}

/// Translate one parsed block into directives plus its widget.
fn append_block(
    layout: &mut Layout,
    kind: &str,
    props: &[(String, String)],
    driver: &dyn TerminalDriver,
) -> Result<()> {
    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut inline = false;
    let mut fields = Vec::new();

    for (key, raw) in props {
        let value = Value::parse(raw, driver)?;
        match key.as_str() {
            "padding-top" => before.push(Widget::RowGap(value.as_count(key)?)),
            "padding-bottom" => after.push(Widget::RowGap(value.as_count(key)?)),
            "padding-left" => before.push(Widget::ColGap(value.as_count(key)?)),
            "padding-right" => after.push(Widget::ColGap(value.as_count(key)?)),
            "margin-left" => before.push(Widget::AbsoluteCol(value.as_count(key)?)),
            "margin-right" => after.push(Widget::AbsoluteCol(value.as_count(key)?)),
            "inline" => inline = value.as_flag(key)?,
            _ => fields.push((key.as_str(), value)),
        }
    }

    let widget = build_widget(kind, fields)?;

    for directive in before {
        layout.push(directive);
    }
    if inline {
        layout.push(Widget::JoinPrevious);
    }
    layout.push(widget);
    for directive in after {
        layout.push(directive);
    }
    Ok(())
}

/// Closed per-kind field schema, validated here rather than discovered at
/// runtime.
fn build_widget(kind: &str, fields: Vec<(&str, Value)>) -> Result<Widget> {
    match kind {
        "Label" => {
            let mut text = StyledText::default();
            for (key, value) in fields {
                match key {
                    "text" => text = StyledText::new(value.literal, value.styles),
                    other => return Err(unknown_property(kind, other)),
                }
            }
            Ok(Widget::Label(text))
        }
        "Input" => {
            let mut prompt = StyledText::default();
            let mut placeholder = StyledText::default();
            let mut masked = false;
            for (key, value) in fields {
                match key {
                    "prompt" => prompt = StyledText::new(value.literal, value.styles),
                    "placeholder" => placeholder = StyledText::new(value.literal, value.styles),
                    "masked" => masked = value.as_flag(key)?,
                    other => return Err(unknown_property(kind, other)),
                }
            }
            Ok(Widget::Input(TextInput::new(prompt, placeholder, masked)))
        }
        other => Err(UiError::UnknownWidgetKind(other.to_string())),
    }
}

fn unknown_property(kind: &str, key: &str) -> UiError {
    UiError::UnknownProperty {
        kind: kind.to_string(),
        key: key.to_string(),
    }
}

/// A literal plus the style pipeline resolved from its pipe suffixes.
struct Value {
    literal: String,
    styles: Vec<Style>,
}

impl Value {
    fn parse(raw: &str, driver: &dyn TerminalDriver) -> Result<Self> {
        let mut parts = split_pipes(raw).into_iter();
        let literal = unquote(parts.next().unwrap_or_default().trim());
        let mut styles = Vec::new();
        for name in parts {
            let name = name.trim();
            let style = driver
                .resolve_style(name)
                .ok_or_else(|| UiError::UnknownStyle(name.to_string()))?;
            styles.push(style);
        }
        Ok(Self { literal, styles })
    }

    fn as_count(&self, key: &str) -> Result<u16> {
        self.literal
            .parse()
            .map_err(|_| UiError::Malformed(format!("{key}: {}", self.literal)))
    }

    fn as_flag(&self, key: &str) -> Result<bool> {
        match self.literal.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(UiError::Malformed(format!("{key}: {}", self.literal))),
        }
    }
}

/// Split a value on `|`, leaving pipes inside double quotes alone.
fn split_pipes(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in raw.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '|' if !in_quotes => parts.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    parts.push(current);
    parts
}

fn unquote(text: &str) -> String {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::AnsiDriver;

    fn parse(text: &str) -> Result<Layout> {
        Layout::parse(text, &AnsiDriver::new())
    }

    #[test]
    fn unknown_kind_fails() {
        let err = parse("Foo {\n}").unwrap_err();
        assert!(matches!(err, UiError::UnknownWidgetKind(kind) if kind == "Foo"));
    }

    #[test]
    fn unknown_property_fails() {
        let err = parse("Label {\n gravity: 9\n}").unwrap_err();
        assert!(matches!(
            err,
            UiError::UnknownProperty { kind, key } if kind == "Label" && key == "gravity"
        ));
    }

    #[test]
    fn unknown_style_fails() {
        let err = parse("Label {\n text: \"hi\" | sparkle\n}").unwrap_err();
        assert!(matches!(err, UiError::UnknownStyle(name) if name == "sparkle"));
    }

    #[test]
    fn style_pipes_compose_in_order() {
        let layout = parse("Label {\n text: \"hi\" | bold | red\n}").unwrap();
        let Widget::Label(text) = &layout.widgets()[0] else {
            panic!("expected a label");
        };
        assert_eq!(text.text, "hi");
        assert_eq!(text.styles.len(), 2);
    }

    #[test]
    fn reserved_keys_become_directives_around_the_widget() {
        let layout = parse(
            "Label {\n text: \"x\"\n padding-top: 2\n margin-left: 4\n padding-bottom: 3\n}",
        )
        .unwrap();
        let widgets = layout.widgets();
        assert!(matches!(widgets[0], Widget::RowGap(2)));
        assert!(matches!(widgets[1], Widget::AbsoluteCol(4)));
        assert!(matches!(widgets[2], Widget::Label(_)));
        assert!(matches!(widgets[3], Widget::RowGap(3)));
    }

    #[test]
    fn inline_inserts_join_previous_immediately_before() {
        let layout =
            parse("Label {\n text: \"a\"\n}\nLabel {\n text: \"b\"\n inline: true\n}").unwrap();
        let widgets = layout.widgets();
        assert!(matches!(widgets[1], Widget::JoinPrevious));
        assert!(matches!(widgets[2], Widget::Label(_)));
    }

    #[test]
    fn first_input_is_activated_on_registration() {
        let layout = parse(
            "Input {\n prompt: \"Username - \"\n}\nInput {\n prompt: \"Password - \"\n masked: true\n}",
        )
        .unwrap();
        assert_eq!(layout.inputs().len(), 2);
        let Widget::Input(first) = &layout.widgets()[layout.inputs()[0]] else {
            panic!("expected an input");
        };
        let Widget::Input(second) = &layout.widgets()[layout.inputs()[1]] else {
            panic!("expected an input");
        };
        assert!(first.active());
        assert!(!second.active());
    }

    #[test]
    fn unclosed_block_is_malformed() {
        assert!(matches!(
            parse("Label {\n text: \"x\"").unwrap_err(),
            UiError::Malformed(_)
        ));
    }

    #[test]
    fn quoted_pipe_is_not_a_style_separator() {
        let layout = parse("Label {\n text: \"a|b\"\n}").unwrap();
        let Widget::Label(text) = &layout.widgets()[0] else {
            panic!("expected a label");
        };
        assert_eq!(text.text, "a|b");
    }
}
