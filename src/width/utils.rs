//! Terminal display width helpers.
//!
//! Rendered widget lines carry ANSI style prefixes, so column bookkeeping in
//! the positioning pass has to measure the visible cells only.

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_width() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn ansi_prefixes_do_not_count() {
        assert_eq!(display_width("\x1b[1m\x1b[31mhey\x1b[0m"), 3);
    }
}
