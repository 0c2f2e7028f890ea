use crate::style::{StyledText, paint};

/// Render frames per blink cycle; the cursor glyph is visible during the
/// first half.
pub const BLINK_FRAMES: u8 = 12;

const CURSOR_GLYPH: char = '█';
const MASK_CHAR: char = '*';

/// Per-field buffer, cursor and blink state machine.
///
/// The cursor offset is re-clamped into `[0, buffer.len()]` after every
/// mutation. Masked fields render one mask character per stored character and
/// never expose the literal buffer.
#[derive(Debug, Clone)]
pub struct TextInput {
    prompt: StyledText,
    placeholder: StyledText,
    masked: bool,
    buffer: Vec<char>,
    cursor: usize,
    blink_phase: u8,
    active: bool,
}

impl TextInput {
    pub fn new(prompt: StyledText, placeholder: StyledText, masked: bool) -> Self {
        Self {
            prompt,
            placeholder,
            masked,
            buffer: Vec::new(),
            cursor: 0,
            blink_phase: 0,
            active: false,
        }
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
        if active {
            // Fresh focus always starts with a visible cursor.
            self.blink_phase = 0;
        }
    }

    /// Current buffer contents as typed, regardless of masking.
    pub fn value(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Insert a printable run at the cursor and advance past it.
    pub fn insert(&mut self, run: &str) {
        self.clamp_cursor();
        for ch in run.chars() {
            self.buffer.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    /// Delete the character before the cursor; no-op at offset zero.
    pub fn backspace(&mut self) {
        self.clamp_cursor();
        if self.cursor > 0 {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
    }

    /// Delete the character at the cursor, if any.
    pub fn delete_forward(&mut self) {
        self.clamp_cursor();
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    /// Move the cursor by `delta`, clamped into the buffer bounds.
    pub fn move_cursor(&mut self, delta: isize) {
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, self.buffer.len() as isize) as usize;
    }

    /// Advance the blink counter one render frame, wrapping at the frame
    /// rate.
    pub fn advance_blink(&mut self) {
        self.blink_phase = (self.blink_phase + 1) % BLINK_FRAMES;
    }

    fn cursor_visible(&self) -> bool {
        self.blink_phase < BLINK_FRAMES / 2
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.buffer.len());
    }

    fn shown_text(&self) -> String {
        if self.masked {
            std::iter::repeat(MASK_CHAR).take(self.buffer.len()).collect()
        } else {
            self.buffer.iter().collect()
        }
    }

    /// Compose the field's full rendered line.
    ///
    /// Empty buffer: prompt plus placeholder in the placeholder style, no
    /// cursor glyph. Otherwise the (possibly masked) text, with the blink
    /// glyph splitting it at the cursor while the field is active.
    pub fn render_line(&self) -> String {
        let mut line = paint(&self.prompt.styles, &self.prompt.text);

        if self.buffer.is_empty() {
            line.push_str(&self.placeholder.render());
            return line;
        }

        let shown: Vec<char> = self.shown_text().chars().collect();
        if self.active {
            let split = self.cursor.min(shown.len());
            let pre: String = shown[..split].iter().collect();
            let post: String = shown[split..].iter().collect();
            line.push_str(&paint(&self.prompt.styles, &pre));
            if self.cursor_visible() {
                line.push(CURSOR_GLYPH);
            }
            line.push_str(&paint(&self.prompt.styles, &post));
        } else {
            let text: String = shown.iter().collect();
            line.push_str(&paint(&self.prompt.styles, &text));
        }
        line
    }
}
