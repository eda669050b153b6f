//! Single-line text input state shared by the dialog forms.
//!
//! The input tracks its cursor as a character index so editing stays
//! correct for non-ASCII content.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Editable text field with cursor tracking
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    /// Current content
    pub content: String,
    /// Cursor position as a character offset into `content`
    pub cursor: usize,
    /// Placeholder shown when empty
    pub placeholder: String,
    /// Field label rendered before the value
    pub label: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set initial content, placing the cursor at the end
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self.cursor = self.content.chars().count();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Byte offset matching the cursor's character offset
    fn byte_offset(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.content.len())
    }

    /// Insert a character at the cursor
    pub fn insert(&mut self, c: char) {
        let offset = self.byte_offset();
        self.content.insert(offset, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let offset = self.byte_offset();
            self.content.remove(offset);
        }
    }

    /// Delete the character at the cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let offset = self.byte_offset();
            self.content.remove(offset);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Clear content and reset the cursor
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Split content at the cursor for rendering
    fn split_at_cursor(&self) -> (&str, Option<char>, &str) {
        let offset = self.byte_offset();
        let (before, rest) = self.content.split_at(offset);
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) => (before, Some(c), chars.as_str()),
            None => (before, None, rest),
        }
    }
}

/// Render a labeled input line, showing a block cursor when focused
pub fn render_field(frame: &mut Frame, area: Rect, input: &TextInput, focused: bool) {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = Vec::new();
    if !input.label.is_empty() {
        spans.push(Span::styled(format!("{:<18}", input.label), label_style));
    }

    if input.is_empty() && !focused {
        spans.push(Span::styled(
            input.placeholder.clone(),
            Style::default().fg(Color::DarkGray),
        ));
    } else if focused {
        let (before, at_cursor, after) = input.split_at_cursor();
        spans.push(Span::styled(
            before.to_string(),
            Style::default().fg(Color::White),
        ));
        match at_cursor {
            Some(c) => {
                spans.push(Span::styled(
                    c.to_string(),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                ));
                spans.push(Span::styled(
                    after.to_string(),
                    Style::default().fg(Color::White),
                ));
            }
            None => {
                spans.push(Span::styled(
                    " ".to_string(),
                    Style::default().bg(Color::Cyan),
                ));
            }
        }
    } else {
        spans.push(Span::styled(
            input.content.clone(),
            Style::default().fg(Color::White),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_value() {
        let mut input = TextInput::new();
        input.insert('a');
        input.insert('b');
        input.insert('c');
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn test_insert_mid_content() {
        let mut input = TextInput::new().content("ac");
        input.move_left();
        input.insert('b');
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = TextInput::new().content("ab");
        input.move_start();
        input.backspace();
        assert_eq!(input.value(), "ab");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut input = TextInput::new().content("abc");
        input.move_start();
        input.delete();
        assert_eq!(input.value(), "bc");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::new().content("caf");
        input.insert('é');
        assert_eq!(input.value(), "café");
        input.backspace();
        assert_eq!(input.value(), "caf");
        input.move_start();
        input.insert('à');
        assert_eq!(input.value(), "àcaf");
        input.delete();
        assert_eq!(input.value(), "àaf");
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut input = TextInput::new().content("hello");
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor, 0);
    }
}
