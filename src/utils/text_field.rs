//! Single-line text editing shared by the terminal forms and CLI prompts.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
    masked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Paste(String),
    Backspace,
    Delete,
    MoveLeft,
    MoveRight,
    MoveStart,
    MoveEnd,
    DeleteWord,
    Clear,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// What should be drawn: the text itself, or one `*` per character.
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.text.chars().count())
        } else {
            self.text.clone()
        }
    }

    pub fn display_up_to_cursor(&self) -> String {
        self.display().chars().take(self.cursor).collect()
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Apply an edit; returns whether the field changed visibly.
    pub fn apply(&mut self, action: EditAction) -> bool {
        match action {
            EditAction::Insert(c) => {
                let idx = char_to_byte_index(&self.text, self.cursor);
                self.text.insert(idx, c);
                self.cursor += 1;
                true
            }
            EditAction::Paste(text) => {
                let line: String = text
                    .split(['\n', '\r'])
                    .next()
                    .unwrap_or_default()
                    .chars()
                    .filter(|c| !c.is_control())
                    .collect();
                if line.is_empty() {
                    return false;
                }
                let idx = char_to_byte_index(&self.text, self.cursor);
                self.text.insert_str(idx, &line);
                self.cursor += line.chars().count();
                true
            }
            EditAction::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let end = char_to_byte_index(&self.text, self.cursor);
                let start = char_to_byte_index(&self.text, self.cursor - 1);
                self.text.replace_range(start..end, "");
                self.cursor -= 1;
                true
            }
            EditAction::Delete => {
                let start = char_to_byte_index(&self.text, self.cursor);
                if start >= self.text.len() {
                    return false;
                }
                let end = char_to_byte_index(&self.text, self.cursor + 1);
                self.text.replace_range(start..end, "");
                true
            }
            EditAction::MoveLeft => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                true
            }
            EditAction::MoveRight => {
                if self.cursor >= self.text.chars().count() {
                    return false;
                }
                self.cursor += 1;
                true
            }
            EditAction::MoveStart => {
                let moved = self.cursor != 0;
                self.cursor = 0;
                moved
            }
            EditAction::MoveEnd => {
                let end = self.text.chars().count();
                let moved = self.cursor != end;
                self.cursor = end;
                moved
            }
            EditAction::DeleteWord => {
                if self.cursor == 0 {
                    return false;
                }
                let mut chars: Vec<char> = self.text.chars().collect();
                let mut idx = self.cursor.min(chars.len());
                while idx > 0 && chars[idx - 1] == ' ' {
                    idx -= 1;
                }
                while idx > 0 && chars[idx - 1] != ' ' {
                    idx -= 1;
                }
                chars.drain(idx..self.cursor.min(chars.len()));
                self.text = chars.into_iter().collect();
                self.cursor = idx;
                true
            }
            EditAction::Clear => {
                let changed = !self.text.is_empty();
                self.clear();
                changed
            }
        }
    }
}

/// Map a key press to an edit. Keys that submit, cancel or navigate between
/// fields are left to the caller.
pub fn edit_action_for_key(key: &KeyEvent) -> Option<EditAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Backspace => Some(EditAction::Backspace),
        KeyCode::Delete => Some(EditAction::Delete),
        KeyCode::Left => Some(EditAction::MoveLeft),
        KeyCode::Right => Some(EditAction::MoveRight),
        KeyCode::Home => Some(EditAction::MoveStart),
        KeyCode::End => Some(EditAction::MoveEnd),
        KeyCode::Char('a') if ctrl => Some(EditAction::MoveStart),
        KeyCode::Char('e') if ctrl => Some(EditAction::MoveEnd),
        KeyCode::Char('w') if ctrl => Some(EditAction::DeleteWord),
        KeyCode::Char('u') if ctrl => Some(EditAction::Clear),
        KeyCode::Char(c) if !ctrl && !c.is_control() => Some(EditAction::Insert(c)),
        _ => None,
    }
}

fn char_to_byte_index(input: &str, char_index: usize) -> usize {
    input
        .char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(input.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextField {
        let mut field = TextField::new();
        for c in text.chars() {
            field.apply(EditAction::Insert(c));
        }
        field
    }

    #[test]
    fn insert_in_the_middle() {
        let mut field = typed("ac");
        field.apply(EditAction::MoveLeft);
        field.apply(EditAction::Insert('b'));
        assert_eq!(field.text(), "abc");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn backspace_handles_multibyte_characters() {
        let mut field = typed("café");
        assert!(field.apply(EditAction::Backspace));
        assert_eq!(field.text(), "caf");
        assert!(!TextField::new().apply(EditAction::Backspace));
    }

    #[test]
    fn delete_word_stops_at_whitespace() {
        let mut field = typed("deep breath now");
        field.apply(EditAction::DeleteWord);
        assert_eq!(field.text(), "deep breath ");
        assert_eq!(field.cursor(), 12);
    }

    #[test]
    fn paste_keeps_first_line_only() {
        let mut field = TextField::new();
        field.apply(EditAction::Paste("secret\nignored".to_string()));
        assert_eq!(field.text(), "secret");
    }

    #[test]
    fn masked_field_hides_text() {
        let mut field = TextField::masked();
        field.apply(EditAction::Paste("hunter2".to_string()));
        assert_eq!(field.display(), "*******");
        assert_eq!(field.text(), "hunter2");
    }

    #[test]
    fn control_chords_map_to_edits() {
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        let plain = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::NONE);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(edit_action_for_key(&ctrl_u), Some(EditAction::Clear));
        assert_eq!(edit_action_for_key(&plain), Some(EditAction::Insert('u')));
        assert_eq!(edit_action_for_key(&enter), None);
    }

    #[test]
    fn take_resets_the_field() {
        let mut field = typed("hello");
        assert_eq!(field.take(), "hello");
        assert!(field.is_empty());
        assert_eq!(field.cursor(), 0);
    }
}
