//! Interactive line prompts for CLI subcommands.

use crate::utils::text_field::{edit_action_for_key, EditAction, TextField};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone)]
pub struct PromptError {
    message: String,
}

impl PromptError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PromptError {}

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        PromptError::new(err.to_string())
    }
}

/// Read a password without echoing it. Esc or Ctrl+C cancels.
pub fn prompt_password(prompt: &str) -> Result<String, PromptError> {
    prompt_field(prompt, TextField::masked())
}

pub fn prompt_line(prompt: &str) -> Result<String, PromptError> {
    prompt_field(prompt, TextField::new())
}

fn prompt_field(prompt: &str, mut field: TextField) -> Result<String, PromptError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, event::EnableBracketedPaste)?;

    let result = (|| -> Result<String, PromptError> {
        redraw(prompt, &field)?;
        loop {
            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            let changed = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Enter => break Ok(field.take()),
                    KeyCode::Esc => break Err(PromptError::new("Cancelled by user")),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break Err(PromptError::new("Cancelled by user"));
                    }
                    _ => edit_action_for_key(&key)
                        .map(|action| field.apply(action))
                        .unwrap_or(false),
                },
                Event::Paste(text) => {
                    let submit = text.contains('\n');
                    let changed = field.apply(EditAction::Paste(text));
                    if submit {
                        break Ok(field.take());
                    }
                    changed
                }
                _ => false,
            };
            if changed {
                redraw(prompt, &field)?;
            }
        }
    })();

    let raw_result = disable_raw_mode();
    let paste_result = execute!(stdout, event::DisableBracketedPaste);
    println!();

    let value = result?;
    raw_result?;
    paste_result?;
    Ok(value)
}

fn redraw(prompt: &str, field: &TextField) -> io::Result<()> {
    let display = field.display();
    print!("\r\x1b[K{prompt}{display}");
    let columns = UnicodeWidthStr::width(prompt)
        + UnicodeWidthStr::width(field.display_up_to_cursor().as_str());
    if columns > 0 {
        print!("\r\x1b[{columns}C");
    } else {
        print!("\r");
    }
    io::stdout().flush()
}
