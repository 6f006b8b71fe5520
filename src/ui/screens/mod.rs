//! Drawing code for each route.

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod lessons;
pub mod onboarding;
pub mod profile;
pub mod timeline;

use crate::core::resource::Resource;
use crate::ui::theme::Theme;
use crate::utils::text_field::TextField;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Single-line bordered input; places the terminal cursor when focused.
pub fn render_input(
    f: &mut Frame,
    area: Rect,
    title: &str,
    field: &TextField,
    focused: bool,
    theme: &Theme,
) {
    let border = if focused {
        theme.input_border_focused
    } else {
        theme.input_border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title.to_string(), border));
    let inner_width = area.width.saturating_sub(2) as usize;
    let before_cursor = field.display_up_to_cursor();
    let cursor_col = UnicodeWidthStr::width(before_cursor.as_str());
    // Keep the cursor visible by scrolling long values horizontally.
    let offset = cursor_col.saturating_sub(inner_width.saturating_sub(1));
    let paragraph = Paragraph::new(field.display())
        .block(block)
        .scroll((0, offset as u16));
    f.render_widget(paragraph, area);

    if focused {
        let x = area.x + 1 + (cursor_col - offset) as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Draw the loading or error state of `resource`. Returns `true` when
/// something was drawn and the caller should stop.
pub fn render_placeholder<T>(
    f: &mut Frame,
    area: Rect,
    resource: &Resource<T>,
    what: &str,
    theme: &Theme,
) -> bool {
    let lines = match resource {
        Resource::Ready(_) => return false,
        Resource::Loading => vec![Line::from(Span::styled(
            format!("Loading {what}…"),
            theme.muted,
        ))],
        Resource::Failed(message) => vec![
            Line::from(Span::styled(format!("Could not load {what}."), theme.error)),
            Line::from(Span::styled(message.clone(), theme.muted)),
            Line::from(""),
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("r", theme.accent),
                Span::raw(" to try again."),
            ]),
        ],
    };
    let height = lines.len() as u16;
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, centered(area, area.width, height));
    true
}

pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
