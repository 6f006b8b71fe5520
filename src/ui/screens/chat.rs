use crate::api::ChatMessage;
use crate::core::app::App;
use crate::core::presentation::format_time_of_day;
use crate::ui::screens::{render_input, render_placeholder};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let screen = &app.chat;
    let title = match &screen.story_context {
        Some(_) => " Your guide · story conversation ",
        None => " Your guide ",
    };
    let [transcript, input] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.muted)
        .title(Span::styled(title, theme.title));
    let inner = block.inner(transcript);
    f.render_widget(block, transcript);

    if render_placeholder(f, inner, &screen.history, "your conversation", theme) {
        return;
    }
    let Some(history) = screen.history.ready() else {
        return;
    };

    let mut lines = Vec::new();
    if history.is_empty() {
        lines.push(Line::from(Span::styled(
            "Share what's on your mind. Your guide is listening.",
            theme.muted,
        )));
    }
    for message in history {
        lines.extend(message_lines(message, theme));
    }
    if screen.sending {
        lines.push(Line::from(Span::styled("Guide is reflecting…", theme.muted)));
    }

    let total = wrapped_height(&lines, inner.width);
    let bottom = total.saturating_sub(inner.height);
    let top = bottom.saturating_sub(screen.scroll.min(bottom));
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((top, 0));
    f.render_widget(paragraph, inner);

    let label = if screen.sending {
        "Waiting for a reply"
    } else {
        "Message"
    };
    render_input(f, input, label, &screen.input, !screen.sending, theme);
}

fn message_lines<'a>(message: &'a ChatMessage, theme: &Theme) -> Vec<Line<'a>> {
    let (speaker, style) = if message.is_user {
        ("You", theme.user_text)
    } else {
        ("Guide", theme.assistant_text)
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(speaker, style.add_modifier(ratatui::style::Modifier::BOLD)),
        Span::styled(
            format!("  {}", format_time_of_day(&message.timestamp)),
            theme.muted,
        ),
    ])];
    lines.extend(
        message
            .message
            .lines()
            .map(|text| Line::from(Span::styled(text, style))),
    );
    lines.push(Line::from(""));
    lines
}

/// Rows `lines` occupy once wrapped to `width` columns.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| {
            let columns: usize = line
                .spans
                .iter()
                .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
                .sum();
            columns.div_ceil(width).max(1)
        })
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}
