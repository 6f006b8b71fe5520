use crate::core::app::screens::AuthMode;
use crate::core::app::App;
use crate::ui::screens::{centered, render_input};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const FORM_WIDTH: u16 = 56;

pub fn render(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let form = &app.auth;
    let fields = form.fields();
    let height = fields.len() as u16 * 3 + 6;
    let outer = centered(area, FORM_WIDTH, height);
    let title = match form.mode {
        AuthMode::Login => " Welcome back ",
        AuthMode::Register => " Begin your journey ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent)
        .title(Span::styled(title, theme.title))
        .title_alignment(Alignment::Center);
    let inner = block.inner(outer);
    f.render_widget(block, outer);

    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(2));
    constraints.push(Constraint::Min(1));
    let rows = Layout::vertical(constraints).split(inner);

    for (index, field) in fields.iter().enumerate() {
        let focused = form.focus == *field && !form.submitting;
        render_input(f, rows[index], field.label(), form.field(*field), focused, theme);
    }

    let message = if form.submitting {
        Line::from(Span::styled(
            match form.mode {
                AuthMode::Login => "Signing in…",
                AuthMode::Register => "Creating your account…",
            },
            theme.muted,
        ))
    } else if let Some(error) = &form.error {
        Line::from(Span::styled(error.clone(), theme.error))
    } else {
        Line::from("")
    };
    f.render_widget(
        Paragraph::new(message).wrap(Wrap { trim: true }),
        rows[fields.len()],
    );

    let switch = match form.mode {
        AuthMode::Login => "New here? Ctrl+T to create an account",
        AuthMode::Register => "Already registered? Ctrl+T to sign in",
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(switch, theme.muted))).alignment(Alignment::Center),
        rows[fields.len() + 1],
    );
}
