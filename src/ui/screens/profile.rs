use crate::core::app::App;
use crate::core::presentation::{format_short_date, initials, wellbeing_level};
use crate::ui::screens::centered;
use crate::ui::theme::{band_style, Theme};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let Some(user) = app.session.current_user() else {
        return;
    };
    let level = user.spiritual_level.unwrap_or(0);

    let mut lines = vec![
        Line::from(Span::styled(format!("( {} )", initials(&user.full_name)), theme.title)),
        Line::from(""),
        Line::from(Span::styled(user.full_name.clone(), theme.title)),
        Line::from(Span::styled(user.email.clone(), theme.muted)),
        Line::from(""),
        Line::from(vec![
            Span::raw("Wellbeing  "),
            Span::styled(
                format!("{} ({level})", wellbeing_level(level)),
                band_style(level as f64),
            ),
        ]),
    ];
    if let Some(created) = &user.created_at {
        lines.push(Line::from(vec![
            Span::raw("Member since  "),
            Span::styled(format_short_date(created), theme.accent),
        ]));
    }
    let active = user.is_active.unwrap_or(true);
    lines.push(Line::from(vec![
        Span::raw("Account  "),
        if active {
            Span::styled("Active", theme.success)
        } else {
            Span::styled("Inactive", theme.error)
        },
    ]));
    lines.push(Line::from(vec![
        Span::raw("Personality profile  "),
        if user.personality_test_completed {
            Span::styled("Complete", theme.success)
        } else {
            Span::styled("Pending", theme.muted)
        },
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("Press "),
        Span::styled("l", theme.accent),
        Span::raw(" to log out"),
    ]));

    let height = lines.len() as u16 + 2;
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.accent)
            .title(Span::styled(" Profile ", theme.title)),
    );
    f.render_widget(paragraph, centered(area, 50, height));
}
