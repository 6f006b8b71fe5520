use crate::core::app::App;
use crate::core::onboarding::OnboardingPhase;
use crate::core::presentation::capitalize;
use crate::ui::screens::{centered, render_placeholder};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let screen = &app.onboarding;
    if render_placeholder(f, area, &screen.flow, "the questionnaire", theme) {
        return;
    }
    let Some(flow) = screen.flow.ready() else {
        return;
    };

    if flow.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "No questions are available right now.",
            theme.muted,
        ))
        .alignment(Alignment::Center);
        f.render_widget(paragraph, centered(area, area.width, 1));
        return;
    }

    let index = match flow.phase() {
        OnboardingPhase::Displaying(index) => index,
        OnboardingPhase::Submitting | OnboardingPhase::Reloaded => {
            let paragraph = Paragraph::new(Span::styled(
                "Saving your answers…",
                theme.muted,
            ))
            .alignment(Alignment::Center);
            f.render_widget(paragraph, centered(area, area.width, 1));
            return;
        }
    };
    let Some(question) = flow.current_question() else {
        return;
    };

    let panel = centered(area, 72.min(area.width), area.height);
    let [progress, heading, options, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(panel);

    let ratio = (index + 1) as f64 / flow.len() as f64;
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(theme.muted))
        .gauge_style(theme.accent)
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("Question {} of {}", index + 1, flow.len()));
    f.render_widget(gauge, progress);

    let mut lines = vec![Line::from(Span::styled(question.question.clone(), theme.title))];
    if let Some(category) = &question.category {
        lines.push(Line::from(Span::styled(capitalize(category), theme.muted)));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), heading);

    let items: Vec<ListItem> = question
        .options
        .iter()
        .enumerate()
        .map(|(number, option)| ListItem::new(format!("{}. {option}", number + 1)))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).border_style(theme.muted))
        .highlight_style(theme.selection)
        .highlight_symbol("› ");
    let mut state = ListState::default().with_selected(flow.selected());
    f.render_stateful_widget(list, options, &mut state);

    let hint = match (&screen.submit_error, flow.is_last()) {
        (Some(error), _) => Line::from(Span::styled(error.clone(), theme.error)),
        (None, true) => Line::from(Span::styled("Enter to finish", theme.accent)),
        (None, false) => Line::from(Span::styled("Enter for the next question", theme.muted)),
    };
    f.render_widget(Paragraph::new(hint).wrap(Wrap { trim: true }), footer);
}
