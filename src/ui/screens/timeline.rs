use crate::api::{FulfillmentAnalytics, FulfillmentEntry};
use crate::core::app::screens::{next_decision_status, DECISION_STATUSES};
use crate::core::app::App;
use crate::core::presentation::{capitalize, format_short_date};
use crate::ui::screens::{render_input, render_placeholder};
use crate::ui::theme::{band_style, Theme};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let screen = &app.timeline;
    if render_placeholder(f, area, &screen.data, "your timeline", theme) {
        return;
    }
    let Some(data) = screen.data.ready() else {
        return;
    };

    let composer_height = if screen.composer.is_some() { 3 } else { 0 };
    let history_height = if data.history.is_empty() {
        0
    } else {
        HISTORY_ROWS as u16 + 2
    };
    let [analytics, decisions, history, composer] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(3),
        Constraint::Length(history_height),
        Constraint::Length(composer_height),
    ])
    .areas(area);

    render_analytics(f, analytics, &data.analytics, theme);
    render_history(f, history, &data.history, theme);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_focused)
        .title(Span::styled(" Decisions ", theme.title));
    if data.decisions.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No decisions recorded. Press n to add one.",
                theme.muted,
            ))
            .block(block),
            decisions,
        );
    } else {
        let items: Vec<ListItem> = data
            .decisions
            .iter()
            .map(|decision| {
                let status = decision
                    .decision_status
                    .as_deref()
                    .unwrap_or(DECISION_STATUSES[0]);
                let mut spans = vec![
                    Span::styled(
                        format!("{:<12}", capitalize(status)),
                        status_style(status, theme),
                    ),
                    Span::raw(decision.decision_title.clone()),
                ];
                if let Some(created) = &decision.created_at {
                    spans.push(Span::styled(
                        format!("  {}", format_short_date(created)),
                        theme.muted,
                    ));
                }
                if next_decision_status(Some(status)).is_none() {
                    spans.push(Span::styled("  ✓", theme.success));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(theme.selection)
            .highlight_symbol("› ");
        let mut state = ListState::default().with_selected(Some(screen.cursor));
        f.render_stateful_widget(list, decisions, &mut state);
    }

    if let Some(field) = &screen.composer {
        render_input(f, composer, "New decision", field, true, theme);
    }
}

/// Check-ins shown under the decisions; the history arrives newest first.
const HISTORY_ROWS: usize = 3;

fn render_history(f: &mut Frame, area: Rect, history: &[FulfillmentEntry], theme: &Theme) {
    if area.height == 0 {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.muted)
        .title(Span::styled(" Recent check-ins ", theme.accent));
    let lines: Vec<Line> = history
        .iter()
        .take(HISTORY_ROWS)
        .map(|entry| {
            let level = entry.fulfillment_level.clamp(0, 100);
            let mut spans = vec![
                Span::styled(
                    format!(
                        "{:<8}",
                        entry.timestamp.as_deref().map(format_short_date).unwrap_or_default()
                    ),
                    theme.muted,
                ),
                Span::styled(format!("{level:>3}% "), band_style(level as f64)),
            ];
            if !entry.notes.is_empty() {
                spans.push(Span::raw(entry.notes.clone()));
            }
            Line::from(spans)
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn status_style(status: &str, theme: &Theme) -> Style {
    match status {
        "implemented" => theme.success,
        "decided" => theme.accent,
        _ => theme.muted,
    }
}

fn trend_arrow(trend: &str) -> &'static str {
    match trend {
        "ascending" => "↗",
        "descending" => "↘",
        _ => "→",
    }
}

fn render_analytics(f: &mut Frame, area: Rect, analytics: &FulfillmentAnalytics, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.muted)
        .title(Span::styled(
            match &analytics.trend {
                Some(trend) => format!(
                    " Fulfillment · {} {} ",
                    trend_arrow(trend),
                    capitalize(trend)
                ),
                None => " Fulfillment ".to_string(),
            },
            theme.accent,
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(inner);
    let metrics = [
        ("Fulfillment", analytics.average_fulfillment),
        ("Happiness", analytics.average_happiness),
        ("Clarity", analytics.average_clarity),
    ];
    for (column, (label, value)) in columns.iter().zip(metrics) {
        let percent = value.clamp(0.0, 100.0);
        let gauge = Gauge::default()
            .gauge_style(band_style(percent))
            .ratio(percent / 100.0)
            .label(format!("{label} {value:.1}"));
        f.render_widget(gauge, *column);
    }
}
