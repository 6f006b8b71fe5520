use crate::core::app::screens::{DashboardData, DashboardFocus};
use crate::core::app::App;
use crate::core::presentation::{capitalize, latest_value};
use crate::ui::screens::{render_input, render_placeholder};
use crate::ui::theme::{band_style, emotion_style, Theme};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let screen = &app.dashboard;
    if render_placeholder(f, area, &screen.data, "your dashboard", theme) {
        return;
    }
    let Some(data) = screen.data.ready() else {
        return;
    };

    let greeting = app
        .session
        .current_user()
        .map(|user| {
            let first = user.full_name.split_whitespace().next().unwrap_or("friend");
            format!("Welcome back, {first}")
        })
        .unwrap_or_else(|| "Welcome back".to_string());

    let composer_height = if screen.composer.is_some() { 3 } else { 0 };
    let [heading, lists, emotions, composer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(composer_height),
    ])
    .areas(area);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(greeting, theme.title))),
        heading,
    );

    let [stories_area, todos_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(lists);
    render_stories(f, stories_area, app, data, theme);
    render_todos(f, todos_area, app, data, theme);
    render_emotions(f, emotions, data, theme);

    if let Some(field) = &screen.composer {
        let story = screen
            .selected_story()
            .map(|story| format!("New task for \"{}\"", story.title))
            .unwrap_or_else(|| "New task".to_string());
        render_input(f, composer, &story, field, true, theme);
    }
}

fn panel<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let style = if focused {
        theme.input_border_focused
    } else {
        theme.muted
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(Span::styled(title, style))
}

fn render_stories(f: &mut Frame, area: Rect, app: &App, data: &DashboardData, theme: &Theme) {
    let screen = &app.dashboard;
    let focused = screen.focus == DashboardFocus::Stories && screen.composer.is_none();
    let block = panel(" Stories ", focused, theme);
    if data.stories.is_empty() {
        let paragraph = Paragraph::new(Span::styled("No stories yet.", theme.muted)).block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = data
        .stories
        .iter()
        .map(|story| {
            let mut title = vec![Span::raw(story.title.clone())];
            if let Some(category) = &story.category {
                title.push(Span::styled(format!("  {}", capitalize(category)), theme.muted));
            }
            let status = match data.progress_for(&story.id) {
                Some(progress) => {
                    let level = progress.acceptance_level.clamp(0, 100);
                    let mut spans = vec![
                        Span::styled(format!("  {level}% "), band_style(level as f64)),
                        Span::styled(capitalize(&progress.status.replace('_', " ")), theme.muted),
                    ];
                    if progress.ai_confirmed {
                        spans.push(Span::styled("  ✓ confirmed", theme.success));
                    }
                    Line::from(spans)
                }
                None => Line::from(Span::styled("  Not started", theme.muted)),
            };
            ListItem::new(vec![Line::from(title), status])
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selection)
        .highlight_symbol("› ");
    // The selected story stays marked while the task list has focus.
    let mut state = ListState::default().with_selected(Some(screen.story_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_todos(f: &mut Frame, area: Rect, app: &App, data: &DashboardData, theme: &Theme) {
    let screen = &app.dashboard;
    let focused = screen.focus == DashboardFocus::Todos && screen.composer.is_none();
    let open = data.todos.iter().filter(|todo| !todo.completed).count();
    let title = format!(" Tasks ({open} open) ");
    let block = panel(&title, focused, theme);
    if data.todos.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "Nothing to do. Press n to add a task.",
            theme.muted,
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = data
        .todos
        .iter()
        .map(|todo| {
            if todo.completed {
                ListItem::new(Line::from(vec![
                    Span::styled("[x] ", theme.success),
                    Span::styled(todo.title.clone(), theme.muted),
                ]))
            } else {
                ListItem::new(Line::from(vec![
                    Span::raw("[ ] "),
                    Span::raw(todo.title.clone()),
                ]))
            }
        })
        .collect();
    let list = List::new(items).block(block);
    let list = if focused {
        list.highlight_style(theme.selection).highlight_symbol("› ")
    } else {
        list
    };
    let mut state = ListState::default().with_selected(focused.then_some(screen.todo_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_emotions(f: &mut Frame, area: Rect, data: &DashboardData, theme: &Theme) {
    let block = panel(" Emotional state ", false, theme);
    let series = match &data.emotions {
        Some(series) if !series.emotions.is_empty() => series,
        other => {
            let notice = if other.is_some() {
                "Chat with your guide to start tracking emotions."
            } else {
                "Emotional state is unavailable right now."
            };
            let paragraph = Paragraph::new(Span::styled(notice, theme.muted)).block(block);
            f.render_widget(paragraph, area);
            return;
        }
    };
    let mut spans = Vec::new();
    for (emotion, points) in &series.emotions {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled("● ", emotion_style(emotion)));
        spans.push(Span::raw(format!("{} {}%", capitalize(emotion), latest_value(points))));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
