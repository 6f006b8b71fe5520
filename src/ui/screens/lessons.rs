use crate::core::app::App;
use crate::core::presentation::{capitalize, format_short_date};
use crate::ui::screens::{render_input, render_placeholder};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

pub fn render(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let screen = &app.lessons;
    if render_placeholder(f, area, &screen.podcasts, "lessons", theme) {
        return;
    }
    let Some(podcasts) = screen.podcasts.ready() else {
        return;
    };
    if podcasts.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No lessons are available yet.", theme.muted)),
            area,
        );
        return;
    }

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(area);

    let items: Vec<ListItem> = podcasts
        .iter()
        .map(|podcast| {
            let mut meta = Vec::new();
            if let Some(mentor) = &podcast.mentor_name {
                meta.push(mentor.clone());
            }
            if let Some(duration) = &podcast.duration {
                meta.push(duration.clone());
            }
            ListItem::new(vec![
                Line::from(podcast.title.clone()),
                Line::from(Span::styled(format!("  {}", meta.join(" · ")), theme.muted)),
            ])
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.input_border_focused)
                .title(Span::styled(" Lessons ", theme.title)),
        )
        .highlight_style(theme.selection)
        .highlight_symbol("› ");
    let mut state = ListState::default().with_selected(Some(screen.cursor));
    f.render_stateful_widget(list, list_area, &mut state);

    render_detail(f, detail_area, app, theme);
}

fn render_detail(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let screen = &app.lessons;
    let Some(podcast) = screen.selected() else {
        return;
    };
    let draft_height = if screen.draft.is_some() { 3 } else { 0 };
    let [about, reviews_area, draft_area] = Layout::vertical([
        Constraint::Length(8),
        Constraint::Min(3),
        Constraint::Length(draft_height),
    ])
    .areas(area);

    let mut lines = vec![Line::from(Span::styled(podcast.title.clone(), theme.title))];
    let mut tags = Vec::new();
    if let Some(category) = &podcast.category {
        tags.push(capitalize(category));
    }
    if let Some(level) = podcast.difficulty_level {
        tags.push(format!("Level {level}"));
    }
    if !tags.is_empty() {
        lines.push(Line::from(Span::styled(tags.join(" · "), theme.muted)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(podcast.description.clone()));
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(theme.muted)),
        about,
    );

    let title = match screen.average_rating() {
        Some(average) => format!(" Reviews · {average:.1} average "),
        None => " Reviews ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.muted)
        .title(Span::styled(title, theme.accent));
    let inner = block.inner(reviews_area);
    f.render_widget(block, reviews_area);
    if !render_placeholder(f, inner, &screen.reviews, "reviews", theme) {
        if let Some(reviews) = screen.reviews.ready() {
            let mut lines = Vec::new();
            if reviews.is_empty() {
                lines.push(Line::from(Span::styled(
                    "No reviews yet. Press w to write the first one.",
                    theme.muted,
                )));
            }
            for review in reviews {
                let mut heading = vec![Span::styled(stars(review.rating), theme.accent)];
                if let Some(created) = &review.created_at {
                    heading.push(Span::styled(
                        format!("  {}", format_short_date(created)),
                        theme.muted,
                    ));
                }
                lines.push(Line::from(heading));
                if !review.review_text.is_empty() {
                    lines.push(Line::from(review.review_text.clone()));
                }
                lines.push(Line::from(""));
            }
            f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        }
    }

    if let Some(draft) = &screen.draft {
        let label = format!("Your review {}", stars(draft.rating));
        render_input(f, draft_area, &label, &draft.text, true, theme);
    }
}
