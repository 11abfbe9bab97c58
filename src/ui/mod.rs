pub mod components;
pub mod forms;
pub mod listing;
pub mod roles;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, BackendStatus, Tab};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let mut spans: Vec<Span> = Vec::new();
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let label = format!(" F{} {} ", i + 1, tab.title());
        let style = if *tab == app.active_tab {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(app.theme.header_fg)
        };
        spans.push(Span::styled(label, style));
    }
    spans.push(Span::raw("   "));
    let (backend, colour) = match &app.backend {
        BackendStatus::Unknown => ("backend: checking…".to_string(), app.theme.muted),
        BackendStatus::Healthy { platform_connected: true } => ("backend: ok".to_string(), app.theme.success),
        BackendStatus::Healthy { platform_connected: false } => {
            ("backend: ok, platform offline".to_string(), app.theme.error)
        }
        BackendStatus::Unhealthy(reason) => (format!("backend: down ({reason})"), app.theme.error),
    };
    spans.push(Span::styled(backend, Style::default().fg(colour)));

    let header = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .title("directory-console")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    match app.active_tab {
        Tab::Create => forms::render_create(f, root[1], &app.create, &app.theme),
        Tab::List => listing::render_listing(f, root[1], &app.listing, &app.theme),
        Tab::Update => forms::render_update(f, root[1], &app.update, &app.theme),
        Tab::Roles => roles::render_roles(f, root[1], &app.roles, &app.theme),
        Tab::Delete => forms::render_delete(f, root[1], &app.delete, &app.theme),
    }

    components::render_banner(f, root[2], app.screen().banner(), &app.theme);
    components::render_status_bar(f, root[3], app);
}
