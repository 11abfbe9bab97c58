use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use super::components::{field_line, heading, render_panel};
use crate::app::theme::Theme;
use crate::screens::ListingView;
use crate::screens::listing::{ListingFocus, ListingStatus, UNSUPPORTED_NOTICE};

pub fn render_listing(f: &mut Frame, area: Rect, view: &ListingView, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let filter = vec![field_line("Filter", &view.filter, view.focus == ListingFocus::Filter, theme)];
    render_panel(f, rows[0], "Search", filter, theme);

    let table_focused = view.focus == ListingFocus::Table;
    let visible = view.visible();
    let table_rows = visible.iter().enumerate().map(|(i, a)| {
        let style = if table_focused && i == view.cursor {
            Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        Row::new(vec![
            Cell::from(a.id.to_string()),
            Cell::from(a.name_or_empty().to_string()),
            Cell::from(a.login_or_empty().to_string()),
            Cell::from(a.email_or_empty().to_string()),
            Cell::from(if a.active { "yes" } else { "no" }),
        ])
        .style(style)
    });
    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(30),
        Constraint::Percentage(25),
        Constraint::Percentage(35),
        Constraint::Length(6),
    ];
    let header = Row::new(vec!["ID", "NAME", "LOGIN", "EMAIL", "ACTIVE"])
        .style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD));
    let title = match view.status {
        ListingStatus::Unsupported => format!("Accounts ({UNSUPPORTED_NOTICE})"),
        ListingStatus::Loaded => format!("Accounts ({} shown)", visible.len()),
    };
    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .column_spacing(1);
    f.render_widget(table, body[0]);

    let mut side = Vec::new();
    if let Some(a) = &view.detail {
        side.push(heading(&format!("Account {}", a.id), theme));
        side.push(Line::raw(format!("  Name:  {}", a.name_or_empty())));
        side.push(Line::raw(format!("  Login: {}", a.login_or_empty())));
        side.push(Line::raw(format!("  Email: {}", a.email_or_empty())));
        side.push(Line::raw(""));
    }
    if let Some((id, roles)) = &view.peeked_roles {
        side.push(heading(&format!("Roles of {id}"), theme));
        if roles.is_empty() {
            side.push(Line::raw("  none"));
        }
        for role in roles {
            side.push(Line::raw(format!("  {}", role.label())));
        }
    }
    if side.is_empty() {
        side.push(Line::raw("  Enter: details   Space: roles"));
    }
    render_panel(f, body[1], "Details", side, theme);
}
