use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;

use super::components::{button_line, checklist_lines, field_line, heading, render_panel};
use crate::app::form::Phase;
use crate::app::theme::Theme;
use crate::screens::RolesManager;
use crate::screens::roles::RolesFocus;

pub fn render_roles(f: &mut Frame, area: Rect, m: &RolesManager, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(5)])
        .split(area);
    let focus = m.focus();

    let mut top = vec![
        field_line("Account ID", &m.account_id, focus == RolesFocus::AccountId, theme),
        button_line("Search", focus == RolesFocus::Search, m.phase != Phase::Searching, theme),
    ];
    if let Some(account) = &m.account {
        top.push(Line::raw(format!(
            "  {} ({})  {} role(s)",
            account.name_or_empty(),
            account.login_or_empty(),
            m.held.len()
        )));
        top.push(button_line("Refresh", focus == RolesFocus::Refresh, m.phase != Phase::Searching, theme));
    }
    top.push(button_line("Reset", focus == RolesFocus::Reset, true, theme));
    render_panel(f, rows[0], "Account", top, theme);

    if m.account.is_none() {
        render_panel(f, rows[1], "Roles", vec![Line::raw("  search for an account first")], theme);
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let mut add = vec![heading("Available", theme)];
    add.extend(checklist_lines(
        &m.add_candidates(),
        &m.to_add,
        focus == RolesFocus::AddList,
        Some(&m.catalog_state),
        "account already holds every role",
        theme,
    ));
    add.push(Line::raw(""));
    let label = if m.granting { "Granting…" } else { "Grant selected" };
    add.push(button_line(label, focus == RolesFocus::Grant, !m.granting && !m.to_add.is_empty(), theme));
    render_panel(f, cols[0], "Grant", add, theme);

    let mut remove = vec![heading("Held", theme)];
    remove.extend(checklist_lines(
        m.remove_candidates(),
        &m.to_remove,
        focus == RolesFocus::RemoveList,
        None,
        "account holds no roles",
        theme,
    ));
    remove.push(Line::raw(""));
    let label = if m.revoking { "Revoking…" } else { "Revoke selected" };
    remove.push(button_line(label, focus == RolesFocus::Revoke, !m.revoking && !m.to_remove.is_empty(), theme));
    render_panel(f, cols[1], "Revoke", remove, theme);
}
