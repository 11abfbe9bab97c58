use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;

use super::components::{
    button_line, checkbox_line, checklist_lines, field_line, heading, render_panel,
};
use crate::app::form::Phase;
use crate::app::theme::Theme;
use crate::screens::create::{CreateField, CreateFocus};
use crate::screens::delete::DeleteFocus;
use crate::screens::edit::{EditField, EditFocus};
use crate::screens::{CreateAccountForm, DeleteAccountForm, UpdateAccountForm};

fn split(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area)
}

fn phase_note(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Searching => Some("  searching…"),
        Phase::Submitting => Some("  submitting…"),
        _ => None,
    }
}

pub fn render_create(f: &mut Frame, area: Rect, form: &CreateAccountForm, theme: &Theme) {
    let cols = split(area);
    let focus = form.focus();

    let mut lines = vec![heading("Account", theme)];
    for field in &CreateField::ALL[..4] {
        lines.push(field_line(field.label(), form.field(*field), focus == CreateFocus::Field(*field), theme));
    }
    lines.push(Line::raw(""));
    lines.push(heading("External directory", theme));
    for field in &CreateField::ALL[4..] {
        lines.push(field_line(field.label(), form.field(*field), focus == CreateFocus::Field(*field), theme));
    }
    lines.push(Line::raw(""));
    lines.push(button_line("Reset", focus == CreateFocus::Reset, true, theme));
    let label = if form.busy { "Creating…" } else { "Create" };
    lines.push(button_line(label, focus == CreateFocus::Submit, !form.busy, theme));
    render_panel(f, cols[0], "New account", lines, theme);

    let roles = checklist_lines(
        &form.roles,
        &form.selection,
        focus == CreateFocus::Roles,
        Some(&form.catalog),
        "no roles defined",
        theme,
    );
    render_panel(f, cols[1], "Roles", roles, theme);
}

pub fn render_update(f: &mut Frame, area: Rect, form: &UpdateAccountForm, theme: &Theme) {
    let cols = split(area);
    let focus = form.focus();

    let mut lines = vec![
        heading("Find account", theme),
        field_line("Account ID", &form.account_id, focus == EditFocus::AccountId, theme),
        button_line("Search", focus == EditFocus::Search, form.phase != Phase::Searching, theme),
    ];
    if let Some(note) = phase_note(form.phase) {
        lines.push(Line::raw(note));
    }
    if let Some(id) = form.loaded {
        lines.push(Line::raw(""));
        lines.push(heading(&format!("Editing account {id} (blank fields are left unchanged)"), theme));
        for field in EditField::ALL {
            lines.push(field_line(field.label(), form.field(field), focus == EditFocus::Field(field), theme));
        }
        lines.push(Line::raw(""));
        lines.push(button_line("Save", focus == EditFocus::Submit, form.phase == Phase::Found, theme));
    }
    lines.push(button_line("Reset", focus == EditFocus::Reset, true, theme));
    render_panel(f, cols[0], "Update account", lines, theme);

    let roles = if form.is_found() {
        checklist_lines(
            &form.roles,
            &form.selection,
            focus == EditFocus::Roles,
            Some(&form.catalog),
            "no roles defined",
            theme,
        )
    } else {
        vec![Line::raw("  search for an account first")]
    };
    render_panel(f, cols[1], "Roles", roles, theme);
}

pub fn render_delete(f: &mut Frame, area: Rect, form: &DeleteAccountForm, theme: &Theme) {
    let focus = form.focus();
    let mut lines = vec![
        heading("Find account", theme),
        field_line("Account ID", &form.account_id, focus == DeleteFocus::AccountId, theme),
        button_line("Search", focus == DeleteFocus::Search, form.phase != Phase::Searching, theme),
    ];
    if let Some(note) = phase_note(form.phase) {
        lines.push(Line::raw(note));
    }
    if let Some(account) = &form.summary {
        lines.push(Line::raw(""));
        lines.push(heading("Account", theme));
        lines.push(Line::raw(format!("  ID:     {}", account.id)));
        lines.push(Line::raw(format!("  Name:   {}", account.name_or_empty())));
        lines.push(Line::raw(format!("  Login:  {}", account.login_or_empty())));
        lines.push(Line::raw(format!("  Email:  {}", account.email_or_empty())));
        lines.push(Line::raw(format!("  Active: {}", if account.active { "yes" } else { "no" })));
        lines.push(Line::raw(format!("  Roles:  {}", account.role_ids.len())));
        lines.push(Line::raw(""));
        lines.push(checkbox_line(
            "I understand this permanently deletes the account",
            form.confirmed,
            focus == DeleteFocus::Confirm,
            theme,
        ));
    }
    lines.push(button_line("Reset", focus == DeleteFocus::Reset, true, theme));
    if form.summary.is_some() {
        lines.push(button_line("Delete", focus == DeleteFocus::Delete, form.can_delete(), theme));
    }
    render_panel(f, area, "Delete account", lines, theme);
}
