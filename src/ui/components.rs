//! Shared UI components: status bar, banner, form rows and role checklists.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::api::Role;
use crate::app::form::{Banner, BannerKind, CatalogState, Selection, TextInput};
use crate::app::keymap::KeyAction;
use crate::app::theme::Theme;
use crate::app::AppState;

const FOCUS_MARK: &str = "▶ ";
const NO_MARK: &str = "  ";

/// Bottom status bar: endpoint, refresh counter and the main keys.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let key = |a: KeyAction| app.keymap.key_for(a).unwrap_or_else(|| "-".to_string());
    let msg = format!(
        "api: {}  changes:{}  {}/{}: screens  {}: next  {}: activate  {}: toggle  {}: reset  {}: quit",
        app.base_url,
        app.refresh_counter,
        key(KeyAction::ShowCreate),
        key(KeyAction::ShowDelete),
        key(KeyAction::NextField),
        key(KeyAction::Activate),
        key(KeyAction::Toggle),
        key(KeyAction::ResetForm),
        key(KeyAction::Quit),
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

pub fn banner_style(kind: BannerKind, theme: &Theme) -> Style {
    let fg = match kind {
        BannerKind::Success => theme.success,
        BannerKind::Error => theme.error,
        BannerKind::Info => theme.info,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

/// Feedback box under the form.
pub fn render_banner(f: &mut Frame, area: Rect, banner: Option<&Banner>, theme: &Theme) {
    let (text, style) = match banner {
        Some(b) => (b.text.as_str(), banner_style(b.kind, theme)),
        None => ("", Style::default().fg(theme.muted)),
    };
    let p = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    f.render_widget(p, area);
}

fn focus_style(focused: bool, theme: &Theme) -> Style {
    if focused {
        Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    }
}

/// `▶ Label: value_` for a text field.
pub fn field_line(label: &str, input: &TextInput, focused: bool, theme: &Theme) -> Line<'static> {
    let mark = if focused { FOCUS_MARK } else { NO_MARK };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{mark}{label:<22}"), focus_style(focused, theme)),
        Span::styled(format!("{}{cursor}", input.display()), Style::default().fg(theme.text)),
    ])
}

/// `▶ [ Label ]`; greyed out when disabled.
pub fn button_line(label: &str, focused: bool, enabled: bool, theme: &Theme) -> Line<'static> {
    let mark = if focused { FOCUS_MARK } else { NO_MARK };
    let style = if enabled { focus_style(focused, theme) } else { Style::default().fg(theme.muted) };
    Line::from(Span::styled(format!("{mark}[ {label} ]"), style))
}

/// `▶ [x] Label` for a single checkbox.
pub fn checkbox_line(label: &str, checked: bool, focused: bool, theme: &Theme) -> Line<'static> {
    let mark = if focused { FOCUS_MARK } else { NO_MARK };
    let tick = if checked { "[x] " } else { "[ ] " };
    Line::from(Span::styled(format!("{mark}{tick}{label}"), focus_style(focused, theme)))
}

pub fn heading(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    ))
}

/// A role checklist. The cursor row is marked only while the list has focus.
pub fn checklist_lines(
    roles: &[Role],
    selection: &Selection,
    focused: bool,
    catalog: Option<&CatalogState>,
    empty_text: &str,
    theme: &Theme,
) -> Vec<Line<'static>> {
    match catalog {
        Some(CatalogState::Loading) => {
            return vec![Line::from(Span::styled("    loading roles…", Style::default().fg(theme.muted)))];
        }
        Some(CatalogState::Unavailable(reason)) => {
            return vec![
                Line::from(Span::styled("    catalog unavailable", Style::default().fg(theme.error))),
                Line::from(Span::styled(format!("    {reason}"), Style::default().fg(theme.muted))),
            ];
        }
        _ => {}
    }
    if roles.is_empty() {
        return vec![Line::from(Span::styled(format!("    {empty_text}"), Style::default().fg(theme.muted)))];
    }
    roles
        .iter()
        .enumerate()
        .map(|(idx, role)| {
            let on_cursor = focused && idx == selection.cursor();
            let mark = if on_cursor { FOCUS_MARK } else { NO_MARK };
            let tick = if selection.contains(role.id) { "[x] " } else { "[ ] " };
            Line::from(Span::styled(
                format!("  {mark}{tick}{}", role.label()),
                focus_style(on_cursor, theme),
            ))
        })
        .collect()
}

/// Bordered paragraph of prepared lines.
pub fn render_panel(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>, theme: &Theme) {
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn unavailable_catalog_shows_the_reason() {
        let state = CatalogState::Unavailable("connection refused".into());
        let lines = checklist_lines(&[], &Selection::default(), false, Some(&state), "none", &Theme::default());
        let rendered: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(rendered, vec!["    catalog unavailable", "    connection refused"]);
    }

    #[test]
    fn ticked_roles_are_marked() {
        let roles = vec![Role::new(1, "Sales"), Role::new(2, "Stock")];
        let mut selection = Selection::default();
        selection.toggle(2);
        let lines = checklist_lines(&roles, &selection, true, Some(&CatalogState::Ready), "none", &Theme::default());
        assert_eq!(text(&lines[0]), format!("  {FOCUS_MARK}[ ] Sales"));
        assert_eq!(text(&lines[1]), format!("  {NO_MARK}[x] Stock"));
    }
}
