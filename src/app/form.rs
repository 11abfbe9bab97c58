//! Form primitives shared by the screens: text inputs, role checklists,
//! banners and the lookup phase.

use crate::api::{AccountId, Role, RoleId};
use crate::error::ValidationError;

/// Single-line text field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    masked: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field whose content is rendered as `*`.
    pub fn masked() -> Self {
        Self { value: String::new(), masked: true }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.value.push(c);
        }
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Trimmed value, or `None` when blank.
    pub fn non_blank(&self) -> Option<String> {
        let t = self.value.trim();
        if t.is_empty() { None } else { Some(t.to_string()) }
    }

    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Parse the field as an account identifier.
    pub fn account_id(&self) -> Result<AccountId, ValidationError> {
        let t = self.value.trim();
        if t.is_empty() {
            return Err(ValidationError::MissingAccountId);
        }
        match t.parse::<AccountId>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(ValidationError::InvalidAccountId(t.to_string())),
        }
    }
}

/// Ordered multi-selection of role ids with a cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    cursor: usize,
    chosen: Vec<RoleId>,
}

impl Selection {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn chosen(&self) -> &[RoleId] {
        &self.chosen
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    pub fn contains(&self, id: RoleId) -> bool {
        self.chosen.contains(&id)
    }

    /// Add `id` if absent, remove it otherwise. Order of first selection is kept.
    pub fn toggle(&mut self, id: RoleId) {
        if let Some(pos) = self.chosen.iter().position(|c| *c == id) {
            self.chosen.remove(pos);
        } else {
            self.chosen.push(id);
        }
    }

    pub fn set(&mut self, ids: Vec<RoleId>) {
        self.chosen = ids;
    }

    pub fn clear(&mut self) {
        self.chosen.clear();
    }

    /// Drop chosen ids that are no longer offered and clamp the cursor.
    pub fn retain_offered(&mut self, options: &[Role]) {
        self.chosen.retain(|id| options.iter().any(|r| r.id == *id));
        self.clamp(options.len());
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

/// Where the role catalog stands for a screen that needs it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogState {
    #[default]
    Loading,
    Ready,
    Unavailable(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
    Info,
}

/// Feedback line shown under a form. Replaced by the next action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: BannerKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: BannerKind::Error, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: BannerKind::Info, text: text.into() }
    }

    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }
}

impl From<ValidationError> for Banner {
    fn from(err: ValidationError) -> Self {
        Banner::error(err.to_string())
    }
}

/// Lookup lifecycle shared by the search-first screens.
///
/// `Idle → Searching → {Found, NotFound}`; `Found → Submitting → {Found | Idle}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Searching,
    Found,
    NotFound,
    Submitting,
}

/// Move a focus index forward/backward over `len` slots, wrapping.
pub fn focus_next(focus: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (focus + 1) % len }
}

pub fn focus_prev(focus: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if focus == 0 {
        len - 1
    } else {
        (focus - 1).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_trims_and_masks() {
        let mut t = TextInput::masked();
        for c in " pw ".chars() {
            t.push(c);
        }
        assert_eq!(t.display(), "****");
        assert_eq!(t.non_blank().as_deref(), Some("pw"));
        t.clear();
        assert!(t.is_blank());
        assert_eq!(t.non_blank(), None);
    }

    #[test]
    fn account_id_parsing() {
        let mut t = TextInput::new();
        assert_eq!(t.account_id(), Err(ValidationError::MissingAccountId));
        t.set("  42 ");
        assert_eq!(t.account_id(), Ok(42));
        t.set("abc");
        assert_eq!(t.account_id(), Err(ValidationError::InvalidAccountId("abc".into())));
        t.set("0");
        assert!(t.account_id().is_err());
    }

    #[test]
    fn selection_toggle_keeps_order() {
        let mut s = Selection::default();
        s.toggle(3);
        s.toggle(1);
        s.toggle(2);
        s.toggle(1);
        assert_eq!(s.chosen(), &[3, 2]);
    }

    #[test]
    fn selection_prunes_to_offered() {
        let mut s = Selection::default();
        s.set(vec![1, 2, 5]);
        s.move_down(10);
        s.move_down(10);
        s.move_down(10);
        s.retain_offered(&[Role::new(2, "b"), Role::new(5, "e")]);
        assert_eq!(s.chosen(), &[2, 5]);
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn focus_wraps() {
        assert_eq!(focus_next(2, 3), 0);
        assert_eq!(focus_prev(0, 3), 2);
        assert_eq!(focus_prev(7, 3), 2);
        assert_eq!(focus_next(0, 0), 0);
    }
}
