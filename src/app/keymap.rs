//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Printable characters never reach the keymap while a text field has focus;
//! they are typed into the field. Everything else resolves through the
//! `(modifiers, code)` table held here.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the console.
    Quit,
    /// Cycle to the next / previous screen.
    NextScreen,
    PrevScreen,
    /// Jump straight to a screen.
    ShowCreate,
    ShowList,
    ShowUpdate,
    ShowRoles,
    ShowDelete,
    /// Move focus between form elements.
    NextField,
    PrevField,
    /// Move inside a list, or between elements when no list has focus.
    MoveUp,
    MoveDown,
    /// Press the focused button; on a text field, run the form's primary action.
    Activate,
    /// Tick or untick the checklist entry or checkbox under focus.
    Toggle,
    /// Clear the current screen.
    ResetForm,
    /// Swallow the key.
    Ignore,
}

const ACTIONS: [(KeyAction, &str); 16] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::NextScreen, "NextScreen"),
    (KeyAction::PrevScreen, "PrevScreen"),
    (KeyAction::ShowCreate, "ShowCreate"),
    (KeyAction::ShowList, "ShowList"),
    (KeyAction::ShowUpdate, "ShowUpdate"),
    (KeyAction::ShowRoles, "ShowRoles"),
    (KeyAction::ShowDelete, "ShowDelete"),
    (KeyAction::NextField, "NextField"),
    (KeyAction::PrevField, "PrevField"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::Activate, "Activate"),
    (KeyAction::Toggle, "Toggle"),
    (KeyAction::ResetForm, "ResetForm"),
    (KeyAction::Ignore, "Ignore"),
];

/// Bindings written to a fresh `keybinds.conf`, in file order.
const DEFAULT_SPECS: [(KeyAction, &str); 17] = [
    (KeyAction::Quit, "Ctrl+q"),
    (KeyAction::Quit, "Ctrl+c"),
    (KeyAction::NextScreen, "Ctrl+n"),
    (KeyAction::PrevScreen, "Ctrl+p"),
    (KeyAction::ShowCreate, "F1"),
    (KeyAction::ShowList, "F2"),
    (KeyAction::ShowUpdate, "F3"),
    (KeyAction::ShowRoles, "F4"),
    (KeyAction::ShowDelete, "F5"),
    (KeyAction::NextField, "Tab"),
    (KeyAction::PrevField, "BackTab"),
    (KeyAction::MoveUp, "Up"),
    (KeyAction::MoveDown, "Down"),
    (KeyAction::Activate, "Enter"),
    (KeyAction::Toggle, "Space"),
    (KeyAction::ResetForm, "Ctrl+r"),
    (KeyAction::Ignore, "Esc"),
];

/// Key-to-action table.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        let mut bindings = HashMap::new();
        for (action, spec) in DEFAULT_SPECS {
            if let Some(key) = parse_key(spec) {
                bindings.insert(key, action);
            }
        }
        // Terminals disagree on how Shift+Tab is reported.
        bindings.insert((KeyModifiers::SHIFT, KeyCode::BackTab), KeyAction::PrevField);
        bindings.insert((KeyModifiers::SHIFT, KeyCode::Tab), KeyAction::PrevField);
        Self { bindings }
    }

    /// Load `path`, or write the defaults there when it does not exist.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            tracing::warn!(path, error = %err, "could not write default keybindings");
        }
        km
    }

    /// Read `<Action> = <KeySpec>` lines (or the reversed `<KeySpec> = <Action>`)
    /// over the defaults.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            } else if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            } else {
                tracing::warn!(line, "unrecognised keybinding");
            }
        }
        map
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        let mut buf = String::new();
        buf.push_str("# directory-console keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: Ctrl+q, Enter, Esc, Space, Tab, BackTab, Up, Down, F1..F12\n");
        buf.push_str("# Actions: ");
        let names: Vec<&str> = ACTIONS.iter().map(|(_, name)| *name).collect();
        buf.push_str(&names.join(", "));
        buf.push_str("\n\n");
        for (action, spec) in DEFAULT_SPECS {
            let _ = writeln!(&mut buf, "{} = {}", format_action(action), spec);
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// First key bound to `action`, formatted, preferring unmodified keys.
    pub fn key_for(&self, action: KeyAction) -> Option<String> {
        let mut keys: Vec<_> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| (*m, *c))
            .collect();
        keys.sort_by_key(|(m, c)| (m.bits(), Self::format_key(*m, *c)));
        keys.first().map(|(m, c)| Self::format_key(*m, *c))
    }

    /// Format a key like "Ctrl+q", "F3", "Space".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Delete => "Delete".to_string(),
            Backspace => "Backspace".to_string(),
            F(n) => format!("F{n}"),
            Char(' ') => "Space".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else if mods.contains(KeyModifiers::ALT) {
            format!("Alt+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let mut rest = spec.trim();
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = rest.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    } else if let Some(after) = rest.strip_prefix("Alt+") {
        mods |= KeyModifiers::ALT;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Delete" => Delete,
        "Backspace" => Backspace,
        "Space" => Char(' '),
        _ => {
            if let Some(n) = rest.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    F(n)
                } else {
                    return None;
                }
            } else {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Char(c),
                    _ => return None,
                }
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTIONS.iter().find(|(_, name)| *name == s).map(|(a, _)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTIONS
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, name)| *name)
        .unwrap_or("Ignore")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(mods: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn defaults_cover_screen_keys() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::F(3))), Some(KeyAction::ShowUpdate));
        assert_eq!(km.resolve(&key(KeyModifiers::CONTROL, KeyCode::Char('q'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char(' '))), Some(KeyAction::Toggle));
        assert_eq!(km.resolve(&key(KeyModifiers::SHIFT, KeyCode::BackTab)), Some(KeyAction::PrevField));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('q'))), None);
    }

    #[test]
    fn parse_accepts_both_orders_and_overrides_defaults() {
        let km = Keymap::parse("# custom\nQuit = Alt+x\nF9 = ShowRoles\nbogus line\nNope = Enter\n");
        assert_eq!(km.resolve(&key(KeyModifiers::ALT, KeyCode::Char('x'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::F(9))), Some(KeyAction::ShowRoles));
        assert_eq!(km.resolve(&key(KeyModifiers::NONE, KeyCode::Enter)), Some(KeyAction::Activate));
    }

    #[test]
    fn key_specs_format_and_parse_symmetrically() {
        for spec in ["Ctrl+r", "F12", "Space", "BackTab", "Alt+z", "x"] {
            let (m, c) = parse_key(spec).unwrap();
            assert_eq!(Keymap::format_key(m, c), spec);
        }
        assert_eq!(parse_key("F13"), None);
        assert_eq!(parse_key("Ctrl+"), None);
    }

    #[test]
    fn every_action_has_a_name() {
        for (action, name) in ACTIONS {
            assert_eq!(parse_action(name), Some(action));
            assert_eq!(format_action(action), name);
        }
    }

    #[test]
    fn key_for_prefers_plain_keys() {
        let km = Keymap::default();
        assert_eq!(km.key_for(KeyAction::PrevField).as_deref(), Some("BackTab"));
        assert_eq!(km.key_for(KeyAction::Quit).as_deref(), Some("Ctrl+c"));
    }
}
