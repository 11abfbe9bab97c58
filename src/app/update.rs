use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::dispatch::{Completion, Dispatcher};
use crate::app::keymap::KeyAction;
use crate::app::{AppState, Outgoing, Tab};
use crate::screens::FormInput;
use crate::ui;

/// What the loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Control {
    Continue(Outgoing),
    Quit,
}

/// Translate one key press into shell actions.
pub fn route_key(app: &mut AppState, key: KeyEvent) -> Control {
    let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
    match key.code {
        KeyCode::Char(c) if plain && app.screen().wants_text() => {
            return Control::Continue(app.handle_input(FormInput::Char(c)));
        }
        KeyCode::Backspace => return Control::Continue(app.handle_input(FormInput::Backspace)),
        _ => {}
    }
    let Some(action) = app.keymap.resolve(&key) else {
        return Control::Continue(Vec::new());
    };
    let input = match action {
        KeyAction::Quit => return Control::Quit,
        KeyAction::Ignore => return Control::Continue(Vec::new()),
        KeyAction::NextScreen => return Control::Continue(app.navigate(app.active_tab.next())),
        KeyAction::PrevScreen => return Control::Continue(app.navigate(app.active_tab.prev())),
        KeyAction::ShowCreate => return Control::Continue(app.navigate(Tab::Create)),
        KeyAction::ShowList => return Control::Continue(app.navigate(Tab::List)),
        KeyAction::ShowUpdate => return Control::Continue(app.navigate(Tab::Update)),
        KeyAction::ShowRoles => return Control::Continue(app.navigate(Tab::Roles)),
        KeyAction::ShowDelete => return Control::Continue(app.navigate(Tab::Delete)),
        KeyAction::NextField => FormInput::NextField,
        KeyAction::PrevField => FormInput::PrevField,
        KeyAction::MoveUp => FormInput::Up,
        KeyAction::MoveDown => FormInput::Down,
        KeyAction::Activate => FormInput::Activate,
        KeyAction::Toggle => FormInput::Toggle,
        KeyAction::ResetForm => FormInput::Reset,
    };
    Control::Continue(app.handle_input(input))
}

/// Draw, deliver finished requests, read a key; until the user quits.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    dispatcher: &Dispatcher,
    completions: &mut UnboundedReceiver<Completion>,
) -> Result<()> {
    dispatcher.submit_all(app.start());

    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        while let Ok(completion) = completions.try_recv() {
            let follow_up = app.complete(completion);
            dispatcher.submit_all(follow_up);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match route_key(app, key) {
                        Control::Quit => break,
                        Control::Continue(out) => dispatcher.submit_all(out),
                    }
                }
            }
        }
    }
    tracing::info!(uptime_secs = app.started_at.elapsed().as_secs(), "console closed");
    Ok(())
}
