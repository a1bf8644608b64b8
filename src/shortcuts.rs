//! Keyboard shortcuts - single keys mapped to dashboard actions

use crossterm::event::KeyCode;

use crate::exercises::ExerciseKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Select(ExerciseKind),
    ToggleRecording,
    Reset,
    Save,
    Quit,
}

/// Action bound to a key, if any. Modifiers are ignored.
pub fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char(c @ '1'..='5') => ExerciseKind::from_shortcut(c).map(Action::Select),
        KeyCode::Char('r' | 'R') => Some(Action::ToggleRecording),
        KeyCode::Char('c' | 'C') => Some(Action::Reset),
        KeyCode::Char('s' | 'S') => Some(Action::Save),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Footer hint line
pub fn help_line() -> String {
    let exercises: Vec<String> = ExerciseKind::all()
        .iter()
        .map(|k| format!("{}: {}", k.shortcut(), k.info().name))
        .collect();
    format!("{} | r: record | c: reset | s: save | q: quit", exercises.join(" "))
}
