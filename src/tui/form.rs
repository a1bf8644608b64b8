//! Athlete details popup shown before a session is saved

use crossterm::event::{KeyCode, KeyEvent};

use crate::api::AthleteInfo;

pub const FIELD_LABELS: [&str; 4] = ["Name", "Age", "Sport", "Location"];

const AGE: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Editing,
    Submit(AthleteInfo),
    Cancel,
}

#[derive(Debug, Default)]
pub struct AthleteForm {
    values: [String; 4],
    focus: usize,
}

impl AthleteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Enter => return FormOutcome::Submit(self.athlete_info()),
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % FIELD_LABELS.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELD_LABELS.len() - 1) % FIELD_LABELS.len()
            }
            KeyCode::Backspace => {
                self.values[self.focus].pop();
            }
            KeyCode::Char(c) => {
                if self.focus != AGE || (c.is_ascii_digit() && self.values[AGE].len() < 3) {
                    self.values[self.focus].push(c);
                }
            }
            _ => {}
        }
        FormOutcome::Editing
    }

    pub fn athlete_info(&self) -> AthleteInfo {
        let [name, age, sport, location] = &self.values;
        AthleteInfo::from_form(name, age, sport, location)
    }

    /// (label, current input, focused) for each field
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str, bool)> {
        FIELD_LABELS
            .iter()
            .zip(self.values.iter())
            .enumerate()
            .map(move |(i, (label, value))| (*label, value.as_str(), i == self.focus))
    }
}
