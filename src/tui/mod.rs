//! TUI module - Live exercise dashboard with ratatui

mod form;
mod view;

pub use form::{AthleteForm, FormOutcome};

use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;

use crate::api::Backend;
use crate::controller::Controller;
use crate::shortcuts::{self, Action};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Input wait per frame; also bounds how stale drawn metrics can be
const FRAME_WAIT: Duration = Duration::from_millis(50);

/// App state for TUI
pub struct App<B: Backend> {
    controller: Controller<B>,
    form: Option<AthleteForm>,
    should_quit: bool,
}

impl<B: Backend> App<B> {
    pub fn new(controller: Controller<B>) -> Self {
        Self {
            controller,
            form: None,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        restore_terminal()?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            self.controller.drain_events();
            terminal.draw(|frame| {
                view::draw(frame, self.controller.dashboard(), self.form.as_ref(), Local::now())
            })?;
            self.handle_events()?;
            // Let spawned backend requests run on a current-thread runtime
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(FRAME_WAIT)?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
        Ok(())
    }

    /// Route one key press; backend requests run in the background
    fn handle_key(&mut self, key: KeyEvent) {
        // Raw mode swallows SIGINT
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let Some(form) = self.form.as_mut() {
            match form.handle_key(key) {
                FormOutcome::Editing => {}
                FormOutcome::Cancel => self.form = None,
                FormOutcome::Submit(athlete) => {
                    self.form = None;
                    self.controller.save(athlete);
                }
            }
            return;
        }

        match shortcuts::action_for(key.code) {
            Some(Action::Select(kind)) => self.controller.select(kind),
            Some(Action::ToggleRecording) => {
                self.controller.toggle_recording();
            }
            Some(Action::Reset) => self.controller.reset(),
            Some(Action::Save) => self.form = Some(AthleteForm::new()),
            Some(Action::Quit) => self.should_quit = true,
            None => {}
        }
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
