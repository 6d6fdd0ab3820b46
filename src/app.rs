//! Application loop and terminal lifecycle.
//!
//! One thread owns everything. Each tick samples both collectors, rebuilds
//! the display model, draws a frame, then waits up to one tick interval for
//! a key. Prompting commands suspend the tick loop: while a prompt is open
//! the loop blocks on input, so sampling pauses for exactly that exchange.

use std::io;
use std::time::Instant;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;

use crate::collectors::{ProcessCollector, Sampler, Snapshot, SystemCollector};
use crate::config::Config;
use crate::debug_log;
use crate::error::Result;
use crate::input::{self, Action, Prompt, PromptKind};
use crate::model::DisplayModel;
use crate::panels;
use crate::process_ctl::{self, TerminateOutcome};
use crate::state::ViewState;

/// The dashboard application.
pub struct App {
    config: Config,
    system: SystemCollector,
    processes: ProcessCollector,
    view: ViewState,
    should_quit: bool,
}

impl App {
    /// Creates an app from a loaded configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let system = SystemCollector::new(config.mount_point.clone());
        if !system.is_available() {
            debug_log!(
                crate::debug::Level::Warn,
                "app",
                "system counters unavailable on this platform, bars will read zero"
            );
        }
        Self {
            config,
            system,
            processes: ProcessCollector::new(),
            view: ViewState::new(),
            should_quit: false,
        }
    }

    /// Runs the dashboard until the user quits.
    ///
    /// The terminal is restored before returning on every path, including
    /// errors from inside the loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up or a draw fails.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut terminal = undo_raw_mode_on_error(setup_terminal())?;

        let result = self.main_loop(&mut terminal);
        let restored = restore_terminal(&mut terminal);

        // A loop error outranks a restore error.
        result.and(restored)
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            let tick_started = Instant::now();

            let system = self.system.sample()?;
            let processes = self.processes.sample()?;
            let snapshot = Snapshot::new(system, processes);

            let height = terminal.size()?.height;
            let capacity = panels::table_capacity(height, snapshot.system.cpu_per_core.len());
            let model =
                DisplayModel::build(&snapshot, &self.view, capacity, self.config.io_bar);

            terminal.draw(|frame| {
                panels::draw(frame, &model, &self.view, &self.config.theme, None);
            })?;

            debug_log!(
                crate::debug::Level::Trace,
                "app",
                "tick sampled+drawn in {:?}",
                tick_started.elapsed()
            );

            self.handle_events(terminal, &model)?;
        }
        Ok(())
    }

    /// Waits up to one tick interval for a key and dispatches at most one
    /// command. No key pending means the tick just ends.
    fn handle_events<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        model: &DisplayModel,
    ) -> Result<()> {
        if !event::poll(self.config.tick_interval())? {
            return Ok(());
        }
        if let Event::Key(key) = event::read()? {
            if let Some(action) = input::map_key(key) {
                self.dispatch(action, terminal, model)?;
            }
        }
        Ok(())
    }

    fn dispatch<B: Backend>(
        &mut self,
        action: Action,
        terminal: &mut Terminal<B>,
        model: &DisplayModel,
    ) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleSort => self.view.toggle_sort_key(),
            Action::ToggleDirection => self.view.toggle_direction(),
            Action::FilterByName => {
                if let Some(text) = self.run_prompt(terminal, model, PromptKind::NameFilter)? {
                    self.view.set_name_filter(text);
                }
            }
            Action::FilterByPid => {
                if let Some(text) = self.run_prompt(terminal, model, PromptKind::PidFilter)? {
                    // Empty or non-numeric input clears the filter.
                    self.view.set_pid_filter(input::parse_pid(&text));
                }
            }
            Action::Kill => {
                if let Some(text) = self.run_prompt(terminal, model, PromptKind::Kill)? {
                    self.apply_kill(&text);
                }
            }
        }
        Ok(())
    }

    /// Collects one line of input, redrawing the frame on each keystroke.
    /// Returns `None` when cancelled with Esc.
    fn run_prompt<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        model: &DisplayModel,
        kind: PromptKind,
    ) -> Result<Option<String>> {
        let mut prompt = Prompt::new(kind);
        loop {
            terminal.draw(|frame| {
                panels::draw(
                    frame,
                    model,
                    &self.view,
                    &self.config.theme,
                    Some(&prompt),
                );
            })?;

            if let Event::Key(key) = event::read()? {
                match prompt.handle_key(key) {
                    input::PromptOutcome::Pending => {}
                    input::PromptOutcome::Cancelled => return Ok(None),
                    input::PromptOutcome::Submitted(text) => return Ok(Some(text)),
                }
            }
        }
    }

    fn apply_kill(&mut self, raw: &str) {
        let Some(pid) = input::parse_pid(raw) else {
            self.view.set_status(format!("Error: Invalid PID {raw}."));
            return;
        };

        let message = match process_ctl::terminate(pid) {
            TerminateOutcome::Terminated => {
                format!("Process {pid} terminated successfully.")
            }
            TerminateOutcome::NotFound => format!("Error: No such process with PID {pid}."),
            TerminateOutcome::AccessDenied => {
                format!("Error: Access denied to kill PID {pid}.")
            }
            TerminateOutcome::Unsupported => {
                "Error: Process termination is not supported on this platform.".to_string()
            }
        };
        self.view.set_status(message);
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Passes a terminal setup result through, turning raw mode back off first
/// when it failed. Raw mode is enabled before the alternate screen, so a
/// setup failure must not leave the user's shell in raw mode.
fn undo_raw_mode_on_error<T>(setup: Result<T>) -> Result<T> {
    if setup.is_err() {
        let _ = disable_raw_mode();
    }
    setup
}

/// Restores the terminal. Every step runs even when an earlier one fails;
/// the first failure is reported.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    raw?;
    screen?;
    cursor?;
    Ok(())
}
