//! Keyboard handling.
//!
//! Two layers: a flat key-to-action map for the normal tick loop, and a
//! [`Prompt`] sub-state for the commands that need a line of text (name
//! filter, PID filter, kill target). While a prompt is open, keys edit its
//! buffer instead of triggering actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Commands the dashboard understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Exit the dashboard.
    Quit,
    /// Open the process-name filter prompt.
    FilterByName,
    /// Open the PID filter prompt.
    FilterByPid,
    /// Switch sorting between CPU and memory.
    ToggleSort,
    /// Flip ascending/descending.
    ToggleDirection,
    /// Open the kill-target prompt.
    Kill,
}

/// Maps a key event to an action. Returns `None` for unbound keys and
/// key-release events.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('f') => Some(Action::FilterByName),
        KeyCode::Char('p') => Some(Action::FilterByPid),
        KeyCode::Char('s') => Some(Action::ToggleSort),
        KeyCode::Char('a') => Some(Action::ToggleDirection),
        KeyCode::Char('k') => Some(Action::Kill),
        _ => None,
    }
}

/// What a prompt is collecting input for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Substring to filter process names by.
    NameFilter,
    /// PID to filter the table to.
    PidFilter,
    /// PID to send SIGTERM to.
    Kill,
}

impl PromptKind {
    /// Prompt text shown ahead of the input buffer.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::NameFilter => "Enter Process Name: ",
            PromptKind::PidFilter => "Enter PID: ",
            PromptKind::Kill => "Enter PID to kill: ",
        }
    }
}

/// Result of feeding one key to an open prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Still collecting input.
    Pending,
    /// Abandoned without effect (Esc).
    Cancelled,
    /// Finished; carries the collected text (Enter).
    Submitted(String),
}

/// An in-progress text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

impl Prompt {
    /// Opens an empty prompt of the given kind.
    #[must_use]
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            buffer: String::new(),
        }
    }

    /// Feeds one key event to the prompt.
    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        if key.kind == KeyEventKind::Release {
            return PromptOutcome::Pending;
        }

        match key.code {
            KeyCode::Esc => PromptOutcome::Cancelled,
            KeyCode::Enter => PromptOutcome::Submitted(self.buffer.trim().to_string()),
            KeyCode::Backspace => {
                self.buffer.pop();
                PromptOutcome::Pending
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.push(c);
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }

    /// The full prompt line as rendered: label plus current buffer.
    #[must_use]
    pub fn display_line(&self) -> String {
        format!("{}{}", self.kind.label(), self.buffer)
    }
}

/// Parses prompt input as a PID. Empty or non-numeric input yields `None`.
#[must_use]
pub fn parse_pid(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(map_key(press(KeyCode::Char('f'))), Some(Action::FilterByName));
        assert_eq!(map_key(press(KeyCode::Char('p'))), Some(Action::FilterByPid));
        assert_eq!(map_key(press(KeyCode::Char('s'))), Some(Action::ToggleSort));
        assert_eq!(map_key(press(KeyCode::Char('a'))), Some(Action::ToggleDirection));
        assert_eq!(map_key(press(KeyCode::Char('k'))), Some(Action::Kill));
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
        assert_eq!(map_key(press(KeyCode::Tab)), None);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut release = press(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release), None);
    }

    #[test]
    fn test_prompt_collects_and_submits() {
        let mut prompt = Prompt::new(PromptKind::PidFilter);
        assert_eq!(prompt.handle_key(press(KeyCode::Char('4'))), PromptOutcome::Pending);
        assert_eq!(prompt.handle_key(press(KeyCode::Char('2'))), PromptOutcome::Pending);
        assert_eq!(
            prompt.handle_key(press(KeyCode::Enter)),
            PromptOutcome::Submitted("42".to_string())
        );
    }

    #[test]
    fn test_prompt_backspace() {
        let mut prompt = Prompt::new(PromptKind::NameFilter);
        prompt.handle_key(press(KeyCode::Char('a')));
        prompt.handle_key(press(KeyCode::Char('b')));
        prompt.handle_key(press(KeyCode::Backspace));
        assert_eq!(prompt.buffer, "a");

        // Backspace on an empty buffer stays open.
        prompt.handle_key(press(KeyCode::Backspace));
        assert_eq!(prompt.handle_key(press(KeyCode::Backspace)), PromptOutcome::Pending);
    }

    #[test]
    fn test_prompt_cancel() {
        let mut prompt = Prompt::new(PromptKind::Kill);
        prompt.handle_key(press(KeyCode::Char('9')));
        assert_eq!(prompt.handle_key(press(KeyCode::Esc)), PromptOutcome::Cancelled);
    }

    #[test]
    fn test_prompt_submit_trims_whitespace() {
        let mut prompt = Prompt::new(PromptKind::NameFilter);
        prompt.handle_key(press(KeyCode::Char(' ')));
        prompt.handle_key(press(KeyCode::Char('x')));
        prompt.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(
            prompt.handle_key(press(KeyCode::Enter)),
            PromptOutcome::Submitted("x".to_string())
        );
    }

    #[test]
    fn test_prompt_display_line() {
        let mut prompt = Prompt::new(PromptKind::Kill);
        prompt.handle_key(press(KeyCode::Char('7')));
        assert_eq!(prompt.display_line(), "Enter PID to kill: 7");
    }

    #[test]
    fn test_parse_pid() {
        assert_eq!(parse_pid("1234"), Some(1234));
        assert_eq!(parse_pid("  1234  "), Some(1234));
        assert_eq!(parse_pid(""), None);
        assert_eq!(parse_pid("   "), None);
        assert_eq!(parse_pid("abc"), None);
        assert_eq!(parse_pid("-5"), None);
        assert_eq!(parse_pid("12.5"), None);
    }
}
