//! View state: sort order, filters, and the status line.
//!
//! This is the long-lived state the keyboard mutates. It never touches
//! snapshots directly; each tick the display model is rebuilt from the
//! current snapshot plus this state.

/// Column the process table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Sort by CPU percentage.
    #[default]
    Cpu,
    /// Sort by raw memory bytes (not the humanized display string).
    Memory,
}

impl SortKey {
    /// The other sort key.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SortKey::Cpu => SortKey::Memory,
            SortKey::Memory => SortKey::Cpu,
        }
    }

    /// Display name for the status line.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Cpu => "CPU",
            SortKey::Memory => "Memory",
        }
    }
}

/// User-controlled presentation state.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Active sort column.
    pub sort_key: SortKey,
    /// Sort direction; false (descending) is the default, showing the
    /// heaviest consumers first.
    pub ascending: bool,
    /// Case-insensitive substring filter on process names; empty means off.
    pub name_filter: String,
    /// Exact-match PID filter; `None` means off.
    pub pid_filter: Option<u32>,
    /// One-line feedback from the last command.
    pub status_message: String,
}

impl ViewState {
    /// Creates the default view: CPU descending, no filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches between CPU and memory sorting. Filters are untouched.
    pub fn toggle_sort_key(&mut self) {
        self.sort_key = self.sort_key.toggled();
        self.status_message = format!("Sorting by {}", self.sort_key.label());
    }

    /// Flips the sort direction. Filters are untouched.
    pub fn toggle_direction(&mut self) {
        self.ascending = !self.ascending;
        self.status_message = if self.ascending {
            "Sorting in ascending order".to_string()
        } else {
            "Sorting in descending order".to_string()
        };
    }

    /// Replaces the name filter. An empty string clears it.
    pub fn set_name_filter(&mut self, filter: impl Into<String>) {
        self.name_filter = filter.into();
        self.status_message = if self.name_filter.is_empty() {
            "Name filter cleared".to_string()
        } else {
            format!("Filtering by process name: {}", self.name_filter)
        };
    }

    /// Replaces the PID filter. `None` clears it. The status line is
    /// cleared rather than set; the filter readout already shows the PID.
    pub fn set_pid_filter(&mut self, pid: Option<u32>) {
        self.pid_filter = pid;
        self.status_message.clear();
    }

    /// Sets the status line directly.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }
}
