//! Per-tick display model.
//!
//! The model is rebuilt from scratch every tick out of the current snapshot
//! and view state, then handed to the renderer. Ordering is decided here:
//! sort first (stable, so equal keys keep snapshot enumeration order), then
//! filters, then truncation to what the terminal can show.

use std::cmp::Ordering;

use crate::collectors::Snapshot;
use crate::config::IoBarMode;
use crate::state::{SortKey, ViewState};
use crate::units::humanize_bytes;

/// Row coloring severity, classified from CPU usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// At or below 40%.
    Low,
    /// Above 40%, up to and including 80%.
    Moderate,
    /// Above 80%.
    High,
}

impl Severity {
    /// Classifies a CPU percentage. Boundaries are exclusive: exactly 80.0
    /// is `Moderate`, exactly 40.0 is `Low`.
    #[must_use]
    pub fn classify(cpu_pct: f64) -> Self {
        if cpu_pct > 80.0 {
            Severity::High
        } else if cpu_pct > 40.0 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }
}

/// One formatted process-table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    /// CPU percentage, kept numeric for formatting at render time.
    pub cpu_pct: f64,
    /// Humanized memory string (e.g. `"12.40M"`).
    pub mem_human: String,
    /// Formatted I/O column, shape depends on the disk bar mode.
    pub io_human: String,
    pub severity: Severity,
}

/// One usage bar to draw: label, value against a maximum, screen row.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDescriptor {
    pub label: String,
    pub usage: f64,
    pub max_value: f64,
    pub row: u16,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default)]
pub struct DisplayModel {
    /// Bars in draw order: CPU, memory, disk, then one per core.
    pub bars: Vec<BarDescriptor>,
    /// Process rows, already sorted, filtered, and truncated.
    pub rows: Vec<ProcessRow>,
    /// Number of per-core bars (drives the table's vertical offset).
    pub core_count: usize,
}

/// Screen row of the first bar after the three fixed bars; row 3 is blank.
const CORE_BAR_BASE_ROW: u16 = 4;

impl DisplayModel {
    /// Builds the frame model for one tick.
    ///
    /// `capacity` is how many process rows fit below the table header;
    /// zero yields an empty table, never an error.
    #[must_use]
    pub fn build(
        snapshot: &Snapshot,
        view: &ViewState,
        capacity: usize,
        io_bar_mode: IoBarMode,
    ) -> Self {
        let mut processes = snapshot.processes.clone();

        // Stable sort with a reversed comparator for descending order, so
        // ties keep enumeration order in both directions.
        processes.sort_by(|a, b| {
            let cmp = match view.sort_key {
                SortKey::Cpu => a
                    .cpu_pct
                    .partial_cmp(&b.cpu_pct)
                    .unwrap_or(Ordering::Equal),
                SortKey::Memory => a.mem_bytes.cmp(&b.mem_bytes),
            };
            if view.ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });

        // Filters apply after sorting and combine with AND.
        let name_filter = view.name_filter.to_lowercase();
        let rows: Vec<ProcessRow> = processes
            .iter()
            .filter(|p| name_filter.is_empty() || p.name.to_lowercase().contains(&name_filter))
            .filter(|p| view.pid_filter.map_or(true, |pid| p.pid == pid))
            .take(capacity)
            .map(|p| {
                let io_human = match io_bar_mode {
                    IoBarMode::Disk => humanize_bytes(p.io_total_bytes()),
                    IoBarMode::Share => {
                        let share = if snapshot.total_io_bytes == 0 {
                            0.0
                        } else {
                            (p.io_total_bytes() as f64 / snapshot.total_io_bytes as f64) * 100.0
                        };
                        format!(
                            "R: {} W: {} | %: {share:.2}%",
                            humanize_bytes(p.io_read_bytes),
                            humanize_bytes(p.io_write_bytes)
                        )
                    }
                };
                ProcessRow {
                    pid: p.pid,
                    name: p.name.clone(),
                    cpu_pct: p.cpu_pct,
                    mem_human: humanize_bytes(p.mem_bytes),
                    io_human,
                    severity: Severity::classify(p.cpu_pct),
                }
            })
            .collect();

        let disk_usage = match io_bar_mode {
            IoBarMode::Disk => snapshot.system.disk_pct(),
            IoBarMode::Share => {
                if snapshot.system.disk_total_bytes == 0 {
                    0.0
                } else {
                    (snapshot.total_io_bytes as f64 / snapshot.system.disk_total_bytes as f64)
                        * 100.0
                }
            }
        };

        let mut bars = vec![
            BarDescriptor {
                label: "CPU".to_string(),
                usage: snapshot.system.cpu_total_pct,
                max_value: 100.0,
                row: 0,
            },
            BarDescriptor {
                label: "Memory".to_string(),
                usage: snapshot.system.mem_pct,
                max_value: 100.0,
                row: 1,
            },
            BarDescriptor {
                label: "Disk".to_string(),
                usage: disk_usage,
                max_value: 100.0,
                row: 2,
            },
        ];

        for (i, core_pct) in snapshot.system.cpu_per_core.iter().enumerate() {
            bars.push(BarDescriptor {
                label: format!("Core {i}"),
                usage: *core_pct,
                max_value: 100.0,
                row: CORE_BAR_BASE_ROW + i as u16,
            });
        }

        Self {
            bars,
            rows,
            core_count: snapshot.system.cpu_per_core.len(),
        }
    }
}
