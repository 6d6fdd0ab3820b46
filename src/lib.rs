//! Interactive terminal process monitor.
//!
//! Samples host-wide and per-process CPU, memory, and disk-I/O metrics once
//! per tick and renders usage bars plus a sortable, filterable process
//! table. Keyboard commands re-sort the table, filter it by name or PID,
//! and terminate processes.
//!
//! # Architecture
//!
//! - [`collectors`]: one snapshot per tick from `/proc` and `statvfs(2)`
//! - [`model`]: snapshot + view state -> sorted/filtered/truncated frame model
//! - [`panels`] / [`widgets`]: frame model -> terminal cells
//! - [`input`]: keys -> actions, plus the text-prompt sub-state
//! - [`app`]: the tick loop tying it all together

pub mod app;
pub mod collectors;
pub mod config;
pub mod debug;
pub mod error;
pub mod input;
pub mod model;
pub mod panels;
pub mod process_ctl;
pub mod state;
pub mod theme;
pub mod units;
pub mod widgets;

pub use app::App;
pub use collectors::{ProcessCollector, ProcessSample, Sampler, Snapshot, SystemCollector};
pub use config::{Config, IoBarMode};
pub use error::{MonitorError, Result};
pub use model::{DisplayModel, Severity};
pub use state::{SortKey, ViewState};
pub use theme::Theme;
