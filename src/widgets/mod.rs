//! Custom widgets.

pub mod bar;

pub use bar::UsageBar;
