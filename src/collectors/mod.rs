//! Metrics snapshot providers.
//!
//! One snapshot is taken per tick, owned by that tick, and discarded once
//! the display model has been built from it. Collectors keep whatever
//! previous-tick state they need for delta calculations (CPU percentages
//! are deltas over cumulative tick counters).

use crate::error::Result;
use std::time::Instant;

pub mod process;
pub mod system;

pub use process::{ProcessCollector, ProcessSample, ProcessSet};
pub use system::{SystemCollector, SystemSample};

/// Trait for snapshot providers.
///
/// Samplers gather a typed sample from one source (system counters, the
/// process table). Partial failures inside a source — a process vanishing
/// between enumeration and read, a denied `/proc` entry — are handled by
/// skipping the affected record, not by returning an error.
pub trait Sampler {
    /// The sample type this source produces.
    type Output;

    /// Returns the unique identifier for this sampler.
    fn id(&self) -> &'static str;

    /// Takes one sample.
    ///
    /// # Errors
    ///
    /// Returns an error only when the source as a whole is unreadable
    /// (e.g. `/proc` missing), never for individual skipped records.
    fn sample(&mut self) -> Result<Self::Output>;

    /// Returns true if this sampler can run on the current system.
    fn is_available(&self) -> bool;
}

/// One tick's immutable capture of system and process metrics.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// When the snapshot was taken.
    pub timestamp: Instant,
    /// Host-wide metrics.
    pub system: SystemSample,
    /// Per-process records, in enumeration order.
    pub processes: Vec<ProcessSample>,
    /// System-wide I/O total (read+write over all readable processes),
    /// computed once during the process scan and reused everywhere.
    pub total_io_bytes: u64,
}

impl Snapshot {
    /// Assembles a snapshot from the two samplers' outputs.
    #[must_use]
    pub fn new(system: SystemSample, processes: ProcessSet) -> Self {
        Self {
            timestamp: Instant::now(),
            system,
            processes: processes.samples,
            total_io_bytes: processes.total_io_bytes,
        }
    }
}
