//! Per-process metrics from `/proc/[pid]`.
//!
//! Each scan walks the numeric entries of `/proc` and reads three files per
//! process: `stat` (name and CPU tick counters), `statm` (resident memory),
//! and `io` (cumulative read/write bytes). Processes that vanish mid-scan or
//! deny access are skipped silently; `io` in particular is unreadable for
//! other users' processes without privileges, in which case both counters
//! report zero.

use std::collections::BTreeMap;

use crate::debug_log;
use crate::error::{MonitorError, Result};

use super::Sampler;

/// Bytes per page for `statm` resident-set conversion.
const PAGE_SIZE: u64 = 4096;

/// One process's metrics for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    /// Process identifier.
    pub pid: u32,
    /// Short command name.
    pub name: String,
    /// CPU usage since the previous scan, 0.0..=100.0.
    pub cpu_pct: f64,
    /// Resident memory in bytes.
    pub mem_bytes: u64,
    /// Cumulative bytes read from storage.
    pub io_read_bytes: u64,
    /// Cumulative bytes written to storage.
    pub io_write_bytes: u64,
}

impl ProcessSample {
    /// Combined read+write bytes for this process.
    #[must_use]
    pub fn io_total_bytes(&self) -> u64 {
        self.io_read_bytes.saturating_add(self.io_write_bytes)
    }
}

/// The result of one full process-table scan.
#[derive(Debug, Clone, Default)]
pub struct ProcessSet {
    /// Per-process records, in enumeration order.
    pub samples: Vec<ProcessSample>,
    /// Sum of read+write bytes over every readable process, aggregated
    /// during the scan so later consumers never re-sum.
    pub total_io_bytes: u64,
}

/// Scans the process table, diffing per-process CPU ticks between scans.
#[derive(Debug, Default)]
pub struct ProcessCollector {
    prev_proc_ticks: BTreeMap<u32, u64>,
    prev_total_ticks: u64,
}

impl ProcessCollector {
    /// Creates a process collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sampler for ProcessCollector {
    type Output = ProcessSet;

    fn id(&self) -> &'static str {
        "process"
    }

    fn sample(&mut self) -> Result<ProcessSet> {
        let set = self.scan()?;
        debug_log!(
            crate::debug::Level::Trace,
            self.id(),
            "scanned {} processes, io_total={}",
            set.samples.len(),
            set.total_io_bytes
        );
        Ok(set)
    }

    fn is_available(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

impl ProcessCollector {
    #[cfg(target_os = "linux")]
    fn scan(&mut self) -> Result<ProcessSet> {
        let curr_total_ticks = read_total_cpu_ticks();
        let total_delta = curr_total_ticks.saturating_sub(self.prev_total_ticks);

        let mut samples = Vec::new();
        let mut total_io_bytes = 0u64;
        let mut curr_proc_ticks = BTreeMap::new();

        let entries = std::fs::read_dir("/proc").map_err(|e| MonitorError::SampleFailed {
            sampler: "process",
            message: e.to_string(),
        })?;

        for entry in entries.flatten() {
            let Some(pid) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<u32>().ok())
            else {
                continue;
            };

            let Some(mut sample) = read_process(pid) else {
                continue;
            };

            let ticks = sample.cpu_pct as u64; // raw ticks stashed by read_process
            sample.cpu_pct = match self.prev_proc_ticks.get(&pid) {
                Some(prev) if total_delta > 0 => {
                    let delta = ticks.saturating_sub(*prev);
                    (delta as f64 / total_delta as f64) * 100.0
                }
                _ => 0.0,
            };

            curr_proc_ticks.insert(pid, ticks);
            total_io_bytes = total_io_bytes.saturating_add(sample.io_total_bytes());
            samples.push(sample);
        }

        self.prev_proc_ticks = curr_proc_ticks;
        self.prev_total_ticks = curr_total_ticks;

        Ok(ProcessSet {
            samples,
            total_io_bytes,
        })
    }

    #[cfg(not(target_os = "linux"))]
    fn scan(&mut self) -> Result<ProcessSet> {
        let _ = (&self.prev_proc_ticks, self.prev_total_ticks);
        Ok(ProcessSet::default())
    }
}

/// Reads one process's files. `cpu_pct` carries raw cumulative ticks; the
/// caller converts them to a percentage against its previous scan.
#[cfg(target_os = "linux")]
fn read_process(pid: u32) -> Option<ProcessSample> {
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    let (name, ticks) = parse_stat(&stat)?;

    let mem_bytes = std::fs::read_to_string(format!("/proc/{pid}/statm"))
        .ok()
        .map(|content| parse_statm(&content))
        .unwrap_or(0);

    // Unreadable without privileges for foreign processes.
    let (io_read_bytes, io_write_bytes) = std::fs::read_to_string(format!("/proc/{pid}/io"))
        .map(|content| parse_io(&content))
        .unwrap_or((0, 0));

    Some(ProcessSample {
        pid,
        name,
        cpu_pct: ticks as f64,
        mem_bytes,
        io_read_bytes,
        io_write_bytes,
    })
}

/// Sum of all tick counters on the aggregate `cpu` line of `/proc/stat`.
#[cfg(target_os = "linux")]
fn read_total_cpu_ticks() -> u64 {
    let Ok(content) = std::fs::read_to_string("/proc/stat") else {
        return 0;
    };
    content
        .lines()
        .find(|line| line.starts_with("cpu "))
        .map(total_ticks_from_line)
        .unwrap_or(0)
}

#[cfg(target_os = "linux")]
fn total_ticks_from_line(line: &str) -> u64 {
    line.split_whitespace()
        .skip(1)
        .filter_map(|field| field.parse::<u64>().ok())
        .sum()
}

/// Extracts the command name and utime+stime from `/proc/[pid]/stat`.
///
/// The comm field is parenthesized and may itself contain spaces or
/// parentheses, so the name ends at the last `)` on the line. After it,
/// utime and stime are the 12th and 13th whitespace-separated fields.
fn parse_stat(content: &str) -> Option<(String, u64)> {
    let open = content.find('(')?;
    let close = content.rfind(')')?;
    if close < open {
        return None;
    }

    let raw_name = &content[open + 1..close];
    let name = if raw_name.is_empty() {
        "Unknown".to_string()
    } else {
        raw_name.to_string()
    };

    let rest: Vec<&str> = content[close + 1..].split_whitespace().collect();
    let utime: u64 = rest.get(11)?.parse().ok()?;
    let stime: u64 = rest.get(12)?.parse().ok()?;

    Some((name, utime + stime))
}

/// Resident-set bytes from `/proc/[pid]/statm` (second field, in pages).
fn parse_statm(content: &str) -> u64 {
    content
        .split_whitespace()
        .nth(1)
        .and_then(|pages| pages.parse::<u64>().ok())
        .map(|pages| pages * PAGE_SIZE)
        .unwrap_or(0)
}

/// Cumulative `read_bytes` and `write_bytes` from `/proc/[pid]/io`.
fn parse_io(content: &str) -> (u64, u64) {
    let mut read_bytes = 0u64;
    let mut write_bytes = 0u64;

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("read_bytes:") {
            read_bytes = rest.trim().parse().unwrap_or(0);
        } else if let Some(rest) = line.strip_prefix("write_bytes:") {
            write_bytes = rest.trim().parse().unwrap_or(0);
        }
    }

    (read_bytes, write_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT_LINE: &str = "1234 (cat) R 1 1234 1234 0 -1 4194304 100 0 0 0 25 15 0 0 20 0 1 0 100 1000000 50 18446744073709551615";

    #[test]
    fn test_sampler_id() {
        assert_eq!(ProcessCollector::new().id(), "process");
    }

    #[test]
    fn test_parse_stat() {
        let (name, ticks) = parse_stat(STAT_LINE).expect("should parse");
        assert_eq!(name, "cat");
        // utime 25 + stime 15
        assert_eq!(ticks, 40);
    }

    #[test]
    fn test_parse_stat_name_with_spaces_and_parens() {
        let line = "99 (Web Content (x)) S 1 99 99 0 -1 0 0 0 0 0 7 3 0 0 20 0 1 0 1 1 1 1";
        let (name, ticks) = parse_stat(line).expect("should parse");
        assert_eq!(name, "Web Content (x)");
        assert_eq!(ticks, 10);
    }

    #[test]
    fn test_parse_stat_empty_name() {
        let line = "99 () S 1 99 99 0 -1 0 0 0 0 0 7 3 0 0 20 0 1 0 1 1 1 1";
        let (name, _) = parse_stat(line).expect("should parse");
        assert_eq!(name, "Unknown");
    }

    #[test]
    fn test_parse_stat_truncated() {
        assert!(parse_stat("1234 (cat) R 1").is_none());
        assert!(parse_stat("no parens here").is_none());
    }

    #[test]
    fn test_parse_statm() {
        // 300 resident pages * 4096 bytes.
        assert_eq!(parse_statm("500 300 120 40 0 200 0"), 300 * 4096);
    }

    #[test]
    fn test_parse_statm_garbage() {
        assert_eq!(parse_statm(""), 0);
        assert_eq!(parse_statm("abc def"), 0);
    }

    #[test]
    fn test_parse_io() {
        let content = "rchar: 100\nwchar: 200\nsyscr: 5\nsyscw: 5\nread_bytes: 4096\nwrite_bytes: 8192\ncancelled_write_bytes: 0\n";
        assert_eq!(parse_io(content), (4096, 8192));
    }

    #[test]
    fn test_parse_io_missing_fields() {
        assert_eq!(parse_io("rchar: 100\n"), (0, 0));
    }

    #[test]
    fn test_io_total_saturates() {
        let sample = ProcessSample {
            pid: 1,
            name: "x".to_string(),
            cpu_pct: 0.0,
            mem_bytes: 0,
            io_read_bytes: u64::MAX,
            io_write_bytes: 1,
        };
        assert_eq!(sample.io_total_bytes(), u64::MAX);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_scan_finds_self() {
        let mut collector = ProcessCollector::new();
        let set = collector.scan().expect("scan");
        let own_pid = std::process::id();
        assert!(
            set.samples.iter().any(|p| p.pid == own_pid),
            "own pid {own_pid} should appear in the scan"
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_first_scan_reports_zero_cpu() {
        let mut collector = ProcessCollector::new();
        let set = collector.scan().expect("scan");
        assert!(set.samples.iter().all(|p| p.cpu_pct == 0.0));
    }
}
