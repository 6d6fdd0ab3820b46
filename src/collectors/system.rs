//! Host-wide metrics: CPU, memory, and disk capacity.
//!
//! On Linux, CPU usage comes from `/proc/stat` deltas between consecutive
//! samples, memory from `/proc/meminfo`, and disk capacity from `statvfs(2)`
//! on the configured mount point. The first CPU sample has no previous
//! counters to diff against and reports 0%.

use crate::debug_log;
use crate::error::Result;

use super::Sampler;

/// Host-wide metrics for one tick.
#[derive(Debug, Clone, Default)]
pub struct SystemSample {
    /// Aggregate CPU usage, 0.0..=100.0.
    pub cpu_total_pct: f64,
    /// Per-core CPU usage, 0.0..=100.0 each, in core order.
    pub cpu_per_core: Vec<f64>,
    /// Memory usage, 0.0..=100.0.
    pub mem_pct: f64,
    /// Total capacity of the configured mount, in bytes.
    pub disk_total_bytes: u64,
    /// Used capacity of the configured mount, in bytes.
    pub disk_used_bytes: u64,
}

impl SystemSample {
    /// Disk usage as a percentage of capacity (0.0 when capacity is unknown).
    #[must_use]
    pub fn disk_pct(&self) -> f64 {
        if self.disk_total_bytes == 0 {
            return 0.0;
        }
        (self.disk_used_bytes as f64 / self.disk_total_bytes as f64) * 100.0
    }
}

/// Cumulative CPU tick counters from one `/proc/stat` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CpuTicks {
    user: u64,
    nice: u64,
    system: u64,
    idle: u64,
    iowait: u64,
    irq: u64,
    softirq: u64,
    steal: u64,
}

impl CpuTicks {
    fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    fn active(&self) -> u64 {
        self.total() - self.idle - self.iowait
    }
}

/// Samples aggregate and per-core CPU, memory, and disk capacity.
#[derive(Debug, Default)]
pub struct SystemCollector {
    mount_point: String,
    prev_total: Option<CpuTicks>,
    prev_cores: Vec<CpuTicks>,
}

impl SystemCollector {
    /// Creates a collector reporting disk capacity for `mount_point`.
    #[must_use]
    pub fn new(mount_point: impl Into<String>) -> Self {
        Self {
            mount_point: mount_point.into(),
            prev_total: None,
            prev_cores: Vec::new(),
        }
    }
}

impl Sampler for SystemCollector {
    type Output = SystemSample;

    fn id(&self) -> &'static str {
        "system"
    }

    fn sample(&mut self) -> Result<SystemSample> {
        let (cpu_total_pct, cpu_per_core) = self.sample_cpu();
        let mem_pct = sample_memory();
        let (disk_total_bytes, disk_used_bytes) = sample_disk(&self.mount_point);

        debug_log!(
            crate::debug::Level::Trace,
            self.id(),
            "cpu={cpu_total_pct:.1}% mem={mem_pct:.1}% disk_used={disk_used_bytes}"
        );

        Ok(SystemSample {
            cpu_total_pct,
            cpu_per_core,
            mem_pct,
            disk_total_bytes,
            disk_used_bytes,
        })
    }

    fn is_available(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

impl SystemCollector {
    #[cfg(target_os = "linux")]
    fn sample_cpu(&mut self) -> (f64, Vec<f64>) {
        let Ok(content) = std::fs::read_to_string("/proc/stat") else {
            return (0.0, Vec::new());
        };
        self.sample_cpu_from(&content)
    }

    #[cfg(not(target_os = "linux"))]
    fn sample_cpu(&mut self) -> (f64, Vec<f64>) {
        (0.0, Vec::new())
    }

    /// Computes total and per-core usage from `/proc/stat` content, diffing
    /// against the previous sample's counters.
    fn sample_cpu_from(&mut self, content: &str) -> (f64, Vec<f64>) {
        let mut total = None;
        let mut cores = Vec::new();

        for line in content.lines() {
            if line.starts_with("cpu ") {
                total = parse_cpu_line(line);
            } else if line.starts_with("cpu") {
                if let Some(ticks) = parse_cpu_line(line) {
                    cores.push(ticks);
                }
            }
        }

        let total_pct = match (total, self.prev_total) {
            (Some(curr), Some(prev)) => usage_percentage(prev, curr),
            _ => 0.0,
        };

        let mut core_pcts = Vec::with_capacity(cores.len());
        for (i, curr) in cores.iter().enumerate() {
            let pct = match self.prev_cores.get(i) {
                Some(prev) => usage_percentage(*prev, *curr),
                None => 0.0,
            };
            core_pcts.push(pct);
        }

        self.prev_total = total;
        self.prev_cores = cores;

        (total_pct, core_pcts)
    }
}

/// Parses one `cpuN ...` line into cumulative tick counters.
fn parse_cpu_line(line: &str) -> Option<CpuTicks> {
    let mut fields = line.split_whitespace();
    fields.next()?; // label

    let mut next = || fields.next()?.parse::<u64>().ok();

    Some(CpuTicks {
        user: next()?,
        nice: next()?,
        system: next()?,
        idle: next()?,
        iowait: next().unwrap_or(0),
        irq: next().unwrap_or(0),
        softirq: next().unwrap_or(0),
        steal: next().unwrap_or(0),
    })
}

/// Usage percentage from the delta between two cumulative counters.
fn usage_percentage(prev: CpuTicks, curr: CpuTicks) -> f64 {
    let total_delta = curr.total().saturating_sub(prev.total());
    if total_delta == 0 {
        return 0.0;
    }
    let active_delta = curr.active().saturating_sub(prev.active());
    (active_delta as f64 / total_delta as f64) * 100.0
}

#[cfg(target_os = "linux")]
fn sample_memory() -> f64 {
    let Ok(content) = std::fs::read_to_string("/proc/meminfo") else {
        return 0.0;
    };
    parse_meminfo(&content)
}

#[cfg(not(target_os = "linux"))]
fn sample_memory() -> f64 {
    0.0
}

/// Memory usage percentage from `/proc/meminfo` content.
///
/// Used memory is `MemTotal - MemAvailable`, matching what `free(1)` calls
/// "used" on modern kernels.
fn parse_meminfo(content: &str) -> f64 {
    let mut total_kb = 0u64;
    let mut available_kb = 0u64;

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total_kb = parse_meminfo_kb(rest);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            available_kb = parse_meminfo_kb(rest);
        }
    }

    if total_kb == 0 {
        return 0.0;
    }

    let used_kb = total_kb.saturating_sub(available_kb);
    (used_kb as f64 / total_kb as f64) * 100.0
}

fn parse_meminfo_kb(rest: &str) -> u64 {
    rest.split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Total and used bytes for the filesystem holding `mount_point`.
#[cfg(unix)]
fn sample_disk(mount_point: &str) -> (u64, u64) {
    let Ok(path) = std::ffi::CString::new(mount_point) else {
        return (0, 0);
    };

    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: path is a valid NUL-terminated string and stat is a
    // zero-initialized statvfs buffer owned by this frame.
    let rc = unsafe { libc::statvfs(path.as_ptr(), &mut stat) };
    if rc != 0 {
        return (0, 0);
    }

    let block = u64::from(stat.f_frsize);
    let total = u64::from(stat.f_blocks) * block;
    let free = u64::from(stat.f_bfree) * block;
    (total, total.saturating_sub(free))
}

#[cfg(not(unix))]
fn sample_disk(_mount_point: &str) -> (u64, u64) {
    (0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_id() {
        assert_eq!(SystemCollector::new("/").id(), "system");
    }

    #[test]
    fn test_parse_cpu_line() {
        let ticks = parse_cpu_line("cpu  100 5 30 800 20 3 2 0 0 0").expect("should parse");
        assert_eq!(ticks.user, 100);
        assert_eq!(ticks.nice, 5);
        assert_eq!(ticks.system, 30);
        assert_eq!(ticks.idle, 800);
        assert_eq!(ticks.iowait, 20);
        assert_eq!(ticks.total(), 960);
        assert_eq!(ticks.active(), 140);
    }

    #[test]
    fn test_parse_cpu_line_short() {
        // Old kernels report fewer fields; missing ones default to 0.
        let ticks = parse_cpu_line("cpu0 10 0 5 85").expect("should parse");
        assert_eq!(ticks.iowait, 0);
        assert_eq!(ticks.total(), 100);
    }

    #[test]
    fn test_parse_cpu_line_invalid() {
        assert!(parse_cpu_line("cpu garbage here").is_none());
        assert!(parse_cpu_line("cpu  42").is_none());
    }

    #[test]
    fn test_usage_percentage() {
        let prev = CpuTicks { user: 100, idle: 900, ..CpuTicks::default() };
        let curr = CpuTicks { user: 150, idle: 950, ..CpuTicks::default() };
        // 50 active ticks over 100 total ticks.
        let pct = usage_percentage(prev, curr);
        assert!((pct - 50.0).abs() < f64::EPSILON, "got {pct}");
    }

    #[test]
    fn test_usage_percentage_no_delta() {
        let ticks = CpuTicks { user: 100, idle: 900, ..CpuTicks::default() };
        assert_eq!(usage_percentage(ticks, ticks), 0.0);
    }

    #[test]
    fn test_first_sample_reports_zero() {
        let mut collector = SystemCollector::new("/");
        let content = "cpu  100 0 50 850 0 0 0 0\ncpu0 100 0 50 850 0 0 0 0\n";
        let (total, cores) = collector.sample_cpu_from(content);
        assert_eq!(total, 0.0);
        assert_eq!(cores, vec![0.0]);
    }

    #[test]
    fn test_second_sample_uses_delta() {
        let mut collector = SystemCollector::new("/");
        let first = "cpu  100 0 50 850 0 0 0 0\ncpu0 100 0 50 850 0 0 0 0\n";
        let second = "cpu  160 0 90 950 0 0 0 0\ncpu0 160 0 90 950 0 0 0 0\n";

        collector.sample_cpu_from(first);
        let (total, cores) = collector.sample_cpu_from(second);

        // 100 active ticks over 200 total ticks.
        assert!((total - 50.0).abs() < 1e-9, "got {total}");
        assert_eq!(cores.len(), 1);
        assert!((cores[0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_core_count_change_resets_new_cores() {
        let mut collector = SystemCollector::new("/");
        collector.sample_cpu_from("cpu  100 0 0 900 0 0 0 0\ncpu0 100 0 0 900 0 0 0 0\n");
        let (_, cores) = collector.sample_cpu_from(
            "cpu  200 0 0 1800 0 0 0 0\ncpu0 200 0 0 1800 0 0 0 0\ncpu1 50 0 0 450 0 0 0 0\n",
        );
        assert_eq!(cores.len(), 2);
        // The newly appeared core has no previous counters.
        assert_eq!(cores[1], 0.0);
    }

    #[test]
    fn test_parse_meminfo() {
        let content = "MemTotal:       16000000 kB\nMemFree:         2000000 kB\nMemAvailable:    8000000 kB\n";
        let pct = parse_meminfo(content);
        assert!((pct - 50.0).abs() < f64::EPSILON, "got {pct}");
    }

    #[test]
    fn test_parse_meminfo_empty() {
        assert_eq!(parse_meminfo(""), 0.0);
    }

    #[test]
    fn test_disk_pct() {
        let sample = SystemSample {
            disk_total_bytes: 1000,
            disk_used_bytes: 250,
            ..SystemSample::default()
        };
        assert!((sample.disk_pct() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disk_pct_zero_capacity() {
        assert_eq!(SystemSample::default().disk_pct(), 0.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_sample_on_linux() {
        let mut collector = SystemCollector::new("/");
        let sample = collector.sample().expect("sample should succeed");
        assert!(sample.mem_pct > 0.0 && sample.mem_pct <= 100.0);
        assert!(sample.disk_total_bytes > 0);
        assert!(!sample.cpu_per_core.is_empty());
    }
}
