//! Host Sampler (C5): load averages and CPU percentages derived from
//! two adjacent `/proc/stat` snapshots.

use std::path::Path;

use crate::collector::traits::FileSystem;
use crate::error::ProcError;

use super::procfs::parser::{parse_global_stat, parse_loadavg, parse_uptime};

/// Most Linux distributions fix `USER_HZ` at 100; there is no portable
/// way to read `sysconf(_SC_CLK_TCK)` without an extra crate, and the
/// only place this matters (uptime scaling) tolerates the assumption.
const TICKS_PER_SECOND: f64 = 100.0;

/// One `/proc/stat` aggregate-CPU reading, used in pairs to derive rates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuSample {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuSample {
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }
}

/// Percent-of-interval breakdown between two [`CpuSample`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuPercentages {
    pub user: f64,
    pub sys: f64,
    pub nice: f64,
    pub idle: f64,
    pub iowait: f64,
    pub hardirq: f64,
    pub softirq: f64,
    pub steal: f64,
}

/// Computes [`CpuPercentages`] from `prev` to `curr`.
///
/// `sys` is reported as `system + softirq + irq` (kernel-time aggregate);
/// `hardirq`/`softirq` are also reported individually. A category whose
/// counter regresses between samples (a dynamic-tick counter wrapping or
/// a container CPU being hot-unplugged) reports `0.0` rather than a
/// negative percentage.
pub fn cpu_percentages(prev: &CpuSample, curr: &CpuSample) -> CpuPercentages {
    let interval = curr.total().saturating_sub(prev.total()).max(1) as f64;

    let pct = |curr_v: u64, prev_v: u64| -> f64 {
        if curr_v < prev_v {
            0.0
        } else {
            100.0 * (curr_v - prev_v) as f64 / interval
        }
    };

    let user = pct(curr.user, prev.user);
    let nice = pct(curr.nice, prev.nice);
    let system = pct(curr.system, prev.system);
    let idle = pct(curr.idle, prev.idle);
    let iowait = pct(curr.iowait, prev.iowait);
    let hardirq = pct(curr.irq, prev.irq);
    let softirq = pct(curr.softirq, prev.softirq);
    let steal = pct(curr.steal, prev.steal);

    CpuPercentages {
        user,
        sys: system + softirq + hardirq,
        nice,
        idle,
        iowait,
        hardirq,
        softirq,
        steal,
    }
}

/// Load averages sampled fresh every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAvg {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Samples `/proc/stat`, `/proc/loadavg`, and `/proc/uptime` through an
/// injectable [`FileSystem`], so CPU-percentage math is testable without
/// a real `/proc`.
pub struct HostSampler<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> HostSampler<F> {
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    /// Reads the aggregate CPU line. A read or parse failure here is
    /// fatal per the external-interface contract — unlike loadavg/uptime,
    /// there is no meaningful zero-fallback for CPU ticks.
    pub fn sample_cpu(&self) -> Result<CpuSample, ProcError> {
        let path = format!("{}/stat", self.proc_path);
        let content = self
            .fs
            .read_to_string(Path::new(&path))
            .map_err(|e| ProcError::new(format!("reading {path}: {e}")))?;
        let stat = parse_global_stat(&content).map_err(|e| ProcError::new(e.message))?;
        let agg = stat
            .aggregate()
            .ok_or_else(|| ProcError::new("no aggregate cpu line in /proc/stat"))?;

        Ok(CpuSample {
            user: agg.user,
            nice: agg.nice,
            system: agg.system,
            idle: agg.idle,
            iowait: agg.iowait,
            irq: agg.irq,
            softirq: agg.softirq,
            steal: agg.steal,
        })
    }

    /// Reads load averages. Read/parse failures fall back to zeros.
    pub fn sample_load_avg(&self) -> LoadAvg {
        let path = format!("{}/loadavg", self.proc_path);
        let result = self
            .fs
            .read_to_string(Path::new(&path))
            .ok()
            .and_then(|content| parse_loadavg(&content).ok())
            .map(|l| LoadAvg {
                one: l.load1,
                five: l.load5,
                fifteen: l.load15,
            });
        if result.is_none() {
            tracing::warn!(path = %path, "falling back to zero load averages");
        }
        result.unwrap_or_default()
    }

    /// Reads system uptime in seconds. Falls back to `0.0` on failure.
    pub fn sample_uptime_secs(&self) -> f64 {
        let path = format!("{}/uptime", self.proc_path);
        let result = self
            .fs
            .read_to_string(Path::new(&path))
            .ok()
            .and_then(|content| parse_uptime(&content).ok());
        if result.is_none() {
            tracing::warn!(path = %path, "falling back to zero uptime");
        }
        result.unwrap_or(0.0)
    }

    /// Clock ticks per second, for callers scaling raw counters to
    /// seconds (e.g. process start time).
    pub fn ticks_per_second(&self) -> f64 {
        TICKS_PER_SECOND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::traits::mock::MockFs;

    #[test]
    fn cpu_percentages_are_proportional_to_interval() {
        let prev = CpuSample {
            user: 1000,
            idle: 8000,
            ..Default::default()
        };
        let curr = CpuSample {
            user: 1100,
            idle: 8900,
            ..Default::default()
        };
        let pcts = cpu_percentages(&prev, &curr);
        assert!((pcts.user - 10.0).abs() < 0.01);
        assert!((pcts.idle - 90.0).abs() < 0.01);
    }

    #[test]
    fn sys_aggregates_system_softirq_and_hardirq() {
        let prev = CpuSample::default();
        let curr = CpuSample {
            system: 50,
            softirq: 30,
            irq: 20,
            idle: 900,
            ..Default::default()
        };
        let pcts = cpu_percentages(&prev, &curr);
        assert!((pcts.sys - 10.0).abs() < 0.01);
        assert!((pcts.hardirq - 2.0).abs() < 0.01);
        assert!((pcts.softirq - 3.0).abs() < 0.01);
    }

    #[test]
    fn counter_regression_clamps_to_zero_not_negative() {
        let prev = CpuSample {
            user: 5000,
            idle: 5000,
            ..Default::default()
        };
        let curr = CpuSample {
            user: 4000, // regressed
            idle: 6000,
            ..Default::default()
        };
        let pcts = cpu_percentages(&prev, &curr);
        assert_eq!(pcts.user, 0.0);
        assert!(pcts.idle > 0.0);
    }

    #[test]
    fn zero_interval_does_not_divide_by_zero() {
        let sample = CpuSample {
            user: 100,
            ..Default::default()
        };
        let pcts = cpu_percentages(&sample, &sample);
        assert_eq!(pcts.user, 0.0);
    }

    #[test]
    fn sample_cpu_reads_aggregate_line_via_mock_fs() {
        let fs = MockFs::typical_host();
        let sampler = HostSampler::new(fs, "/proc");
        let sample = sampler.sample_cpu().unwrap();
        assert_eq!(sample.user, 10000);
        assert_eq!(sample.idle, 80000);
    }

    #[test]
    fn sample_cpu_errors_when_stat_missing() {
        let fs = MockFs::new();
        let sampler = HostSampler::new(fs, "/proc");
        assert!(sampler.sample_cpu().is_err());
    }

    #[test]
    fn sample_load_avg_falls_back_to_zero_on_missing_file() {
        let fs = MockFs::new();
        let sampler = HostSampler::new(fs, "/proc");
        assert_eq!(sampler.sample_load_avg(), LoadAvg::default());
    }

    #[test]
    fn sample_load_avg_reads_through_mock_fs() {
        let fs = MockFs::typical_host();
        let sampler = HostSampler::new(fs, "/proc");
        let load = sampler.sample_load_avg();
        assert!((load.one - 0.15).abs() < 0.001);
    }

    #[test]
    fn sample_uptime_falls_back_to_zero_on_missing_file() {
        let fs = MockFs::new();
        let sampler = HostSampler::new(fs, "/proc");
        assert_eq!(sampler.sample_uptime_secs(), 0.0);
    }
}
