//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc` files
//! into structured data. They are designed to be easily testable with string inputs.

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Single CPU stats from `/proc/stat`.
#[derive(Debug, Clone, Default)]
pub struct CpuStat {
    pub cpu_id: Option<u32>, // None for aggregate "cpu" line
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuStat {
    /// Sum of every accounted tick, the denominator for a CPU percentage.
    pub fn total_ticks(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    /// Ticks spent outside idle/iowait — the numerator for "busy" percent.
    pub fn busy_ticks(&self) -> u64 {
        self.total_ticks() - self.idle - self.iowait
    }
}

/// Global stats from `/proc/stat`.
#[derive(Debug, Clone, Default)]
pub struct GlobalStat {
    pub cpus: Vec<CpuStat>,
    pub ctxt: u64,
    pub btime: u64,
    pub processes: u64,
    pub procs_running: u32,
    pub procs_blocked: u32,
}

impl GlobalStat {
    /// The aggregate "cpu" line (first entry, `cpu_id == None`).
    pub fn aggregate(&self) -> Option<&CpuStat> {
        self.cpus.iter().find(|c| c.cpu_id.is_none())
    }
}

/// Parses `/proc/stat` content.
pub fn parse_global_stat(content: &str) -> Result<GlobalStat, ParseError> {
    let mut stat = GlobalStat::default();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        if parts[0].starts_with("cpu") {
            let cpu_id = if parts[0] == "cpu" {
                None
            } else {
                parts[0].strip_prefix("cpu").and_then(|s| s.parse().ok())
            };

            let get_val =
                |idx: usize| -> u64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

            stat.cpus.push(CpuStat {
                cpu_id,
                user: get_val(1),
                nice: get_val(2),
                system: get_val(3),
                idle: get_val(4),
                iowait: get_val(5),
                irq: get_val(6),
                softirq: get_val(7),
                steal: get_val(8),
                guest: get_val(9),
                guest_nice: get_val(10),
            });
        } else if parts[0] == "ctxt" {
            stat.ctxt = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
        } else if parts[0] == "btime" {
            stat.btime = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
        } else if parts[0] == "processes" {
            stat.processes = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
        } else if parts[0] == "procs_running" {
            stat.procs_running = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
        } else if parts[0] == "procs_blocked" {
            stat.procs_blocked = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
        }
    }

    Ok(stat)
}

/// Parsed data from `/proc/loadavg`.
#[derive(Debug, Clone, Default)]
pub struct LoadAvg {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
    pub running: u32,
    pub total: u32,
    pub last_pid: u32,
}

/// Parses `/proc/loadavg` content.
pub fn parse_loadavg(content: &str) -> Result<LoadAvg, ParseError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() < 5 {
        return Err(ParseError::new("invalid loadavg format"));
    }

    let load1 = parts[0]
        .parse()
        .map_err(|_| ParseError::new("invalid load1"))?;
    let load5 = parts[1]
        .parse()
        .map_err(|_| ParseError::new("invalid load5"))?;
    let load15 = parts[2]
        .parse()
        .map_err(|_| ParseError::new("invalid load15"))?;

    // Format: running/total
    let (running, total) = if let Some((r, t)) = parts[3].split_once('/') {
        (r.parse().unwrap_or(0), t.parse().unwrap_or(0))
    } else {
        (0, 0)
    };

    let last_pid = parts[4].parse().unwrap_or(0);

    Ok(LoadAvg {
        load1,
        load5,
        load15,
        running,
        total,
        last_pid,
    })
}

/// Parses `/proc/uptime` content: two space-separated floats, system
/// uptime and cumulative idle time, both in seconds.
pub fn parse_uptime(content: &str) -> Result<f64, ParseError> {
    content
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::new("invalid uptime format"))?
        .parse()
        .map_err(|_| ParseError::new("invalid uptime value"))
}
