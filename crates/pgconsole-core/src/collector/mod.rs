//! Data sources for the Refresh Engine: the host (`/proc`) and the
//! observed PostgreSQL server.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │                  Engine tick                │
//! │  ┌────────────────┐   ┌──────────────────┐  │
//! │  │  HostSampler    │   │    PgClient       │  │
//! │  │  - /proc/stat   │   │  - query_table()  │  │
//! │  │  - /proc/loadavg│   │  (StatClient)     │  │
//! │  │  - /proc/uptime │   └──────────────────┘  │
//! │  └───────┬────────┘                         │
//! │          │                                  │
//! │   ┌──────▼──────┐                           │
//! │   │  FileSystem │ (trait)                   │
//! │   └──────┬──────┘                           │
//! └──────────┼──────────────────────────────────┘
//!            │
//!     ┌──────┴──────┐
//!     │             │
//! ┌───▼───┐     ┌───▼───┐
//! │ RealFs│     │ MockFs│
//! └───────┘     └───────┘
//! ```

pub mod host;
pub mod pg;
pub mod procfs;
pub mod traits;

pub use host::{CpuPercentages, CpuSample, HostSampler, LoadAvg, cpu_percentages};
pub use pg::{PgClient, StatClient};
pub use traits::{FileSystem, RealFs};
