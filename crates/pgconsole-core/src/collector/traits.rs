//! Abstraction for filesystem access, so the Host Sampler can be tested
//! without real `/proc` access.

use std::io;
use std::path::{Path, PathBuf};

/// Filesystem operations the Host Sampler needs.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Delegates to `std::fs`. Used in production against the real `/proc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_fs_reads_an_existing_file() {
        let fs = RealFs::new();
        let content = fs.read_to_string(Path::new("/proc/loadavg"));
        assert!(content.is_ok() || !Path::new("/proc/loadavg").exists());
    }

    #[test]
    fn real_fs_exists_is_false_for_bogus_path() {
        let fs = RealFs::new();
        assert!(!fs.exists(Path::new("/nonexistent/path/pgconsole-test")));
    }
}

/// Mock filesystem backed by an in-memory map, for unit tests that can't
/// rely on `/proc` being present or stable (CI, macOS, containers).
pub mod mock {
    use super::FileSystem;
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct MockFs {
        files: Mutex<HashMap<PathBuf, String>>,
    }

    impl MockFs {
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a file's content, matching the teacher's `add_file`
        /// naming; parent directories aren't tracked since this trait has
        /// no `read_dir` to enumerate them against.
        pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
            self.files
                .lock()
                .unwrap()
                .insert(path.into(), content.into());
        }

        /// A host with one CPU and a benign load average, useful as a
        /// baseline that tests then mutate.
        pub fn typical_host() -> Self {
            let mut fs = Self::new();
            fs.add_file(
                "/proc/stat",
                "cpu  10000 500 3000 80000 1000 200 100 0 0 0\n\
                 ctxt 500000\nbtime 1700000000\nprocesses 10000\n\
                 procs_running 2\nprocs_blocked 0\n",
            );
            fs.add_file("/proc/loadavg", "0.15 0.10 0.05 1/150 1234\n");
            fs.add_file("/proc/uptime", "123456.78 98765.43\n");
            fs
        }
    }

    impl FileSystem for MockFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn mock_fs_returns_registered_content() {
            let mut fs = MockFs::new();
            fs.add_file("/proc/loadavg", "1.0 1.0 1.0 1/1 1\n");
            let content = fs.read_to_string(Path::new("/proc/loadavg")).unwrap();
            assert_eq!(content, "1.0 1.0 1.0 1/1 1\n");
        }

        #[test]
        fn mock_fs_errors_on_unregistered_path() {
            let fs = MockFs::new();
            assert!(fs.read_to_string(Path::new("/proc/stat")).is_err());
        }
    }
}
