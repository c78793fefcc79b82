//! `~/.pgcenterrc` connection file (C10, supplemental to §6 EXTERNAL
//! INTERFACES): one connection per line, colon-separated
//! `host:port:dbname:user:password`.
//!
//! Grounded in the original's `create_pgcenterrc_conn`: the file is
//! ignored (with a warning, not a hard failure) unless its permission
//! bits exclude group and other access entirely.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::console::{ConnParams, MAX_CONSOLES};
use crate::error::ConfigError;

/// Bits that must all be clear: group/other read, write, execute.
const INSECURE_MODE_MASK: u32 = 0o077;

/// Default path: `$HOME/.pgcenterrc`.
pub fn default_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| Path::new(&home).join(".pgcenterrc"))
}

/// Reads and parses a `.pgcenterrc` file, returning up to
/// [`MAX_CONSOLES`] [`ConnParams`] in line order.
///
/// Returns `Ok(vec![])`, not an error, when the file simply doesn't
/// exist — callers should fall back to defaults/CLI-supplied params in
/// that case. Returns [`ConfigError::InsecurePermissions`] when the file
/// exists but is group/other accessible, matching the original's refusal
/// to trust a world-readable credentials file.
pub fn read_connections(path: &Path) -> Result<Vec<ConnParams>, ConfigError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let meta = fs::metadata(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    if meta.permissions().mode() & INSECURE_MODE_MASK != 0 {
        tracing::warn!(path = %path.display(), "ignoring connection file with group/other permissions");
        return Err(ConfigError::InsecurePermissions);
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    Ok(parse_connections(&content))
}

/// Parses already-read file content, capped at [`MAX_CONSOLES`] lines.
/// A malformed line (wrong field count) is skipped rather than aborting
/// the whole file.
fn parse_connections(content: &str) -> Vec<ConnParams> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_line)
        .take(MAX_CONSOLES)
        .collect()
}

fn parse_line(line: &str) -> Option<ConnParams> {
    let fields: Vec<&str> = line.splitn(5, ':').collect();
    if fields.len() != 5 {
        return None;
    }
    let port = fields[1].parse().ok()?;
    Some(ConnParams {
        host: fields[0].to_string(),
        port,
        dbname: fields[2].to_string(),
        user: fields[3].to_string(),
        password: if fields[4].is_empty() {
            None
        } else {
            Some(fields[4].to_string())
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt as _;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_one_connection_per_line() {
        let content = "localhost:5432:postgres:alice:secret\n\
                        db2.internal:5433:app:bob:\n";
        let conns = parse_connections(content);
        assert_eq!(conns.len(), 2);
        assert_eq!(conns[0].host, "localhost");
        assert_eq!(conns[0].port, 5432);
        assert_eq!(conns[0].password.as_deref(), Some("secret"));
        assert_eq!(conns[1].password, None);
    }

    #[test]
    fn skips_malformed_lines() {
        let content = "not:enough:fields\nlocalhost:5432:postgres:alice:\n";
        let conns = parse_connections(content);
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].host, "localhost");
    }

    #[test]
    fn caps_at_max_consoles() {
        let line = "h:5432:d:u:\n";
        let content = line.repeat(MAX_CONSOLES + 5);
        let conns = parse_connections(&content);
        assert_eq!(conns.len(), MAX_CONSOLES);
    }

    #[test]
    fn missing_file_returns_empty_not_error() {
        let conns = read_connections(Path::new("/nonexistent/.pgcenterrc")).unwrap();
        assert!(conns.is_empty());
    }

    #[test]
    fn insecure_permissions_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "localhost:5432:postgres:alice:secret").unwrap();
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .unwrap();
        assert_eq!(
            read_connections(file.path()),
            Err(ConfigError::InsecurePermissions)
        );
    }

    #[test]
    fn secure_permissions_are_accepted() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "localhost:5432:postgres:alice:secret").unwrap();
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))
            .unwrap();
        let conns = read_connections(file.path()).unwrap();
        assert_eq!(conns.len(), 1);
    }
}
