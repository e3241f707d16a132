//! Best-effort version resource reader.
//!
//! # Responsibility
//! - Read the plain-text version resource consumed once at startup.
//!
//! # Invariants
//! - Never raises to the caller: any read failure degrades to the literal
//!   `Unknown`. This soft-failure is deliberate and sits outside the core
//!   error taxonomy.

use log::warn;
use std::path::Path;

/// Fallback value when the version resource cannot be read.
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Reads the first non-empty line of a plain-text version resource.
///
/// Returns `Unknown` on any failure (missing file, unreadable contents,
/// blank resource); the failure is logged, never propagated.
pub fn read_version_resource(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let version = contents.lines().next().unwrap_or("").trim();
            if version.is_empty() {
                warn!(
                    "event=version_read module=version status=soft_fail path={} reason=empty_resource",
                    path.display()
                );
                UNKNOWN_VERSION.to_string()
            } else {
                version.to_string()
            }
        }
        Err(err) => {
            warn!(
                "event=version_read module=version status=soft_fail path={} error={err}",
                path.display()
            );
            UNKNOWN_VERSION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{read_version_resource, UNKNOWN_VERSION};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "moneymanager-version-{suffix}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn missing_resource_degrades_to_unknown() {
        let path = unique_temp_file("missing");
        assert_eq!(read_version_resource(&path), UNKNOWN_VERSION);
    }

    #[test]
    fn blank_resource_degrades_to_unknown() {
        let path = unique_temp_file("blank");
        std::fs::write(&path, "\n\n").unwrap();
        assert_eq!(read_version_resource(&path), UNKNOWN_VERSION);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn first_line_is_trimmed_and_returned() {
        let path = unique_temp_file("ok");
        std::fs::write(&path, "  1.4.2  \nbuild 91\n").unwrap();
        assert_eq!(read_version_resource(&path), "1.4.2");
        let _ = std::fs::remove_file(&path);
    }
}
