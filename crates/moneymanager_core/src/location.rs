//! Database location identifiers and default resolution.
//!
//! # Responsibility
//! - Represent where a database lives: a direct filesystem path or an opaque
//!   name owned by a platform storage sandbox.
//! - Resolve the effective location from bootstrap parameters.
//!
//! # Invariants
//! - Locations are immutable once constructed; equality is by identifier.
//! - `exists` performs no side effects and touches no global state.
//! - Sandboxed-named existence is best-effort only: the sandbox creates the
//!   store on first open, so `exists` reports `true` optimistically. Callers
//!   needing an authoritative answer must use
//!   `DatabaseFactory::database_exists`.

use crate::config::{BootstrapParams, ConfigurationError, Platform};
use directories::UserDirs;
use std::path::{Path, PathBuf};

/// Dedicated application subdirectory under the user's home directory.
pub const DEFAULT_DB_DIR: &str = ".moneymanager";

/// Fixed default database filename, shared by all platforms.
pub const DEFAULT_DB_NAME: &str = "moneymanager.db";

/// Identifier for where a database resides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Absolute or caller-supplied filesystem path; existence is directly
    /// checkable.
    File(PathBuf),
    /// Opaque name resolved by a platform-owned storage sandbox.
    SandboxedNamed(String),
}

impl Location {
    /// Best-effort existence check without opening anything.
    ///
    /// File locations stat the filesystem. Sandboxed-named locations always
    /// report `true`: the sandbox creates the store on open, and core cannot
    /// ask it about absent entries without opening one.
    pub fn exists(&self) -> bool {
        match self {
            Self::File(path) => path.exists(),
            Self::SandboxedNamed(_) => true,
        }
    }

    /// Human-readable description for diagnostics and log events.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => format!("file:{}", path.display()),
            Self::SandboxedNamed(name) => format!("sandbox:{name}"),
        }
    }

    /// Returns the backing path for file locations.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::SandboxedNamed(_) => None,
        }
    }
}

/// Resolves the effective database location for the given parameters.
///
/// Explicit desktop overrides win over the platform default. Mobile always
/// targets the fixed default name inside the sandbox.
///
/// # Errors
/// - Returns `ConfigurationError` when parameters fail validation or no home
///   directory can be determined for the desktop default.
pub fn default_location(params: &BootstrapParams) -> Result<Location, ConfigurationError> {
    params.validate()?;

    match &params.platform {
        Platform::Desktop {
            explicit_path: Some(path),
        } => Ok(Location::File(path.clone())),
        Platform::Desktop {
            explicit_path: None,
        } => {
            let user_dirs = UserDirs::new().ok_or_else(|| {
                ConfigurationError::new("cannot determine home directory for default location")
            })?;
            Ok(Location::File(
                user_dirs
                    .home_dir()
                    .join(DEFAULT_DB_DIR)
                    .join(DEFAULT_DB_NAME),
            ))
        }
        Platform::Mobile { .. } => Ok(Location::SandboxedNamed(DEFAULT_DB_NAME.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{default_location, Location, DEFAULT_DB_DIR, DEFAULT_DB_NAME};
    use crate::config::BootstrapParams;
    use std::path::PathBuf;

    #[test]
    fn file_location_equality_is_by_path() {
        let a = Location::File(PathBuf::from("/tmp/a.db"));
        let b = Location::File(PathBuf::from("/tmp/a.db"));
        let c = Location::File(PathBuf::from("/tmp/c.db"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn sandboxed_location_always_reports_existing() {
        let location = Location::SandboxedNamed("never-created.db".to_string());
        assert!(location.exists());
    }

    #[test]
    fn missing_file_location_reports_absent() {
        let location = Location::File(PathBuf::from("/definitely/not/here.db"));
        assert!(!location.exists());
    }

    #[test]
    fn describe_names_the_variant() {
        let file = Location::File(PathBuf::from("/tmp/x.db"));
        assert!(file.describe().starts_with("file:"));
        let named = Location::SandboxedNamed("ledger".to_string());
        assert_eq!(named.describe(), "sandbox:ledger");
    }

    #[test]
    fn desktop_default_resolves_under_home() {
        let location = default_location(&BootstrapParams::desktop()).unwrap();
        let path = location.file_path().unwrap();
        assert!(path.ends_with(PathBuf::from(DEFAULT_DB_DIR).join(DEFAULT_DB_NAME)));
    }

    #[test]
    fn desktop_override_wins_over_default() {
        let location = default_location(&BootstrapParams::desktop_at("/tmp/ledger.db")).unwrap();
        assert_eq!(location, Location::File(PathBuf::from("/tmp/ledger.db")));
    }
}
