//! Bootstrap configuration parameters.
//!
//! # Responsibility
//! - Model the platform-supplied inputs required to resolve database
//!   locations and execution context.
//! - Validate required parameters up front so bootstrap fails fast.
//!
//! # Invariants
//! - Parameters are supplied once at process start and never mutated.
//! - A mobile platform without a sandbox context is rejected before any
//!   storage work happens.

use std::path::{Path, PathBuf};

/// Execution-context handle for sandboxed (mobile) storage.
///
/// Named stores are resolved relative to the sandbox root owned by the host
/// platform; core never invents paths outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxContext {
    root: PathBuf,
}

impl SandboxContext {
    /// Wraps a platform-owned sandbox root directory.
    ///
    /// # Errors
    /// - Returns `ConfigurationError` when the root is empty or relative.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ConfigurationError> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(ConfigurationError::new("sandbox root cannot be empty"));
        }
        if !root.is_absolute() {
            return Err(ConfigurationError::new(format!(
                "sandbox root must be an absolute path, got `{}`",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Resolves a named store to its backing path inside the sandbox.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Platform entry mode for location resolution and driver selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    /// Desktop filesystem. An explicit path overrides the home-directory
    /// default when present.
    Desktop { explicit_path: Option<PathBuf> },
    /// Sandboxed mobile storage. The context is mandatory.
    Mobile { sandbox: SandboxContext },
}

/// Immutable bootstrap inputs supplied once by the platform entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapParams {
    pub platform: Platform,
    /// Optional path of the plain-text version resource read at startup.
    pub version_resource: Option<PathBuf>,
}

impl BootstrapParams {
    /// Desktop parameters using the default home-directory location.
    pub fn desktop() -> Self {
        Self {
            platform: Platform::Desktop {
                explicit_path: None,
            },
            version_resource: None,
        }
    }

    /// Desktop parameters with an explicit database path override.
    pub fn desktop_at(path: impl Into<PathBuf>) -> Self {
        Self {
            platform: Platform::Desktop {
                explicit_path: Some(path.into()),
            },
            version_resource: None,
        }
    }

    /// Mobile parameters bound to a sandbox execution context.
    pub fn mobile(sandbox: SandboxContext) -> Self {
        Self {
            platform: Platform::Mobile { sandbox },
            version_resource: None,
        }
    }

    /// Validates parameter combinations that cannot be expressed in types.
    ///
    /// # Errors
    /// - Returns `ConfigurationError` when an explicit desktop path is
    ///   present but empty.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Platform::Desktop {
            explicit_path: Some(path),
        } = &self.platform
        {
            if path.as_os_str().is_empty() {
                return Err(ConfigurationError::new(
                    "explicit database path cannot be empty",
                ));
            }
        }
        Ok(())
    }
}

/// Required platform parameters missing or invalid; fatal to bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::{BootstrapParams, ConfigurationError, SandboxContext};

    #[test]
    fn sandbox_context_rejects_relative_root() {
        let err = SandboxContext::new("data/sandbox").unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn sandbox_context_rejects_empty_root() {
        let err = SandboxContext::new("").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn sandbox_context_resolves_named_store_under_root() {
        let context = SandboxContext::new("/data/app").unwrap();
        assert_eq!(
            context.resolve("ledger.db"),
            std::path::PathBuf::from("/data/app/ledger.db")
        );
    }

    #[test]
    fn desktop_params_with_empty_override_fail_validation() {
        let params = BootstrapParams::desktop_at("");
        let err: ConfigurationError = params.validate().unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn desktop_params_without_override_validate() {
        BootstrapParams::desktop().validate().unwrap();
    }
}
