//! Runtime configuration for node-warden
//!
//! There is no configuration file. A `Config` is built once at startup and
//! handed to the policy engine; tests build their own.

use std::time::Duration;

use crate::protect::ProtectionClassifier;

/// Executable-name prefix selected by default
pub const DEFAULT_TARGET_PREFIX: &str = "node";

/// How long a process gets to exit after the graceful signal
pub const EXIT_TIMEOUT: Duration = Duration::from_secs(3);

/// Immutable settings shared by the selector and the sequencer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    target_prefix: String,
    classifier: ProtectionClassifier,
    exit_timeout: Duration,
}

impl Config {
    /// Create a config from a prefix and keyword set
    pub fn new<I, S>(target_prefix: impl Into<String>, protected_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            target_prefix: target_prefix.into().to_lowercase(),
            classifier: ProtectionClassifier::new(protected_keywords),
            exit_timeout: EXIT_TIMEOUT,
        }
    }

    /// Config targeting `node` with the built-in keyword set
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_TARGET_PREFIX, Self::default_protected_keywords())
    }

    /// Built-in keyword set with a different target prefix
    pub fn with_prefix(target_prefix: impl Into<String>) -> Self {
        Self::new(target_prefix, Self::default_protected_keywords())
    }

    /// Override the graceful exit window
    pub fn with_exit_timeout(mut self, exit_timeout: Duration) -> Self {
        self.exit_timeout = exit_timeout;
        self
    }

    /// Keywords that mark a command line as belonging to a system process
    pub fn default_protected_keywords() -> Vec<String> {
        vec![
            "system".to_string(),
            "windows".to_string(),
            "service".to_string(),
        ]
    }

    /// Lowercased target prefix
    pub fn target_prefix(&self) -> &str {
        &self.target_prefix
    }

    /// Classifier built from the protected keywords
    pub fn classifier(&self) -> &ProtectionClassifier {
        &self.classifier
    }

    /// Graceful exit window
    pub fn exit_timeout(&self) -> Duration {
        self.exit_timeout
    }

    /// Case-insensitive prefix match on an executable name
    pub fn is_target_name(&self, name: &str) -> bool {
        name.to_lowercase().starts_with(&self.target_prefix)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_defaults()
    }
}
