//! Configuration for patch processing.

/// Configuration for a [`PatchProcessor`](crate::PatchProcessor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Whether snapshot, patch and content MACs are checked.
    pub validate_macs: bool,
    /// Whether every patch must be exactly one version ahead of the state.
    pub require_sequential_versions: bool,
}

impl ProcessorConfig {
    /// Creates the default configuration: MACs validated, version gaps allowed.
    pub fn new() -> Self {
        Self {
            validate_macs: true,
            require_sequential_versions: false,
        }
    }

    /// Creates a configuration that skips MAC validation.
    ///
    /// The hash is still maintained. Useful when keys are not yet available
    /// and MACs will be checked on a later pass.
    pub fn unverified() -> Self {
        Self::new().with_validate_macs(false)
    }

    /// Sets whether MACs are validated.
    pub fn with_validate_macs(mut self, validate: bool) -> Self {
        self.validate_macs = validate;
        self
    }

    /// Sets whether patches must arrive without version gaps.
    pub fn with_sequential_versions(mut self, required: bool) -> Self {
        self.require_sequential_versions = required;
        self
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::new()
    }
}
