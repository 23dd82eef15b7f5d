//! Traversal options and layered configuration.
//!
//! Precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (`MATHSEM_MAX_DEPTH`, `MATHSEM_STRUCTURE`)
//! 3. Defaults

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

/// Environment variable overriding [`TransformOptions::max_depth`].
pub const ENV_MAX_DEPTH: &str = "MATHSEM_MAX_DEPTH";
/// Environment variable overriding [`TransformOptions::structure`].
pub const ENV_STRUCTURE: &str = "MATHSEM_STRUCTURE";

/// Default nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 512;

// ============================================================================
// Options
// ============================================================================

/// What to do when a fixed-arity rule sees the wrong number of children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructurePolicy {
    /// Fail the traversal with an arity error.
    #[default]
    Strict,
    /// Pad with empty nodes or drop extra children, and log a warning.
    Repair,
}

impl FromStr for StructurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(StructurePolicy::Strict),
            "repair" => Ok(StructurePolicy::Repair),
            _ => Err("expected 'strict' or 'repair'".to_string()),
        }
    }
}

impl fmt::Display for StructurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructurePolicy::Strict => f.write_str("strict"),
            StructurePolicy::Repair => f.write_str("repair"),
        }
    }
}

/// Options for one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Maximum nesting depth of the input tree.
    ///
    /// Default: 512
    pub max_depth: usize,

    /// Handling of fixed-arity mismatches.
    ///
    /// Default: strict
    pub structure: StructurePolicy,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            structure: StructurePolicy::default(),
        }
    }
}

// ============================================================================
// Configuration Sources
// ============================================================================

/// Configuration value source (for precedence tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in default value.
    Default = 0,
    /// From environment variable.
    EnvVar = 1,
    /// From CLI flag (highest precedence).
    CliFlag = 2,
}

/// A configuration value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        ConfigValue { value, source }
    }

    /// Merge with another value, preferring higher precedence.
    pub fn merge(self, other: Self) -> Self {
        if other.source >= self.source {
            other
        } else {
            self
        }
    }
}

/// CLI configuration overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// --max-depth flag.
    pub max_depth: Option<usize>,
    /// --structure flag.
    pub structure: Option<StructurePolicy>,
}

// ============================================================================
// Configuration Resolution
// ============================================================================

/// Resolved configuration with precedence information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub max_depth: ConfigValue<usize>,
    pub structure: ConfigValue<StructurePolicy>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let defaults = TransformOptions::default();
        ResolvedConfig {
            max_depth: ConfigValue::new(defaults.max_depth, ConfigSource::Default),
            structure: ConfigValue::new(defaults.structure, ConfigSource::Default),
        }
    }
}

impl ResolvedConfig {
    /// Resolve configuration from the process environment and CLI flags.
    pub fn resolve(cli_overrides: &CliOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(|name| std::env::var(name).ok(), cli_overrides)
    }

    /// Resolve configuration with an explicit environment lookup.
    pub fn resolve_with<F>(env: F, cli_overrides: &CliOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ResolvedConfig::default();
        config.apply_env_vars(env)?;
        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn apply_env_vars<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = env(ENV_MAX_DEPTH) {
            let depth = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|depth| *depth > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    name: ENV_MAX_DEPTH.to_string(),
                    value: raw.clone(),
                    reason: "expected a positive integer".to_string(),
                })?;
            self.max_depth = self
                .max_depth
                .clone()
                .merge(ConfigValue::new(depth, ConfigSource::EnvVar));
        }

        if let Some(raw) = env(ENV_STRUCTURE) {
            let policy = raw
                .parse::<StructurePolicy>()
                .map_err(|reason| ConfigError::InvalidValue {
                    name: ENV_STRUCTURE.to_string(),
                    value: raw.clone(),
                    reason,
                })?;
            self.structure = self
                .structure
                .clone()
                .merge(ConfigValue::new(policy, ConfigSource::EnvVar));
        }
        Ok(())
    }

    fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(depth) = overrides.max_depth {
            self.max_depth = ConfigValue::new(depth, ConfigSource::CliFlag);
        }
        if let Some(policy) = overrides.structure {
            self.structure = ConfigValue::new(policy, ConfigSource::CliFlag);
        }
    }

    /// Options for a traversal.
    pub fn to_options(&self) -> TransformOptions {
        TransformOptions {
            max_depth: self.max_depth.value,
            structure: self.structure.value,
        }
    }
}
