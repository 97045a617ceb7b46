//! Process-wide construction policy.
//!
//! The defaults are strict. They can be relaxed through the environment:
//!
//! - `TENSOR_IR_ARITY_CHECK`: `strict` (default) or `lenient`. Lenient indexing
//!   accepts any coordinate count when building an element access.
//! - `TENSOR_IR_VERIFY_OUTPUTS`: `1`/`true` (default) or `0`/`false`. Controls
//!   whether `Tensor::make` cross-checks shape and dtype against the producing
//!   operation.
//!
//! The environment is read once, on first use of [`global`].

use once_cell::sync::Lazy;

use crate::error::{IrError, Result};

pub const ARITY_CHECK_VAR: &str = "TENSOR_IR_ARITY_CHECK";
pub const VERIFY_OUTPUTS_VAR: &str = "TENSOR_IR_VERIFY_OUTPUTS";

/// How an element access treats a coordinate count that differs from the rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArityCheck {
    /// Reject the access with `IrError::IndexArityMismatch`.
    #[default]
    Strict,
    /// Build the access with whatever coordinates were supplied.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrConfig {
    pub arity_check: ArityCheck,
    pub verify_outputs: bool,
}

impl Default for IrConfig {
    fn default() -> Self {
        Self {
            arity_check: ArityCheck::Strict,
            verify_outputs: true,
        }
    }
}

impl IrConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup; unset keys keep
    /// their default. The first unparsable value is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(ARITY_CHECK_VAR) {
            config.arity_check = parse_arity(value)?;
        }
        if let Some(value) = lookup(VERIFY_OUTPUTS_VAR) {
            config.verify_outputs = parse_flag(VERIFY_OUTPUTS_VAR, value)?;
        }
        Ok(config)
    }

    /// Like [`IrConfig::from_lookup`], but an unparsable value only resets its
    /// own key to the default, with a warning.
    pub fn from_lookup_or_default(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = lookup(ARITY_CHECK_VAR) {
            match parse_arity(value) {
                Ok(arity_check) => config.arity_check = arity_check,
                Err(err) => log::warn!("{err}; keeping {:?}", config.arity_check),
            }
        }
        if let Some(value) = lookup(VERIFY_OUTPUTS_VAR) {
            match parse_flag(VERIFY_OUTPUTS_VAR, value) {
                Ok(verify_outputs) => config.verify_outputs = verify_outputs,
                Err(err) => log::warn!("{err}; keeping {}", config.verify_outputs),
            }
        }
        config
    }
}

fn parse_arity(value: String) -> Result<ArityCheck> {
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(ArityCheck::Strict),
        "lenient" => Ok(ArityCheck::Lenient),
        _ => Err(IrError::InvalidConfig {
            key: ARITY_CHECK_VAR,
            value,
        }),
    }
}

fn parse_flag(key: &'static str, value: String) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(IrError::InvalidConfig { key, value }),
    }
}

static GLOBAL: Lazy<IrConfig> = Lazy::new(|| {
    let config = IrConfig::from_lookup_or_default(|key| std::env::var(key).ok());
    log::debug!("tensor-ir configuration: {config:?}");
    config
});

/// The configuration used by the constructors that do not take an explicit policy.
pub fn global() -> &'static IrConfig {
    &GLOBAL
}
