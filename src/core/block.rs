//! Block trait and related types
//!
//! This module defines the [`Block`] trait every block implements, the
//! [`Readable`]/[`Writable`] capability traits, the instantiable base block
//! [`BlockBase`], and the error type shared by the whole crate.

use std::fmt;

use crate::categories::Capability;

use super::attributes::{introspect, Attributes, Introspection, Keys};
use super::options::{Args, Options};
use super::value::Value;

/// Option key for the enable flag
pub const ENABLED: &str = "enabled";
/// Pseudo-option accepted by [`Block::set`] that triggers [`Block::reset`]
pub const RESET: &str = "reset";

/// Core block trait
///
/// Implementors provide their field registry ([`Block::attributes`]), the
/// options they understand ([`Block::apply`]) and, optionally, the read and
/// write capabilities. The generic `get`/`set`/`read`/`write` protocol is
/// provided on top of those hooks.
pub trait Block: Send + Sync {
    /// Short type name used in logs
    fn kind(&self) -> &'static str;

    /// Current enable state
    fn is_enabled(&self) -> bool;

    /// Set the enable state unconditionally
    fn set_enabled(&mut self, enabled: bool);

    /// Restore internal state. No-op unless the block accumulates something.
    fn reset(&mut self) {}

    /// Every introspectable field of the block, keyed by field name
    fn attributes(&self) -> Attributes;

    /// Field names that are never exposed through [`Block::get`]
    fn hidden(&self) -> &'static [&'static str] {
        &[]
    }

    /// Consume the options this block type owns and return the rest
    ///
    /// `enabled` and `reset` are taken out by [`Block::set`] before this is
    /// called. On error nothing may have been assigned.
    fn apply(&mut self, options: Options) -> Result<Options, BlockError> {
        Ok(options)
    }

    /// Source capability, if any
    fn as_readable(&self) -> Option<&dyn Readable> {
        None
    }

    /// Sink capability, if any
    fn as_writable(&self) -> Option<&dyn Writable> {
        None
    }

    /// Mutable access to the sink capability
    fn as_writable_mut(&mut self) -> Option<&mut dyn Writable> {
        None
    }

    /// Which of read/write this block supports
    fn capability(&self) -> Capability {
        Capability::from_flags(self.as_readable().is_some(), self.as_writable().is_some())
    }

    /// Reconfigure the block at runtime
    ///
    /// `reset` and `enabled` are validated before anything changes. Own
    /// options are applied first, then `reset` (if truthy), then `enabled`.
    /// Leftover options fail with [`BlockError::Config`] after the earlier
    /// steps have taken effect; any other error leaves the block untouched.
    fn set(&mut self, mut options: Options) -> Result<(), BlockError> {
        tracing::debug!(kind = self.kind(), options = %options, "set");

        let reset = options.take(RESET).is_some_and(|value| value.is_truthy());
        let enabled = options.take_bool(ENABLED)?;

        let rest = self.apply(options)?;

        if reset {
            self.reset();
        }
        if let Some(enabled) = enabled {
            self.set_enabled(enabled);
        }

        rest.ensure_settled()
    }

    /// Introspect the block's attributes
    ///
    /// The block's [`hidden`](Block::hidden) names are added to `exclude`.
    fn get(&self, keys: &Keys, exclude: &[&str]) -> Result<Introspection, BlockError> {
        let mut excluded: Vec<&str> = exclude.to_vec();
        excluded.extend_from_slice(self.hidden());
        introspect(self.attributes(), keys, &excluded)
    }

    /// All visible attributes
    fn get_all(&self) -> Attributes {
        let mut attributes = self.attributes();
        for name in self.hidden() {
            attributes.remove(*name);
        }
        attributes
    }

    /// A single visible attribute
    fn get_value(&self, key: &str) -> Result<Value, BlockError> {
        match self.get(&Keys::one(key), &[])? {
            Introspection::Value(value) => Ok(value),
            Introspection::Map(_) => Err(BlockError::KeyNotFound(key.to_string())),
        }
    }

    /// Read the block's current output
    fn read(&self) -> Result<Vec<f64>, BlockError> {
        match self.as_readable() {
            Some(source) => source.output(),
            None => Err(BlockError::Unsupported(Operation::Read)),
        }
    }

    /// Feed values into the block
    fn write(&mut self, values: &[Value]) -> Result<(), BlockError> {
        match self.as_writable_mut() {
            Some(sink) => sink.consume(values),
            None => Err(BlockError::Unsupported(Operation::Write)),
        }
    }
}

/// Blocks that produce values
pub trait Readable {
    /// Current output of the source
    fn output(&self) -> Result<Vec<f64>, BlockError>;
}

/// Blocks that consume values
pub trait Writable {
    /// Take one batch of input values
    fn consume(&mut self, values: &[Value]) -> Result<(), BlockError>;
}

/// The two capability operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => f.write_str("read"),
            Operation::Write => f.write_str("write"),
        }
    }
}

/// Construction options understood by every block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockConfig {
    pub enabled: bool,
}

impl BlockConfig {
    /// Take `enabled` from `options`, returning what is left
    pub fn apply(&mut self, mut options: Options) -> Result<Options, BlockError> {
        if let Some(enabled) = options.take_bool(ENABLED)? {
            self.enabled = enabled;
        }
        Ok(options)
    }

    /// Build from constructor arguments, rejecting anything unclaimed
    pub fn from_args(args: Args) -> Result<Self, BlockError> {
        let Args { positional, named } = args;
        let mut config = Self::default();
        let rest = config.apply(named)?;
        Args {
            positional,
            named: rest,
        }
        .finish()?;
        Ok(config)
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// The plain block: enable state only, neither readable nor writable
///
/// Other blocks embed a `BlockBase` for their enable state.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockBase {
    enabled: bool,
}

impl BlockBase {
    pub fn new() -> Self {
        Self::with_config(BlockConfig::default())
    }

    pub fn with_config(config: BlockConfig) -> Self {
        Self {
            enabled: config.enabled,
        }
    }

    /// Construct from positional and named arguments
    ///
    /// # Example
    /// ```
    /// use ctrl_block::core::block::{Block, BlockBase};
    /// use ctrl_block::core::options::Args;
    ///
    /// let block = BlockBase::from_args(Args::new().opt("enabled", false)).unwrap();
    /// assert!(!block.is_enabled());
    ///
    /// assert!(BlockBase::from_args(Args::new().opt("gain", 2.0)).is_err());
    /// ```
    pub fn from_args(args: Args) -> Result<Self, BlockError> {
        let block = Self::with_config(BlockConfig::from_args(args)?);
        tracing::debug!(kind = "Block", enabled = block.enabled, "constructed");
        Ok(block)
    }

    pub fn from_options(options: Options) -> Result<Self, BlockError> {
        Self::from_args(options.into())
    }

    /// Construct from a JSON object of options
    pub fn from_json(text: &str) -> Result<Self, BlockError> {
        Self::from_options(Options::from_json(text)?)
    }

    /// The base block's own field registry
    pub fn attributes(&self) -> Attributes {
        Attributes::from([(ENABLED.to_string(), Value::Boolean(self.enabled))])
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Default for BlockBase {
    fn default() -> Self {
        Self::new()
    }
}

impl Block for BlockBase {
    fn kind(&self) -> &'static str {
        "Block"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn attributes(&self) -> Attributes {
        BlockBase::attributes(self)
    }
}

/// Block errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BlockError {
    /// Unknown or unconsumed configuration
    #[error("{0}")]
    Config(String),

    /// Introspection key absent or suppressed
    #[error("Key not found: '{0}'")]
    KeyNotFound(String),

    /// read/write on a block without that capability
    #[error("This block does not support {0}")]
    Unsupported(Operation),

    /// Option or input of the wrong type
    #[error("Invalid value for '{key}': expected {expected}, got {found}")]
    InvalidValue {
        key: String,
        expected: &'static str,
        found: String,
    },

    /// Output stream failure
    #[error("IO error: {0}")]
    Io(String),
}

impl BlockError {
    pub(crate) fn unknown_parameters(names: &[String]) -> Self {
        BlockError::Config(format!("Unknown parameter(s) '{}'", names.join(", ")))
    }

    pub(crate) fn invalid_value(key: &str, expected: &'static str, found: &Value) -> Self {
        BlockError::InvalidValue {
            key: key.to_string(),
            expected,
            found: found.type_name().to_string(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, BlockError::Config(_))
    }

    pub fn is_key_not_found(&self) -> bool {
        matches!(self, BlockError::KeyNotFound(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, BlockError::Unsupported(_))
    }
}

impl From<std::io::Error> for BlockError {
    fn from(error: std::io::Error) -> Self {
        BlockError::Io(error.to_string())
    }
}
