//! Buffer Block
//!
//! A source whose output is a private buffer of values. The buffer is replaced
//! wholesale by the code that owns the block, cleared by `reset`, and never
//! exposed through generic introspection.

use crate::core::attributes::Attributes;
use crate::core::block::{Block, BlockBase, BlockConfig, BlockError, Readable};
use crate::core::options::{Args, Options};
use crate::core::value::Value;

pub const BUFFER: &str = "buffer";

/// Source block backed by a private buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferBlock {
    base: BlockBase,
    buffer: Vec<f64>,
}

impl BufferBlock {
    pub fn new() -> Self {
        Self::with_config(BlockConfig::default())
    }

    pub fn with_config(config: BlockConfig) -> Self {
        Self {
            base: BlockBase::with_config(config),
            buffer: Vec::new(),
        }
    }

    /// Construct from positional and named arguments
    ///
    /// Only `enabled` is accepted; the buffer cannot be configured.
    pub fn from_args(args: Args) -> Result<Self, BlockError> {
        let block = Self::with_config(BlockConfig::from_args(args)?);
        tracing::debug!(kind = "BufferBlock", enabled = block.base.is_enabled(), "constructed");
        Ok(block)
    }

    pub fn from_options(options: Options) -> Result<Self, BlockError> {
        Self::from_args(options.into())
    }

    pub fn from_json(text: &str) -> Result<Self, BlockError> {
        Self::from_options(Options::from_json(text)?)
    }

    /// Current buffer contents
    pub fn buffer(&self) -> &[f64] {
        &self.buffer
    }

    /// Replace the buffer, returning the previous contents
    pub fn replace_buffer(&mut self, values: impl Into<Vec<f64>>) -> Vec<f64> {
        std::mem::replace(&mut self.buffer, values.into())
    }
}

impl Readable for BufferBlock {
    fn output(&self) -> Result<Vec<f64>, BlockError> {
        Ok(self.buffer.clone())
    }
}

impl Block for BufferBlock {
    fn kind(&self) -> &'static str {
        "BufferBlock"
    }

    fn is_enabled(&self) -> bool {
        self.base.is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base.set_enabled(enabled);
    }

    fn reset(&mut self) {
        tracing::trace!(len = self.buffer.len(), "clearing buffer");
        self.buffer.clear();
    }

    fn attributes(&self) -> Attributes {
        let mut attributes = self.base.attributes();
        attributes.insert(BUFFER.into(), Value::from(self.buffer.as_slice()));
        attributes
    }

    fn hidden(&self) -> &'static [&'static str] {
        &[BUFFER]
    }

    fn as_readable(&self) -> Option<&dyn Readable> {
        Some(self)
    }
}
