//! Block Registry - label-addressed collection of live blocks
//!
//! The registry lets a caller hold many blocks and reach each one by label to
//! configure it, introspect it, or move values in and out of it. It supports:
//! - Registration and removal by label
//! - Routing `set`/`get`/`read`/`write`/`reset` to a labeled block
//! - Listing sources and sinks by capability
//!
//! It never runs blocks on its own.

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::attributes::{Introspection, Keys};
use super::block::{Block, BlockError};
use super::options::Options;
use super::value::Value;

type SharedBlock = Arc<Mutex<Box<dyn Block>>>;

/// Registry of blocks keyed by label
///
/// The map sits behind an `RwLock`; each block has its own `Mutex`, so calls
/// on different blocks do not contend and each block sees one caller at a
/// time.
#[derive(Clone, Default)]
pub struct BlockRegistry {
    blocks: Arc<RwLock<BTreeMap<String, SharedBlock>>>,
}

impl BlockRegistry {
    /// Create a new empty block registry
    ///
    /// # Example
    /// ```
    /// use ctrl_block::core::registry::BlockRegistry;
    ///
    /// let registry = BlockRegistry::new();
    /// assert_eq!(registry.count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block under `label`
    ///
    /// # Returns
    /// * `Ok(())` if registration succeeds
    /// * `Err(RegistryError::DuplicateBlock)` if the label is taken
    pub fn register(
        &self,
        label: impl Into<String>,
        block: Box<dyn Block>,
    ) -> Result<(), RegistryError> {
        let label = label.into();
        let mut blocks = self.blocks.write();

        if blocks.contains_key(&label) {
            return Err(RegistryError::DuplicateBlock(label));
        }

        tracing::info!(label = %label, kind = block.kind(), capability = %block.capability(), "registered block");
        blocks.insert(label, Arc::new(Mutex::new(block)));
        Ok(())
    }

    /// Remove the block registered under `label`
    pub fn unregister(&self, label: &str) -> Result<(), RegistryError> {
        let mut blocks = self.blocks.write();

        blocks
            .remove(label)
            .ok_or_else(|| RegistryError::BlockNotFound(label.to_string()))?;

        tracing::info!(label, "unregistered block");
        Ok(())
    }

    /// Check if a block with the given label exists
    pub fn contains(&self, label: &str) -> bool {
        self.blocks.read().contains_key(label)
    }

    /// Registered labels in sorted order
    pub fn labels(&self) -> Vec<String> {
        self.blocks.read().keys().cloned().collect()
    }

    /// Get the number of registered blocks
    pub fn count(&self) -> usize {
        self.blocks.read().len()
    }

    /// Remove every block
    pub fn clear(&self) {
        self.blocks.write().clear();
    }

    /// Run `f` with exclusive access to the labeled block
    pub fn with_block<R>(
        &self,
        label: &str,
        f: impl FnOnce(&mut dyn Block) -> R,
    ) -> Result<R, RegistryError> {
        let block = self.lookup(label)?;
        let mut guard = block.lock();
        Ok(f(&mut **guard))
    }

    /// Apply runtime options to a block
    pub fn set(&self, label: &str, options: Options) -> Result<(), RegistryError> {
        Ok(self.with_block(label, |block| block.set(options))??)
    }

    /// Introspect a block
    pub fn get(
        &self,
        label: &str,
        keys: &Keys,
        exclude: &[&str],
    ) -> Result<Introspection, RegistryError> {
        Ok(self.with_block(label, |block| block.get(keys, exclude))??)
    }

    /// Read from a source block
    pub fn read(&self, label: &str) -> Result<Vec<f64>, RegistryError> {
        Ok(self.with_block(label, |block| block.read())??)
    }

    /// Write to a sink block
    pub fn write(&self, label: &str, values: &[Value]) -> Result<(), RegistryError> {
        Ok(self.with_block(label, |block| block.write(values))??)
    }

    /// Reset a block
    pub fn reset(&self, label: &str) -> Result<(), RegistryError> {
        self.with_block(label, |block| block.reset())
    }

    /// Labels of blocks that support `read`
    pub fn sources(&self) -> Vec<String> {
        self.filter_labels(|block| block.capability().is_readable())
    }

    /// Labels of blocks that support `write`
    pub fn sinks(&self) -> Vec<String> {
        self.filter_labels(|block| block.capability().is_writable())
    }

    // The map lock is released before any block is locked; `with_block` holds a
    // block lock while its closure may take the map lock.
    fn filter_labels(&self, keep: impl Fn(&dyn Block) -> bool) -> Vec<String> {
        let snapshot: Vec<(String, SharedBlock)> = self
            .blocks
            .read()
            .iter()
            .map(|(label, block)| (label.clone(), Arc::clone(block)))
            .collect();

        snapshot
            .into_iter()
            .filter(|(_, block)| keep(&**block.lock()))
            .map(|(label, _)| label)
            .collect()
    }

    fn lookup(&self, label: &str) -> Result<SharedBlock, RegistryError> {
        self.blocks
            .read()
            .get(label)
            .cloned()
            .ok_or_else(|| RegistryError::BlockNotFound(label.to_string()))
    }
}

/// Registry errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Block not found
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// Label already registered
    #[error("Duplicate block label: {0}")]
    DuplicateBlock(String),

    /// The block itself rejected the call
    #[error(transparent)]
    Block(#[from] BlockError),
}
