//! Control blocks - enable state, attribute introspection and read/write capabilities
//!
//! A block is the unit of configuration in a control loop. Every block can be
//! enabled or disabled, reconfigured through keyword options, and introspected
//! as a name → value mapping. Blocks that produce values are sources
//! ([`Readable`](core::Readable)), blocks that consume values are sinks
//! ([`Writable`](core::Writable)).

pub mod core;
pub mod categories;
mod tests;

// Re-export commonly used types
pub use core::{Args, Block, BlockBase, BlockError, BlockRegistry, Keys, Options, Value};
pub use categories::{BufferBlock, Capability, Printer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
