//! Core block abstractions and types
//!
//! This module defines the block trait, the values and options blocks are
//! configured with, the attribute introspection protocol, text rendering for
//! sinks, and a registry for holding blocks by label.

pub mod value;
pub mod options;
pub mod attributes;
pub mod block;
pub mod render;
pub mod registry;

pub use attributes::{Attributes, Introspection, Keys};
pub use block::{Block, BlockBase, BlockConfig, BlockError, Operation, Readable, Writable};
pub use options::{Args, Options};
pub use registry::{BlockRegistry, RegistryError};
pub use render::RenderOptions;
pub use value::Value;
