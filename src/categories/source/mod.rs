//! Source block implementations
//!
//! Sources produce values through `read`.

pub mod buffer;

pub use buffer::BufferBlock;
