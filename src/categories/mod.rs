//! Concrete blocks and capability classification
//!
//! A block's role is decided by which capabilities it provides: sources
//! implement [`Readable`](crate::core::block::Readable), sinks implement
//! [`Writable`](crate::core::block::Writable).

pub mod sink;
pub mod source;

pub use sink::{Printer, PrinterConfig, PrinterFormat};
pub use source::BufferBlock;

/// Capability set of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Neither readable nor writable
    Neither,
    /// Readable only
    Source,
    /// Writable only
    Sink,
    /// Readable and writable
    Both,
}

impl Capability {
    pub fn from_flags(readable: bool, writable: bool) -> Self {
        match (readable, writable) {
            (false, false) => Capability::Neither,
            (true, false) => Capability::Source,
            (false, true) => Capability::Sink,
            (true, true) => Capability::Both,
        }
    }

    pub fn is_readable(self) -> bool {
        matches!(self, Capability::Source | Capability::Both)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, Capability::Sink | Capability::Both)
    }

    /// Get a human-readable name for the capability
    pub fn display_name(&self) -> &str {
        match self {
            Capability::Neither => "Neither",
            Capability::Source => "Source",
            Capability::Sink => "Sink",
            Capability::Both => "Source/Sink",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
