//! Sink block implementations
//!
//! Sinks consume values through `write`.

pub mod printer;

pub use printer::{Printer, PrinterConfig, PrinterFormat};
