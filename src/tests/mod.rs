//! Test suite for the block system
//!
//! This module organizes tests into logical groups to help understand
//! different aspects of the block system.

#[cfg(test)]
mod core_tests;
