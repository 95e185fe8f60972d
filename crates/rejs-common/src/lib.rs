//! Common types and utilities for the rejs deobfuscator.
//!
//! This crate provides foundational types used across all rejs crates:
//! - Recursion and iteration limits
//! - Line/column mapping for source offsets
//! - `Number.prototype.toString` compatible number formatting

// Centralized limits and thresholds
pub mod limits;

// Line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// JavaScript number formatting
pub mod number;
pub use number::format_js_number;
