//! Core module - Tree model, traversal and output
//!
//! This module provides:
//! - Entry, context and display-line model
//! - Depth-first tree renderer with per-node failure containment
//! - Output rendering for text/json/jsonl
//! - Terminal styling

pub mod model;
pub mod render;
pub mod style;
pub mod tree;
