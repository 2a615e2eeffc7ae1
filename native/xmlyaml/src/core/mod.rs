//! Core parsing primitives
//!
//! This module contains the building blocks the tree builder is made of:
//! - Scanner: memchr-accelerated markup boundary detection
//! - Tokenizer: splits raw text into tag and data tokens
//! - Matcher: classifies one token and extracts its fields
//! - Attributes: attribute string parsing with uniqueness checks
//! - Declaration: the `<?xml ...?>` gate

pub mod attributes;
pub mod declaration;
pub mod matcher;
pub mod scanner;
pub mod tokenizer;
