//! Validation utilities for cell content and positions
//!
//! This module contains pure validation and text-splitting functions with no
//! I/O dependencies.

pub mod domain;
pub mod parsing;
pub mod permutation;

pub use domain::{validate_domain, validate_range, validate_step};
pub use parsing::{parse_schema, split_record_text};
pub use permutation::validate_permutation;
