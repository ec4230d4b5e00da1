//! Configuration module for an evaluation run.
//!
//! - `core`: the configuration structures and their validation
//! - `enums`: enumeration types used in configurations

pub mod core;
pub mod enums;

pub use self::core::{ClassConfig, EvaluationConfig, MaterialConfig, OptionsConfig};

pub use self::enums::{MatchValue, TestIgnoreMode};
