//! Core types for Bramble.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod language;
pub mod money;

pub use id::*;
pub use language::{LanguageCode, LanguageCodeError};
pub use money::{floor_percentage, to_minor_units};
