//! # Application Layer
//!
//! Ports (traits) implemented by connectors, and the use cases that drive a
//! conversation through them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
