//! Resolution use cases.
//!
//! Services orchestrate store reads, credential strategy selection and SDK
//! configuration loading. They depend on the ports in this crate, never on
//! concrete infrastructure.

mod assembler;
pub mod engine;
mod strategy;

pub use engine::ResolutionEngine;
