//! Core module tests
//!
//! Contains test suites for the engine's pure logic:
//! - Key table and classification tests
//! - Spec parser tests
//! - Binding store tests
//! - Dispatch resolution tests

#[cfg(test)]
mod dispatch_tests;
