//! Engine tests
//!
//! Simulator-driven tests for the full keydown path: mount and unmount
//! lifecycle, binding batches, the ignore predicate, and end-to-end
//! dispatch through an event bus.
