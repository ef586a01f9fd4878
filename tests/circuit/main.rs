//! Integration tests for Layer 1: Circuit
//!
//! Tests for the reference simulation: scope hierarchy, signal updates,
//! and event delivery.

mod hierarchy;
