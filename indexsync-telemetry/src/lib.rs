//! Tracing initialization for index synchronizer binaries and tests.

pub mod tracing;
