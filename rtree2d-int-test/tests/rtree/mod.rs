//! R-Tree integration test module.
//!
//! These tests drive whole workloads through the public API and compare the
//! tree against a brute-force index.

mod delete_test;
mod nearest_test;
mod search_test;
