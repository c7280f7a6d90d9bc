//! Filesystem module tests.

mod memory_tests;
