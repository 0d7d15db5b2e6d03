//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the mock hardware.  All tests run on the host with no real
//! GPIO required.

mod controller_tests;
mod decoder_tests;
mod runtime_tests;
