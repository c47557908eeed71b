//! Unit test suite for depsat
//!
//! Library-level tests that exercise the public API against real on-disk
//! fixtures, without spawning the binary.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod evaluation;
mod providers;
