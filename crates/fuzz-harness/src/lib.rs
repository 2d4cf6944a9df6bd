//! Constellation Fuzz Harness
//!
//! Shared proptest strategies for the constellation crates. Strategies yield
//! plain numbers (kilometres, radians, degrees, metres, seconds) so that any
//! crate can depend on the harness without a dependency cycle.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_harness::prelude::*;
//!
//! proptest! {
//!     #![proptest_config(quick(64))]
//!     #[test]
//!     fn stays_in_leo(alt in altitude_km()) {
//!         prop_assert!(alt < 2_000.0);
//!     }
//! }
//! ```

pub mod generators;

use proptest::test_runner::Config;

/// Runner configuration with a fixed case count and no failure persistence
pub fn quick(cases: u32) -> Config {
    Config {
        cases,
        failure_persistence: None,
        ..Config::default()
    }
}

pub mod prelude {
    pub use crate::generators::*;
    pub use crate::quick;
    pub use proptest::prelude::*;
}

pub use proptest;
