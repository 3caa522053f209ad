/// Hair SDK module - capability trait and value types

pub mod hair_sdk;
pub mod types;

pub use hair_sdk::*;
pub use types::*;

// Mock SDK for tests (no SDK library required)
#[cfg(test)]
pub mod mock_hair_sdk;

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
