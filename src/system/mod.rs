pub mod adapters;
pub mod traits;

// Mock implementations for testing
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

pub use adapters::*;
pub use traits::*;

#[cfg(any(test, feature = "test-mocks"))]
pub use mocks::*;
