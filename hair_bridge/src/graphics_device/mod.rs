/// Graphics device module - the host graphics API seen through one trait

pub mod graphics_device;
pub mod types;

pub use graphics_device::*;
pub use types::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
