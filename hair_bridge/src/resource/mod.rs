//! Resource management module
//!
//! Slot-recycling handle tables for shaders, hair assets and hair instances,
//! plus the manager implementing their reference-counted lifecycle.

mod table;
mod shader;
mod asset;
mod instance;
mod resource_manager;

pub use table::{ResourceTable, Slot};
pub use shader::ShaderResource;
pub use asset::AssetResource;
pub use instance::InstanceResource;
pub use resource_manager::ResourceManager;
