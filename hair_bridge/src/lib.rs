/*!
# Hair Bridge

Core of a native hair-rendering plugin embedded in a host engine.

The host drives the plugin from two threads: a producer thread (scripting,
simulation) that loads resources and records per-frame work, and the render
thread that executes the recorded work once per frame. This crate provides
the platform-agnostic part of that plugin, written against two traits so the
graphics API and the hair SDK can be swapped (or mocked):

## Architecture

- **GraphicsDevice**: the host graphics device and its immediate context
- **HairSdk**: one capability interface over the hair SDK generations
- **ResourceManager**: refcounted handle tables for shaders, assets and instances
- **CommandQueue**: deferred commands drained in FIFO order by `Context::flush`
- **ViewCache**: views of host textures, memoized by native identity
- **Context**: lifecycle, immediate and deferred operations, hot-reload migration
- **Bridge**: the boundary object handed to the host

Backend adapters for the SDK live in the `hair_bridge_sdk` crate.
*/

// Internal modules
mod error;
mod handle;
mod config;
mod constants;
mod view_cache;
mod render_state;
mod context;
mod bridge;
pub mod log;
pub mod graphics_device;
pub mod sdk;
pub mod resource;
pub mod command;

// Main hairbridge namespace module
pub mod hairbridge {
    // Error types
    pub use crate::error::{Error, Result};

    // Handles
    pub use crate::handle::{AssetHandle, InstanceHandle, ShaderHandle, NULL_HANDLE};

    // Configuration and shared limits
    pub use crate::config::{
        BridgeConfig, DEFAULT_FLUSH_EVENT_ID, MAX_LIGHTS, SHADER_RESOURCE_COUNT,
        SH_COEFFICIENT_COUNT,
    };

    // Pixel-shader inputs
    pub use crate::constants::{HairConstants, LightData, LightType};

    // Context and boundary object
    pub use crate::context::{Context, ContextStatus};
    pub use crate::bridge::{Bridge, DeviceEvent};

    // Render-thread caches
    pub use crate::view_cache::ViewCache;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{
            set_log_callback, set_logger, reset_logger, CallbackLogger, DefaultLogger,
            LogCallback, LogEntry, LogSeverity, Logger,
        };
        // Note: hw_* macros are NOT re-exported here - they are internal only
    }

    // Graphics device sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Hair SDK sub-module
    pub mod sdk {
        pub use crate::sdk::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Command sub-module
    pub mod command {
        pub use crate::command::*;
    }
}

// Re-export the capability traits at crate root for backend crates
pub use graphics_device::GraphicsDevice;
pub use sdk::HairSdk;

// Re-export math library at crate root
pub use glam;
