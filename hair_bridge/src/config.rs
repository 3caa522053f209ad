/// Plugin configuration and fixed limits

use std::path::PathBuf;

/// Maximum number of lights forwarded to the hair pixel shader
pub const MAX_LIGHTS: usize = 8;

/// Number of spherical-harmonics vectors (Ar, Ag, Ab, Br, Bg, Bb, C)
pub const SH_COEFFICIENT_COUNT: usize = 7;

/// Number of shader-resource slots the SDK fills for one instance
pub const SHADER_RESOURCE_COUNT: usize = 3;

/// Render event id that triggers a flush unless configured otherwise
pub const DEFAULT_FLUSH_EVENT_ID: i32 = 0;

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Directory containing the SDK library (None: next to this module)
    pub sdk_library_dir: Option<PathBuf>,
    /// Render event id that triggers `flush`
    pub flush_event_id: i32,
    /// Create the initial depth-stencil state with reversed-Z (GREATER) comparison
    pub reversed_z: bool,
    /// Issue the SDK debug visualization call after each normal-pass render
    pub render_visualization: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            sdk_library_dir: None,
            flush_event_id: DEFAULT_FLUSH_EVENT_ID,
            reversed_z: false,
            render_visualization: true,
        }
    }
}

impl BridgeConfig {
    pub fn with_sdk_library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sdk_library_dir = Some(dir.into());
        self
    }

    pub fn with_flush_event_id(mut self, event_id: i32) -> Self {
        self.flush_event_id = event_id;
        self
    }

    pub fn with_reversed_z(mut self, reversed_z: bool) -> Self {
        self.reversed_z = reversed_z;
        self
    }

    pub fn with_render_visualization(mut self, enabled: bool) -> Self {
        self.render_visualization = enabled;
        self
    }
}
