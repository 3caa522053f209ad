/// Boundary object handed to the embedding host.
///
/// The bridge owns the SDK adapter, the graphics device registered by the
/// host, the plugin context and the host log callback. It translates host
/// callbacks (plugin load, device events, render events) into context calls
/// and creates the context lazily on first access.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock, RwLockReadGuard};

use crate::config::BridgeConfig;
use crate::context::Context;
use crate::graphics_device::GraphicsDevice;
use crate::log::{self, LogCallback};
use crate::sdk::HairSdk;
use crate::{hw_debug, hw_error, hw_info};

const SOURCE: &str = "hairbridge::Bridge";

/// Graphics device notifications forwarded by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceEvent {
    Initialize,
    Shutdown,
    BeforeReset,
    AfterReset,
}

pub struct Bridge {
    sdk: Option<Arc<dyn HairSdk>>,
    config: BridgeConfig,
    device: RwLock<Option<Arc<dyn GraphicsDevice>>>,
    context: RwLock<Context>,
    log_callback: Mutex<Option<LogCallback>>,
}

impl Bridge {
    pub fn new(sdk: Arc<dyn HairSdk>, config: BridgeConfig) -> Self {
        Self {
            sdk: Some(sdk),
            context: RwLock::new(Context::new(config.clone())),
            config,
            device: RwLock::new(None),
            log_callback: Mutex::new(None),
        }
    }

    // ===== HOST CALLBACKS =====

    /// Register the host log sink (`None` restores the default logger)
    pub fn set_log_callback(&self, callback: Option<LogCallback>) {
        *self.log_callback.lock() = callback.clone();
        log::set_log_callback(callback);
    }

    /// Host plugin-load notification carrying the graphics device
    pub fn on_plugin_load(&self, device: Arc<dyn GraphicsDevice>) {
        *self.device.write() = Some(device);
        hw_info!(SOURCE, "graphics device registered");
    }

    /// Device lifecycle notification (logged only)
    pub fn on_graphics_device_event(&self, event: DeviceEvent) {
        hw_info!(SOURCE, "graphics device event: {:?}", event);
    }

    /// Per-frame render event; the configured flush id drains the command queue
    pub fn on_render_event(&self, event_id: i32) {
        if event_id != self.config.flush_event_id {
            hw_debug!(SOURCE, "render event {} ignored", event_id);
            return;
        }
        if let Some(context) = self.context() {
            context.flush();
        }
    }

    pub fn flush_event_id(&self) -> i32 {
        self.config.flush_event_id
    }

    /// Version of the owned SDK, 0 once it moved to another bridge
    pub fn sdk_version(&self) -> u32 {
        self.sdk.as_ref().map_or(0, |sdk| sdk.version())
    }

    // ===== SDK =====

    pub fn load_sdk(&self) -> bool {
        let Some(sdk) = &self.sdk else {
            hw_error!(SOURCE, "LoadHairSDK() failed: SDK moved to a migrated bridge");
            return false;
        };
        if sdk.is_loaded() {
            return true;
        }
        match sdk.load(self.config.sdk_library_dir.as_deref()) {
            Ok(()) => {
                hw_info!(SOURCE, "LoadHairSDK() succeeded");
                true
            }
            Err(e) => {
                hw_error!(SOURCE, "LoadHairSDK() failed: {}", e);
                false
            }
        }
    }

    /// Finalize the context, then unload the SDK
    ///
    /// A bridge whose SDK was taken by `migrate_from` leaves it untouched.
    pub fn unload_sdk(&self) {
        self.finalize();
        let Some(sdk) = &self.sdk else {
            hw_debug!(SOURCE, "UnloadHairSDK() skipped: SDK moved to a migrated bridge");
            return;
        };
        if sdk.is_loaded() {
            sdk.unload();
            hw_info!(SOURCE, "UnloadHairSDK()");
        }
    }

    // ===== CONTEXT =====

    /// Initialize the context if needed
    pub fn initialize(&self) -> bool {
        self.context().is_some()
    }

    pub fn finalize(&self) {
        self.context.write().finalize();
    }

    /// Initialized context, creating it on first access
    ///
    /// Returns None when no device is registered or initialization fails.
    pub fn context(&self) -> Option<RwLockReadGuard<'_, Context>> {
        {
            let context = self.context.read();
            if context.is_initialized() {
                return Some(context);
            }
        }

        {
            let mut context = self.context.write();
            if !context.is_initialized() {
                let Some(sdk) = self.sdk.clone() else {
                    hw_error!(SOURCE, "context initialization failed: SDK moved to a migrated bridge");
                    return None;
                };
                let Some(device) = self.device.read().clone() else {
                    hw_error!(SOURCE, "context initialization failed: no graphics device");
                    return None;
                };
                if context.initialize(sdk, device).is_err() {
                    return None;
                }
            }
        }

        let context = self.context.read();
        context.is_initialized().then_some(context)
    }

    // ===== HOT RELOAD =====

    /// Take over the SDK, device, context and log callback of a previously
    /// loaded bridge; `source` is left empty and its teardown does nothing
    pub fn migrate_from(source: &mut Bridge) -> Bridge {
        let device = source.device.get_mut().take();
        let context = Context::migrate_from(source.context.get_mut());
        let callback = source.log_callback.get_mut().take();

        let bridge = Bridge {
            sdk: source.sdk.take(),
            config: source.config.clone(),
            device: RwLock::new(device),
            context: RwLock::new(context),
            log_callback: Mutex::new(None),
        };
        if callback.is_some() {
            bridge.set_log_callback(callback);
        }
        hw_info!(SOURCE, "bridge migrated");
        bridge
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
