/*!
# Hair Bridge - SDK Adapters

Adapters from the hair SDK generations to the `hair_bridge::HairSdk` trait.

- **Legacy**: C-style calls returning a `ReturnCode`, integer asset and
  instance ids, results through out-parameters
- **Object**: calls returning a `Status`, hair instances exposed as objects

The generation used by a build is chosen with the `object-api` feature and
exposed as `SelectedAdapter`. Context code never sees which one it got.

```no_run
use std::sync::Arc;
use hair_bridge::hairbridge::{Bridge, BridgeConfig};
use hair_bridge_sdk::{LegacyRawSdk, LegacySdkAdapter};

fn bridge<R: LegacyRawSdk + 'static>(raw: R) -> Bridge {
    Bridge::new(Arc::new(LegacySdkAdapter::with_sdk(raw)), BridgeConfig::default())
}
```
*/

mod legacy;
mod object;
mod stats;

pub use legacy::{
    LegacyConversionSettings, LegacyLoader, LegacyRawSdk, LegacySdkAdapter, LegacyShaderSettings,
    ReturnCode, BONE_NAME_CAPACITY, LEGACY_SDK_VERSION,
};
pub use object::{
    ContextHandle, DeviceHandle, HairInstanceObject, ObjectLoader, ObjectRawSdk, ObjectSdkAdapter,
    SdkResult, Status, OBJECT_SDK_VERSION,
};

// Re-export call statistics
pub use stats::{get_call_stats, print_call_stats_report, reset_call_stats, CallStats, Generation};

/// Adapter of the generation selected at build time
#[cfg(feature = "object-api")]
pub type SelectedAdapter<R> = ObjectSdkAdapter<R>;

/// Adapter of the generation selected at build time
#[cfg(not(feature = "object-api"))]
pub type SelectedAdapter<R> = LegacySdkAdapter<R>;

/// Generation of `SelectedAdapter`
#[cfg(feature = "object-api")]
pub const SELECTED_GENERATION: Generation = Generation::Object;

/// Generation of `SelectedAdapter`
#[cfg(not(feature = "object-api"))]
pub const SELECTED_GENERATION: Generation = Generation::Legacy;
