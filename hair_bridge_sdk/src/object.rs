/// Object SDK generation adapter
///
/// The object SDK returns a `Status` with every result, takes the device and
/// its context as opaque handle wrappers, and exposes each hair instance as
/// an object with its own methods. The adapter keeps the instance objects in
/// a table and hands out `InstanceId`s in their place.

use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use hair_bridge::hairbridge::device::{NativeDevice, NativeDeviceContext, ShaderResourceView};
use hair_bridge::hairbridge::sdk::{
    AssetId, ConversionSettings, DualQuat, HairSdk, Handedness, InstanceDescriptor, InstanceId,
    ShaderConstants, ShaderResourceSet, ShaderSettings, TextureType,
};
use hair_bridge::hairbridge::{Error, Result};
use hair_bridge::hw_info;

use crate::stats::{record_call, Generation};

const SOURCE: &str = "hairbridge::object";

/// Version reported by the object adapter when the SDK does not say
pub const OBJECT_SDK_VERSION: u32 = 0x0200;

/// Failure status of an object SDK call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Fail,
    InvalidArgument,
    NotInitialized,
    NotFound,
    OutOfMemory,
}

/// Result of an object SDK call
pub type SdkResult<T> = std::result::Result<T, Status>;

/// Device as seen by the object SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub u64);

/// Device context as seen by the object SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(pub u64);

impl From<NativeDevice> for DeviceHandle {
    fn from(device: NativeDevice) -> Self {
        Self(device.raw())
    }
}

impl From<NativeDeviceContext> for ContextHandle {
    fn from(context: NativeDeviceContext) -> Self {
        Self(context.raw())
    }
}

// ===== RAW INTERFACE =====

/// One hair instance owned by the object SDK
pub trait HairInstanceObject: Send + Sync {
    fn descriptor(&self) -> SdkResult<InstanceDescriptor>;
    fn set_descriptor(&mut self, descriptor: &InstanceDescriptor) -> SdkResult<()>;
    fn bounds(&self) -> SdkResult<(Vec3, Vec3)>;
    fn set_texture(&mut self, texture_type: TextureType, view: Option<ShaderResourceView>) -> SdkResult<()>;
    fn texture(&self, texture_type: TextureType) -> SdkResult<Option<ShaderResourceView>>;
    fn update_skinning_matrices(&mut self, matrices: &[Mat4]) -> SdkResult<()>;
    fn update_skinning_dqs(&mut self, dqs: &[DualQuat]) -> SdkResult<()>;
    fn prepare_shader_constants(&self) -> SdkResult<ShaderConstants>;
    fn shader_resources(&self) -> SdkResult<ShaderResourceSet>;
    fn render(&self, settings: ShaderSettings) -> SdkResult<()>;
    fn render_visualization(&self) -> SdkResult<()>;
}

/// The object SDK as exported by its library
///
/// Freeing an instance is dropping its object.
pub trait ObjectRawSdk: Send + Sync {
    type Instance: HairInstanceObject;

    fn version(&self) -> u32 {
        OBJECT_SDK_VERSION
    }

    fn init_render_resources(&self, device: DeviceHandle) -> SdkResult<()>;
    fn set_current_context(&self, context: ContextHandle) -> SdkResult<()>;

    fn load_asset(&self, path: &Path, settings: &ConversionSettings) -> SdkResult<AssetId>;
    fn free_asset(&self, asset: AssetId) -> SdkResult<()>;
    fn bone_count(&self, asset: AssetId) -> SdkResult<u32>;
    fn bone_name(&self, asset: AssetId, bone: u32) -> SdkResult<String>;
    fn bone_indices(&self, asset: AssetId) -> SdkResult<Vec4>;
    fn bone_weights(&self, asset: AssetId) -> SdkResult<Vec4>;
    fn bind_pose(&self, asset: AssetId, bone: u32) -> SdkResult<Mat4>;
    fn default_descriptor(&self, asset: AssetId) -> SdkResult<InstanceDescriptor>;

    fn create_instance(&self, asset: AssetId) -> SdkResult<Self::Instance>;

    fn set_view_projection(&self, view: &Mat4, projection: &Mat4, handedness: Handedness, fov: f32) -> SdkResult<()>;
    fn step_simulation(&self, dt: f32) -> SdkResult<()>;
}

/// Opens the object SDK library found in a directory (None: next to this module)
pub type ObjectLoader<R> = Arc<dyn Fn(Option<&Path>) -> Option<R> + Send + Sync>;

// ===== ADAPTER =====

struct LoadedSdk<R: ObjectRawSdk> {
    raw: R,
    instances: Mutex<FxHashMap<InstanceId, R::Instance>>,
    next_instance: Mutex<u32>,
}

/// `HairSdk` over the object generation
pub struct ObjectSdkAdapter<R: ObjectRawSdk> {
    loader: ObjectLoader<R>,
    sdk: RwLock<Option<LoadedSdk<R>>>,
}

impl<R: ObjectRawSdk> ObjectSdkAdapter<R> {
    pub fn new(loader: ObjectLoader<R>) -> Self {
        Self {
            loader,
            sdk: RwLock::new(None),
        }
    }

    /// Adapter over an already opened SDK
    pub fn with_sdk(raw: R) -> Self {
        Self {
            loader: Arc::new(|_: Option<&Path>| -> Option<R> { None }),
            sdk: RwLock::new(Some(LoadedSdk::new(raw))),
        }
    }

    /// Number of instance objects currently held
    pub fn instance_count(&self) -> usize {
        self.sdk.read().as_ref().map_or(0, |sdk| sdk.instances.lock().len())
    }

    fn translate<T>(name: &str, result: SdkResult<T>) -> Result<T> {
        record_call(Generation::Object, result.is_ok());
        result.map_err(|status| Error::BackendError(format!("{} failed: {:?}", name, status)))
    }

    /// Run one call against the SDK itself
    fn call<T>(&self, name: &str, f: impl FnOnce(&R) -> SdkResult<T>) -> Result<T> {
        let sdk = self.sdk.read();
        let Some(sdk) = sdk.as_ref() else {
            return Err(Error::SdkNotLoaded);
        };
        Self::translate(name, f(&sdk.raw))
    }

    /// Run one call against an instance object
    fn with_instance<T>(
        &self,
        name: &str,
        instance: InstanceId,
        f: impl FnOnce(&mut R::Instance) -> SdkResult<T>,
    ) -> Result<T> {
        let sdk = self.sdk.read();
        let Some(sdk) = sdk.as_ref() else {
            return Err(Error::SdkNotLoaded);
        };
        let mut instances = sdk.instances.lock();
        let Some(object) = instances.get_mut(&instance) else {
            return Err(Error::InvalidResource(format!("{}: no instance {}", name, instance.0)));
        };
        Self::translate(name, f(object))
    }
}

impl<R: ObjectRawSdk> LoadedSdk<R> {
    fn new(raw: R) -> Self {
        Self {
            raw,
            instances: Mutex::new(FxHashMap::default()),
            next_instance: Mutex::new(0),
        }
    }
}

impl<R: ObjectRawSdk> HairSdk for ObjectSdkAdapter<R> {
    fn load(&self, library_dir: Option<&Path>) -> Result<()> {
        let mut sdk = self.sdk.write();
        if sdk.is_some() {
            return Ok(());
        }
        match (self.loader)(library_dir) {
            Some(raw) => {
                hw_info!(SOURCE, "object SDK {:#06x} loaded", raw.version());
                *sdk = Some(LoadedSdk::new(raw));
                Ok(())
            }
            None => Err(Error::InitializationFailed(format!(
                "object SDK library not found in {}",
                library_dir.map_or_else(|| "module directory".to_string(), |d| d.display().to_string())
            ))),
        }
    }

    fn unload(&self) {
        if let Some(sdk) = self.sdk.write().take() {
            let orphans = sdk.instances.lock().len();
            if orphans > 0 {
                hw_info!(SOURCE, "object SDK unloaded with {} live instance(s)", orphans);
            } else {
                hw_info!(SOURCE, "object SDK unloaded");
            }
        }
    }

    fn is_loaded(&self) -> bool {
        self.sdk.read().is_some()
    }

    fn version(&self) -> u32 {
        self.sdk.read().as_ref().map_or(OBJECT_SDK_VERSION, |sdk| sdk.raw.version())
    }

    fn init_render_resources(&self, device: NativeDevice) -> Result<()> {
        self.call("initRenderResources", |sdk| sdk.init_render_resources(device.into()))
    }

    fn set_current_context(&self, context: NativeDeviceContext) -> Result<()> {
        self.call("setCurrentContext", |sdk| sdk.set_current_context(context.into()))
    }

    fn load_asset(&self, path: &Path, settings: &ConversionSettings) -> Result<AssetId> {
        self.call("loadAsset", |sdk| sdk.load_asset(path, settings))
    }

    fn free_asset(&self, asset: AssetId) -> Result<()> {
        self.call("freeAsset", |sdk| sdk.free_asset(asset))
    }

    fn bone_count(&self, asset: AssetId) -> Result<u32> {
        self.call("getNumBones", |sdk| sdk.bone_count(asset))
    }

    fn bone_name(&self, asset: AssetId, bone: u32) -> Result<String> {
        self.call("getBoneName", |sdk| sdk.bone_name(asset, bone))
    }

    fn bone_indices(&self, asset: AssetId) -> Result<Vec4> {
        self.call("getBoneIndices", |sdk| sdk.bone_indices(asset))
    }

    fn bone_weights(&self, asset: AssetId) -> Result<Vec4> {
        self.call("getBoneWeights", |sdk| sdk.bone_weights(asset))
    }

    fn bind_pose(&self, asset: AssetId, bone: u32) -> Result<Mat4> {
        self.call("getBindPose", |sdk| sdk.bind_pose(asset, bone))
    }

    fn default_descriptor(&self, asset: AssetId) -> Result<InstanceDescriptor> {
        self.call("getInstanceDescriptor", |sdk| sdk.default_descriptor(asset))
    }

    fn create_instance(&self, asset: AssetId) -> Result<InstanceId> {
        let sdk = self.sdk.read();
        let Some(sdk) = sdk.as_ref() else {
            return Err(Error::SdkNotLoaded);
        };
        let object = Self::translate("createInstance", sdk.raw.create_instance(asset))?;

        let mut instances = sdk.instances.lock();
        let id = {
            // Ids wrap; 0 and ids still held are never handed out
            let mut next = sdk.next_instance.lock();
            loop {
                *next = next.wrapping_add(1);
                let id = InstanceId(*next);
                if *next != 0 && !instances.contains_key(&id) {
                    break id;
                }
            }
        };
        instances.insert(id, object);
        Ok(id)
    }

    fn free_instance(&self, instance: InstanceId) -> Result<()> {
        let sdk = self.sdk.read();
        let Some(sdk) = sdk.as_ref() else {
            return Err(Error::SdkNotLoaded);
        };
        let removed = sdk.instances.lock().remove(&instance);
        record_call(Generation::Object, removed.is_some());
        match removed {
            Some(_) => Ok(()),
            None => Err(Error::BackendError(format!("freeInstance failed: no instance {}", instance.0))),
        }
    }

    fn instance_descriptor(&self, instance: InstanceId) -> Result<InstanceDescriptor> {
        self.with_instance("getDescriptor", instance, |object| object.descriptor())
    }

    fn set_instance_descriptor(&self, instance: InstanceId, descriptor: &InstanceDescriptor) -> Result<()> {
        self.with_instance("setDescriptor", instance, |object| object.set_descriptor(descriptor))
    }

    fn instance_bounds(&self, instance: InstanceId) -> Result<(Vec3, Vec3)> {
        self.with_instance("getBounds", instance, |object| object.bounds())
    }

    fn set_texture(&self, instance: InstanceId, texture_type: TextureType, view: Option<ShaderResourceView>) -> Result<()> {
        self.with_instance("setTexture", instance, |object| object.set_texture(texture_type, view))
    }

    fn texture(&self, instance: InstanceId, texture_type: TextureType) -> Result<Option<ShaderResourceView>> {
        self.with_instance("getTexture", instance, |object| object.texture(texture_type))
    }

    fn update_skinning_matrices(&self, instance: InstanceId, matrices: &[Mat4]) -> Result<()> {
        self.with_instance("updateSkinningMatrices", instance, |object| object.update_skinning_matrices(matrices))
    }

    fn update_skinning_dqs(&self, instance: InstanceId, dqs: &[DualQuat]) -> Result<()> {
        self.with_instance("updateSkinningDqs", instance, |object| object.update_skinning_dqs(dqs))
    }

    fn set_view_projection(&self, view: &Mat4, projection: &Mat4, handedness: Handedness, fov: f32) -> Result<()> {
        self.call("setViewProjection", |sdk| sdk.set_view_projection(view, projection, handedness, fov))
    }

    fn prepare_shader_constants(&self, instance: InstanceId) -> Result<ShaderConstants> {
        self.with_instance("prepareShaderConstantBuffer", instance, |object| object.prepare_shader_constants())
    }

    fn shader_resources(&self, instance: InstanceId) -> Result<ShaderResourceSet> {
        self.with_instance("getShaderResources", instance, |object| object.shader_resources())
    }

    fn step_simulation(&self, dt: f32) -> Result<()> {
        self.call("stepSimulation", |sdk| sdk.step_simulation(dt))
    }

    fn render_hairs(&self, instance: InstanceId, settings: ShaderSettings) -> Result<()> {
        self.with_instance("renderHairs", instance, |object| object.render(settings))
    }

    fn render_visualization(&self, instance: InstanceId) -> Result<()> {
        self.with_instance("renderVisualization", instance, |object| object.render_visualization())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "object_tests.rs"]
mod tests;
