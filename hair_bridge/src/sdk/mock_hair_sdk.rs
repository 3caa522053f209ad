/// Mock HairSdk for unit tests (no SDK library required)
///
/// Assets and instances are tracked in maps, every call is appended to a call
/// log, and any operation can be made to fail by name.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use glam::{Mat4, Vec3, Vec4};

use crate::error::Result;
use crate::graphics_device::{NativeDevice, NativeDeviceContext, ShaderResourceView};
use crate::hw_bail;
use crate::sdk::{
    AssetId, ConversionSettings, DualQuat, HairSdk, Handedness, InstanceDescriptor, InstanceId,
    ShaderConstants, ShaderResourceSet, ShaderSettings, TextureType,
};

/// SDK version reported by the mock
pub const MOCK_SDK_VERSION: u32 = 0x0130;

#[derive(Default)]
struct MockSdkState {
    loaded: bool,
    next_id: u32,
    assets: HashMap<AssetId, (PathBuf, ConversionSettings)>,
    instances: HashMap<InstanceId, AssetId>,
    descriptors: HashMap<InstanceId, InstanceDescriptor>,
    textures: HashMap<(InstanceId, TextureType), ShaderResourceView>,
    assets_loaded: usize,
    assets_freed: usize,
    instances_created: usize,
    instances_freed: usize,
    skinning_uploads: usize,
    failing: HashSet<&'static str>,
    calls: Vec<String>,
}

/// Recording mock SDK
pub struct MockHairSdk {
    state: Mutex<MockSdkState>,
}

impl MockHairSdk {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockSdkState::default()),
        }
    }

    /// Make every subsequent call to `operation` fail
    pub fn fail_on(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    pub fn succeed_on(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.remove(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn live_assets(&self) -> usize {
        self.state.lock().unwrap().assets.len()
    }

    pub fn live_instances(&self) -> usize {
        self.state.lock().unwrap().instances.len()
    }

    pub fn assets_loaded(&self) -> usize {
        self.state.lock().unwrap().assets_loaded
    }

    pub fn assets_freed(&self) -> usize {
        self.state.lock().unwrap().assets_freed
    }

    pub fn instances_created(&self) -> usize {
        self.state.lock().unwrap().instances_created
    }

    pub fn instances_freed(&self) -> usize {
        self.state.lock().unwrap().instances_freed
    }

    pub fn skinning_uploads(&self) -> usize {
        self.state.lock().unwrap().skinning_uploads
    }

    /// View the SDK holds for an instance texture slot
    pub fn bound_texture(&self, instance: InstanceId, texture_type: TextureType) -> Option<ShaderResourceView> {
        self.state.lock().unwrap().textures.get(&(instance, texture_type)).copied()
    }

    /// Record a call, failing if it was marked with `fail_on`
    fn call(&self, operation: &'static str, detail: String) -> Result<std::sync::MutexGuard<'_, MockSdkState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{}({})", operation, detail)
        });
        if state.failing.contains(operation) {
            hw_bail!("hairbridge::MockHairSdk", "{} failed", operation);
        }
        Ok(state)
    }

    fn loaded_call(&self, operation: &'static str, detail: String) -> Result<std::sync::MutexGuard<'_, MockSdkState>> {
        let state = self.call(operation, detail)?;
        if !state.loaded {
            return Err(crate::error::Error::SdkNotLoaded);
        }
        Ok(state)
    }
}

impl Default for MockHairSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl HairSdk for MockHairSdk {
    fn load(&self, _library_dir: Option<&Path>) -> Result<()> {
        let mut state = self.call("load", String::new())?;
        state.loaded = true;
        Ok(())
    }

    fn unload(&self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push("unload".to_string());
        state.loaded = false;
    }

    fn is_loaded(&self) -> bool {
        self.state.lock().unwrap().loaded
    }

    fn version(&self) -> u32 {
        MOCK_SDK_VERSION
    }

    fn init_render_resources(&self, device: NativeDevice) -> Result<()> {
        self.loaded_call("init_render_resources", format!("{:#x}", device.raw()))?;
        Ok(())
    }

    fn set_current_context(&self, context: NativeDeviceContext) -> Result<()> {
        self.loaded_call("set_current_context", format!("{:#x}", context.raw()))?;
        Ok(())
    }

    fn load_asset(&self, path: &Path, settings: &ConversionSettings) -> Result<AssetId> {
        let mut state = self.loaded_call("load_asset", path.display().to_string())?;
        if path.as_os_str().is_empty() {
            hw_bail!("hairbridge::MockHairSdk", "load_asset: empty path");
        }
        state.next_id += 1;
        let id = AssetId(state.next_id);
        state.assets.insert(id, (path.to_path_buf(), *settings));
        state.assets_loaded += 1;
        Ok(id)
    }

    fn free_asset(&self, asset: AssetId) -> Result<()> {
        let mut state = self.loaded_call("free_asset", asset.0.to_string())?;
        if state.assets.remove(&asset).is_none() {
            hw_bail!("hairbridge::MockHairSdk", "free_asset: unknown asset {}", asset.0);
        }
        state.assets_freed += 1;
        Ok(())
    }

    fn bone_count(&self, asset: AssetId) -> Result<u32> {
        let state = self.loaded_call("bone_count", asset.0.to_string())?;
        if !state.assets.contains_key(&asset) {
            hw_bail!("hairbridge::MockHairSdk", "bone_count: unknown asset {}", asset.0);
        }
        Ok(2)
    }

    fn bone_name(&self, asset: AssetId, bone: u32) -> Result<String> {
        self.loaded_call("bone_name", format!("{}, {}", asset.0, bone))?;
        match bone {
            0 => Ok("Head".to_string()),
            1 => Ok("Neck".to_string()),
            _ => hw_bail!("hairbridge::MockHairSdk", "bone_name: no bone {}", bone),
        }
    }

    fn bone_indices(&self, asset: AssetId) -> Result<Vec4> {
        self.loaded_call("bone_indices", asset.0.to_string())?;
        Ok(Vec4::new(0.0, 1.0, 0.0, 0.0))
    }

    fn bone_weights(&self, asset: AssetId) -> Result<Vec4> {
        self.loaded_call("bone_weights", asset.0.to_string())?;
        Ok(Vec4::new(0.75, 0.25, 0.0, 0.0))
    }

    fn bind_pose(&self, asset: AssetId, bone: u32) -> Result<Mat4> {
        self.loaded_call("bind_pose", format!("{}, {}", asset.0, bone))?;
        Ok(Mat4::from_translation(Vec3::new(0.0, bone as f32, 0.0)))
    }

    fn default_descriptor(&self, asset: AssetId) -> Result<InstanceDescriptor> {
        self.loaded_call("default_descriptor", asset.0.to_string())?;
        Ok(InstanceDescriptor::default())
    }

    fn create_instance(&self, asset: AssetId) -> Result<InstanceId> {
        let mut state = self.loaded_call("create_instance", asset.0.to_string())?;
        if !state.assets.contains_key(&asset) {
            hw_bail!("hairbridge::MockHairSdk", "create_instance: unknown asset {}", asset.0);
        }
        state.next_id += 1;
        let id = InstanceId(state.next_id);
        state.instances.insert(id, asset);
        state.descriptors.insert(id, InstanceDescriptor::default());
        state.instances_created += 1;
        Ok(id)
    }

    fn free_instance(&self, instance: InstanceId) -> Result<()> {
        let mut state = self.loaded_call("free_instance", instance.0.to_string())?;
        if state.instances.remove(&instance).is_none() {
            hw_bail!("hairbridge::MockHairSdk", "free_instance: unknown instance {}", instance.0);
        }
        state.descriptors.remove(&instance);
        state.textures.retain(|(owner, _), _| *owner != instance);
        state.instances_freed += 1;
        Ok(())
    }

    fn instance_descriptor(&self, instance: InstanceId) -> Result<InstanceDescriptor> {
        let state = self.loaded_call("instance_descriptor", instance.0.to_string())?;
        match state.descriptors.get(&instance) {
            Some(descriptor) => Ok(*descriptor),
            None => hw_bail!("hairbridge::MockHairSdk", "instance_descriptor: unknown instance {}", instance.0),
        }
    }

    fn set_instance_descriptor(&self, instance: InstanceId, descriptor: &InstanceDescriptor) -> Result<()> {
        let mut state = self.loaded_call("set_instance_descriptor", instance.0.to_string())?;
        if !state.instances.contains_key(&instance) {
            hw_bail!("hairbridge::MockHairSdk", "set_instance_descriptor: unknown instance {}", instance.0);
        }
        state.descriptors.insert(instance, *descriptor);
        Ok(())
    }

    fn instance_bounds(&self, instance: InstanceId) -> Result<(Vec3, Vec3)> {
        self.loaded_call("instance_bounds", instance.0.to_string())?;
        Ok((Vec3::splat(-1.0), Vec3::splat(1.0)))
    }

    fn set_texture(
        &self,
        instance: InstanceId,
        texture_type: TextureType,
        view: Option<ShaderResourceView>,
    ) -> Result<()> {
        let mut state = self.loaded_call("set_texture", format!("{}, {:?}", instance.0, texture_type))?;
        match view {
            Some(view) => state.textures.insert((instance, texture_type), view),
            None => state.textures.remove(&(instance, texture_type)),
        };
        Ok(())
    }

    fn texture(&self, instance: InstanceId, texture_type: TextureType) -> Result<Option<ShaderResourceView>> {
        let state = self.loaded_call("texture", format!("{}, {:?}", instance.0, texture_type))?;
        Ok(state.textures.get(&(instance, texture_type)).copied())
    }

    fn update_skinning_matrices(&self, instance: InstanceId, matrices: &[Mat4]) -> Result<()> {
        let mut state = self.loaded_call("update_skinning_matrices", format!("{}, {}", instance.0, matrices.len()))?;
        state.skinning_uploads += 1;
        Ok(())
    }

    fn update_skinning_dqs(&self, instance: InstanceId, dqs: &[DualQuat]) -> Result<()> {
        let mut state = self.loaded_call("update_skinning_dqs", format!("{}, {}", instance.0, dqs.len()))?;
        state.skinning_uploads += 1;
        Ok(())
    }

    fn set_view_projection(&self, _view: &Mat4, _projection: &Mat4, handedness: Handedness, fov: f32) -> Result<()> {
        self.loaded_call("set_view_projection", format!("{:?}, {}", handedness, fov))?;
        Ok(())
    }

    fn prepare_shader_constants(&self, instance: InstanceId) -> Result<ShaderConstants> {
        self.loaded_call("prepare_shader_constants", instance.0.to_string())?;
        let mut constants = ShaderConstants::default();
        constants.data[0] = Vec4::splat(instance.0 as f32);
        Ok(constants)
    }

    fn shader_resources(&self, instance: InstanceId) -> Result<ShaderResourceSet> {
        self.loaded_call("shader_resources", instance.0.to_string())?;
        let base = 0x5000 + instance.0 as u64 * 4;
        Ok([
            Some(ShaderResourceView(base)),
            Some(ShaderResourceView(base + 1)),
            Some(ShaderResourceView(base + 2)),
        ])
    }

    fn step_simulation(&self, dt: f32) -> Result<()> {
        self.loaded_call("step_simulation", format!("{}", dt))?;
        Ok(())
    }

    fn render_hairs(&self, instance: InstanceId, settings: ShaderSettings) -> Result<()> {
        let pass = if settings.contains(ShaderSettings::SHADOW_PASS) { "shadow" } else { "normal" };
        self.loaded_call("render_hairs", format!("{}, {}", instance.0, pass))?;
        Ok(())
    }

    fn render_visualization(&self, instance: InstanceId) -> Result<()> {
        self.loaded_call("render_visualization", instance.0.to_string())?;
        Ok(())
    }
}
