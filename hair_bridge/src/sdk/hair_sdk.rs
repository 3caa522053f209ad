/// HairSdk trait - the unified capability interface over the hair SDK
///
/// Every SDK generation is adapted to this one trait. Context code is written
/// once against it and never branches on the generation.

use std::path::Path;

use glam::{Mat4, Vec3, Vec4};

use crate::config::SHADER_RESOURCE_COUNT;
use crate::error::Result;
use crate::graphics_device::{NativeDevice, NativeDeviceContext, ShaderResourceView};
use crate::sdk::{
    AssetId, ConversionSettings, DualQuat, Handedness, InstanceDescriptor, InstanceId,
    ShaderConstants, ShaderSettings, TextureType,
};

/// Shader-resource views the SDK exposes for one instance (pixel slots 0..3)
pub type ShaderResourceSet = [Option<ShaderResourceView>; SHADER_RESOURCE_COUNT];

/// Hair SDK capability
///
/// All calls may fail. Implementations report the failing SDK call in the
/// returned error; callers log it and continue with default state.
pub trait HairSdk: Send + Sync {
    // ===== LIBRARY =====

    /// Load the SDK library (`None`: the directory next to this module)
    fn load(&self, library_dir: Option<&Path>) -> Result<()>;

    /// Unload the SDK library; no-op if not loaded
    fn unload(&self);

    fn is_loaded(&self) -> bool;

    /// SDK interface version this adapter was built against
    fn version(&self) -> u32;

    // ===== DEVICE =====

    /// Create the SDK's own render resources on the device
    fn init_render_resources(&self, device: NativeDevice) -> Result<()>;

    /// Bind the device context the SDK records its draw calls on
    fn set_current_context(&self, context: NativeDeviceContext) -> Result<()>;

    // ===== ASSETS =====

    /// Load an asset file with the given conversion settings
    fn load_asset(&self, path: &Path, settings: &ConversionSettings) -> Result<AssetId>;

    fn free_asset(&self, asset: AssetId) -> Result<()>;

    fn bone_count(&self, asset: AssetId) -> Result<u32>;

    fn bone_name(&self, asset: AssetId, bone: u32) -> Result<String>;

    /// Bone indices of the asset's skinning palette
    fn bone_indices(&self, asset: AssetId) -> Result<Vec4>;

    /// Bone weights of the asset's skinning palette
    fn bone_weights(&self, asset: AssetId) -> Result<Vec4>;

    fn bind_pose(&self, asset: AssetId, bone: u32) -> Result<Mat4>;

    fn default_descriptor(&self, asset: AssetId) -> Result<InstanceDescriptor>;

    // ===== INSTANCES =====

    fn create_instance(&self, asset: AssetId) -> Result<InstanceId>;

    fn free_instance(&self, instance: InstanceId) -> Result<()>;

    fn instance_descriptor(&self, instance: InstanceId) -> Result<InstanceDescriptor>;

    fn set_instance_descriptor(&self, instance: InstanceId, descriptor: &InstanceDescriptor) -> Result<()>;

    /// World-space bounds as (min, max)
    fn instance_bounds(&self, instance: InstanceId) -> Result<(Vec3, Vec3)>;

    /// Bind (or clear with `None`) a control texture
    fn set_texture(
        &self,
        instance: InstanceId,
        texture_type: TextureType,
        view: Option<ShaderResourceView>,
    ) -> Result<()>;

    /// View currently bound for a control texture
    fn texture(&self, instance: InstanceId, texture_type: TextureType) -> Result<Option<ShaderResourceView>>;

    fn update_skinning_matrices(&self, instance: InstanceId, matrices: &[Mat4]) -> Result<()>;

    fn update_skinning_dqs(&self, instance: InstanceId, dqs: &[DualQuat]) -> Result<()>;

    // ===== FRAME =====

    fn set_view_projection(&self, view: &Mat4, projection: &Mat4, handedness: Handedness, fov: f32) -> Result<()>;

    /// Fill the per-instance constant block for the hair pixel shader
    fn prepare_shader_constants(&self, instance: InstanceId) -> Result<ShaderConstants>;

    fn shader_resources(&self, instance: InstanceId) -> Result<ShaderResourceSet>;

    /// Advance the simulation of every instance
    fn step_simulation(&self, dt: f32) -> Result<()>;

    fn render_hairs(&self, instance: InstanceId, settings: ShaderSettings) -> Result<()>;

    fn render_visualization(&self, instance: InstanceId) -> Result<()>;
}
