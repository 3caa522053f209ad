/// Legacy SDK generation adapter
///
/// The legacy SDK is a C-style interface: every call returns a `ReturnCode`,
/// results come back through out-parameters, assets and instances are plain
/// integer ids, and native views travel as raw pointer values. This module
/// translates it call for call into `HairSdk`.

use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3, Vec4};
use parking_lot::RwLock;

use hair_bridge::hairbridge::device::{NativeDevice, NativeDeviceContext, ShaderResourceView};
use hair_bridge::hairbridge::sdk::{
    AssetId, ConversionSettings, DualQuat, HairSdk, Handedness, InstanceDescriptor, InstanceId,
    ShaderConstants, ShaderResourceSet, ShaderSettings, TextureType, UpAxis, SHADER_CONSTANT_VECTORS,
};
use hair_bridge::hairbridge::{Error, Result, SHADER_RESOURCE_COUNT};
use hair_bridge::hw_info;

use crate::stats::{record_call, Generation};

const SOURCE: &str = "hairbridge::legacy";

/// Size of the bone-name buffer filled by `get_bone_name`
pub const BONE_NAME_CAPACITY: usize = 128;

/// Version reported by the legacy adapter when the SDK does not say
pub const LEGACY_SDK_VERSION: u32 = 0x0100;

/// Return code of every legacy SDK call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    Ok,
    Fail,
    InvalidParameter,
    NotInitialized,
    OutOfMemory,
}

// ===== RAW VALUE TYPES =====

/// Conversion settings in the legacy layout
///
/// Axis and handedness hints are integers (0 = unknown); an identity
/// matrix stands for "no conversion matrix".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacyConversionSettings {
    pub target_up_axis_hint: u32,
    pub target_handedness_hint: u32,
    pub conversion_matrix: [f32; 16],
    pub target_scene_unit: f32,
}

impl From<&ConversionSettings> for LegacyConversionSettings {
    fn from(settings: &ConversionSettings) -> Self {
        Self {
            target_up_axis_hint: match settings.up_axis {
                UpAxis::Unknown => 0,
                UpAxis::Y => 1,
                UpAxis::Z => 2,
            },
            target_handedness_hint: handedness_code(settings.handedness),
            conversion_matrix: settings
                .conversion_matrix
                .unwrap_or(Mat4::IDENTITY)
                .to_cols_array(),
            target_scene_unit: settings.scene_unit,
        }
    }
}

/// Per-draw settings in the legacy layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LegacyShaderSettings {
    pub use_custom_shader: bool,
    pub shadow_pass: bool,
}

impl From<ShaderSettings> for LegacyShaderSettings {
    fn from(settings: ShaderSettings) -> Self {
        Self {
            use_custom_shader: settings.contains(ShaderSettings::CUSTOM_SHADER),
            shadow_pass: settings.contains(ShaderSettings::SHADOW_PASS),
        }
    }
}

fn handedness_code(handedness: Handedness) -> u32 {
    match handedness {
        Handedness::Unknown => 0,
        Handedness::Left => 1,
        Handedness::Right => 2,
    }
}

// ===== RAW INTERFACE =====

/// The legacy SDK as exported by its library
///
/// Ids are 32-bit; a view value of 0 is the null pointer.
pub trait LegacyRawSdk: Send + Sync {
    fn version(&self) -> u32 {
        LEGACY_SDK_VERSION
    }

    fn init_render_resources(&self, device: u64) -> ReturnCode;
    fn set_current_context(&self, context: u64) -> ReturnCode;

    fn load_hair_asset_from_file(&self, path: &str, asset: &mut u32, settings: &LegacyConversionSettings) -> ReturnCode;
    fn free_hair_asset(&self, asset: u32) -> ReturnCode;
    fn get_num_bones(&self, asset: u32, count: &mut u32) -> ReturnCode;
    fn get_bone_name(&self, asset: u32, bone: u32, name: &mut [u8; BONE_NAME_CAPACITY]) -> ReturnCode;
    fn get_bone_indices(&self, asset: u32, indices: &mut [f32; 4]) -> ReturnCode;
    fn get_bone_weights(&self, asset: u32, weights: &mut [f32; 4]) -> ReturnCode;
    fn get_bind_pose(&self, asset: u32, bone: u32, pose: &mut [f32; 16]) -> ReturnCode;
    fn copy_instance_descriptor_from_asset(&self, asset: u32, descriptor: &mut InstanceDescriptor) -> ReturnCode;

    fn create_hair_instance(&self, asset: u32, instance: &mut u32) -> ReturnCode;
    fn free_hair_instance(&self, instance: u32) -> ReturnCode;
    fn copy_current_instance_descriptor(&self, instance: u32, descriptor: &mut InstanceDescriptor) -> ReturnCode;
    fn update_instance_descriptor(&self, instance: u32, descriptor: &InstanceDescriptor) -> ReturnCode;
    fn get_bounds(&self, instance: u32, min: &mut [f32; 3], max: &mut [f32; 3]) -> ReturnCode;
    fn set_texture_srv(&self, instance: u32, texture: u32, view: u64) -> ReturnCode;
    fn get_texture_srv(&self, instance: u32, texture: u32, view: &mut u64) -> ReturnCode;
    fn update_skinning_matrices(&self, instance: u32, matrices: &[[f32; 16]]) -> ReturnCode;
    fn update_skinning_dqs(&self, instance: u32, dqs: &[[f32; 8]]) -> ReturnCode;

    fn set_view_projection(&self, view: &[f32; 16], projection: &[f32; 16], handedness: u32, fov: f32) -> ReturnCode;
    fn prepare_shader_constant_buffer(&self, instance: u32, constants: &mut [[f32; 4]; SHADER_CONSTANT_VECTORS]) -> ReturnCode;
    fn get_shader_resources(&self, instance: u32, views: &mut [u64; SHADER_RESOURCE_COUNT]) -> ReturnCode;
    fn step_simulation(&self, dt: f32) -> ReturnCode;
    fn render_hairs(&self, instance: u32, settings: &LegacyShaderSettings) -> ReturnCode;
    fn render_visualization(&self, instance: u32) -> ReturnCode;
}

/// Opens the legacy SDK library found in a directory (None: next to this module)
pub type LegacyLoader<R> = Arc<dyn Fn(Option<&Path>) -> Option<R> + Send + Sync>;

// ===== ADAPTER =====

/// `HairSdk` over the legacy generation
pub struct LegacySdkAdapter<R: LegacyRawSdk> {
    loader: LegacyLoader<R>,
    raw: RwLock<Option<R>>,
}

impl<R: LegacyRawSdk> LegacySdkAdapter<R> {
    pub fn new(loader: LegacyLoader<R>) -> Self {
        Self {
            loader,
            raw: RwLock::new(None),
        }
    }

    /// Adapter over an already opened SDK
    pub fn with_sdk(raw: R) -> Self {
        Self {
            loader: Arc::new(|_: Option<&Path>| -> Option<R> { None }),
            raw: RwLock::new(Some(raw)),
        }
    }

    /// Run one raw call and translate its return code
    ///
    /// Failures are returned unlogged; the context reports them once.
    fn call<T>(&self, name: &str, f: impl FnOnce(&R) -> (ReturnCode, T)) -> Result<T> {
        let raw = self.raw.read();
        let Some(sdk) = raw.as_ref() else {
            return Err(Error::SdkNotLoaded);
        };
        let (code, value) = f(sdk);
        record_call(Generation::Legacy, code == ReturnCode::Ok);
        match code {
            ReturnCode::Ok => Ok(value),
            code => Err(Error::BackendError(format!("{} returned {:?}", name, code))),
        }
    }

    fn check(&self, name: &str, f: impl FnOnce(&R) -> ReturnCode) -> Result<()> {
        self.call(name, |sdk| (f(sdk), ()))
    }
}

fn texture_code(texture_type: TextureType) -> u32 {
    texture_type as u32
}

fn view_value(view: Option<ShaderResourceView>) -> u64 {
    view.map_or(0, |v| v.raw())
}

fn view_from(value: u64) -> Option<ShaderResourceView> {
    (value != 0).then_some(ShaderResourceView(value))
}

impl<R: LegacyRawSdk> HairSdk for LegacySdkAdapter<R> {
    fn load(&self, library_dir: Option<&Path>) -> Result<()> {
        let mut raw = self.raw.write();
        if raw.is_some() {
            return Ok(());
        }
        match (self.loader)(library_dir) {
            Some(sdk) => {
                hw_info!(SOURCE, "legacy SDK {:#06x} loaded", sdk.version());
                *raw = Some(sdk);
                Ok(())
            }
            None => Err(Error::InitializationFailed(format!(
                "legacy SDK library not found in {}",
                library_dir.map_or_else(|| "module directory".to_string(), |d| d.display().to_string())
            ))),
        }
    }

    fn unload(&self) {
        if self.raw.write().take().is_some() {
            hw_info!(SOURCE, "legacy SDK unloaded");
        }
    }

    fn is_loaded(&self) -> bool {
        self.raw.read().is_some()
    }

    fn version(&self) -> u32 {
        self.raw.read().as_ref().map_or(LEGACY_SDK_VERSION, |sdk| sdk.version())
    }

    fn init_render_resources(&self, device: NativeDevice) -> Result<()> {
        self.check("InitRenderResources", |sdk| sdk.init_render_resources(device.raw()))
    }

    fn set_current_context(&self, context: NativeDeviceContext) -> Result<()> {
        self.check("SetCurrentContext", |sdk| sdk.set_current_context(context.raw()))
    }

    fn load_asset(&self, path: &Path, settings: &ConversionSettings) -> Result<AssetId> {
        let settings = LegacyConversionSettings::from(settings);
        let path = path.to_string_lossy();
        self.call("LoadHairAssetFromFile", |sdk| {
            let mut asset = 0;
            (sdk.load_hair_asset_from_file(&path, &mut asset, &settings), AssetId(asset))
        })
    }

    fn free_asset(&self, asset: AssetId) -> Result<()> {
        self.check("FreeHairAsset", |sdk| sdk.free_hair_asset(asset.0))
    }

    fn bone_count(&self, asset: AssetId) -> Result<u32> {
        self.call("GetNumBones", |sdk| {
            let mut count = 0;
            (sdk.get_num_bones(asset.0, &mut count), count)
        })
    }

    fn bone_name(&self, asset: AssetId, bone: u32) -> Result<String> {
        let buffer = self.call("GetBoneName", |sdk| {
            let mut buffer = [0u8; BONE_NAME_CAPACITY];
            (sdk.get_bone_name(asset.0, bone, &mut buffer), buffer)
        })?;
        let len = buffer.iter().position(|&b| b == 0).unwrap_or(BONE_NAME_CAPACITY);
        Ok(String::from_utf8_lossy(&buffer[..len]).into_owned())
    }

    fn bone_indices(&self, asset: AssetId) -> Result<Vec4> {
        self.call("GetBoneIndices", |sdk| {
            let mut indices = [0.0; 4];
            (sdk.get_bone_indices(asset.0, &mut indices), Vec4::from_array(indices))
        })
    }

    fn bone_weights(&self, asset: AssetId) -> Result<Vec4> {
        self.call("GetBoneWeights", |sdk| {
            let mut weights = [0.0; 4];
            (sdk.get_bone_weights(asset.0, &mut weights), Vec4::from_array(weights))
        })
    }

    fn bind_pose(&self, asset: AssetId, bone: u32) -> Result<Mat4> {
        self.call("GetBindPose", |sdk| {
            let mut pose = [0.0; 16];
            (sdk.get_bind_pose(asset.0, bone, &mut pose), Mat4::from_cols_array(&pose))
        })
    }

    fn default_descriptor(&self, asset: AssetId) -> Result<InstanceDescriptor> {
        self.call("CopyInstanceDescriptorFromAsset", |sdk| {
            let mut descriptor = InstanceDescriptor::default();
            (sdk.copy_instance_descriptor_from_asset(asset.0, &mut descriptor), descriptor)
        })
    }

    fn create_instance(&self, asset: AssetId) -> Result<InstanceId> {
        self.call("CreateHairInstance", |sdk| {
            let mut instance = 0;
            (sdk.create_hair_instance(asset.0, &mut instance), InstanceId(instance))
        })
    }

    fn free_instance(&self, instance: InstanceId) -> Result<()> {
        self.check("FreeHairInstance", |sdk| sdk.free_hair_instance(instance.0))
    }

    fn instance_descriptor(&self, instance: InstanceId) -> Result<InstanceDescriptor> {
        self.call("CopyCurrentInstanceDescriptor", |sdk| {
            let mut descriptor = InstanceDescriptor::default();
            (sdk.copy_current_instance_descriptor(instance.0, &mut descriptor), descriptor)
        })
    }

    fn set_instance_descriptor(&self, instance: InstanceId, descriptor: &InstanceDescriptor) -> Result<()> {
        self.check("UpdateInstanceDescriptor", |sdk| sdk.update_instance_descriptor(instance.0, descriptor))
    }

    fn instance_bounds(&self, instance: InstanceId) -> Result<(Vec3, Vec3)> {
        self.call("GetBounds", |sdk| {
            let (mut min, mut max) = ([0.0; 3], [0.0; 3]);
            let code = sdk.get_bounds(instance.0, &mut min, &mut max);
            (code, (Vec3::from_array(min), Vec3::from_array(max)))
        })
    }

    fn set_texture(&self, instance: InstanceId, texture_type: TextureType, view: Option<ShaderResourceView>) -> Result<()> {
        self.check("SetTextureSRV", |sdk| {
            sdk.set_texture_srv(instance.0, texture_code(texture_type), view_value(view))
        })
    }

    fn texture(&self, instance: InstanceId, texture_type: TextureType) -> Result<Option<ShaderResourceView>> {
        self.call("GetTextureSRV", |sdk| {
            let mut view = 0;
            (sdk.get_texture_srv(instance.0, texture_code(texture_type), &mut view), view_from(view))
        })
    }

    fn update_skinning_matrices(&self, instance: InstanceId, matrices: &[Mat4]) -> Result<()> {
        let matrices: Vec<[f32; 16]> = matrices.iter().map(Mat4::to_cols_array).collect();
        self.check("UpdateSkinningMatrices", |sdk| sdk.update_skinning_matrices(instance.0, &matrices))
    }

    fn update_skinning_dqs(&self, instance: InstanceId, dqs: &[DualQuat]) -> Result<()> {
        let dqs: Vec<[f32; 8]> = dqs.iter().map(dual_quat_array).collect();
        self.check("UpdateSkinningDQs", |sdk| sdk.update_skinning_dqs(instance.0, &dqs))
    }

    fn set_view_projection(&self, view: &Mat4, projection: &Mat4, handedness: Handedness, fov: f32) -> Result<()> {
        let (view, projection) = (view.to_cols_array(), projection.to_cols_array());
        self.check("SetViewProjection", |sdk| {
            sdk.set_view_projection(&view, &projection, handedness_code(handedness), fov)
        })
    }

    fn prepare_shader_constants(&self, instance: InstanceId) -> Result<ShaderConstants> {
        self.call("PrepareShaderConstantBuffer", |sdk| {
            let mut raw = [[0.0; 4]; SHADER_CONSTANT_VECTORS];
            let code = sdk.prepare_shader_constant_buffer(instance.0, &mut raw);
            (code, ShaderConstants { data: raw.map(Vec4::from_array) })
        })
    }

    fn shader_resources(&self, instance: InstanceId) -> Result<ShaderResourceSet> {
        self.call("GetShaderResources", |sdk| {
            let mut views = [0; SHADER_RESOURCE_COUNT];
            (sdk.get_shader_resources(instance.0, &mut views), views.map(view_from))
        })
    }

    fn step_simulation(&self, dt: f32) -> Result<()> {
        self.check("StepSimulation", |sdk| sdk.step_simulation(dt))
    }

    fn render_hairs(&self, instance: InstanceId, settings: ShaderSettings) -> Result<()> {
        let settings = LegacyShaderSettings::from(settings);
        self.check("RenderHairs", |sdk| sdk.render_hairs(instance.0, &settings))
    }

    fn render_visualization(&self, instance: InstanceId) -> Result<()> {
        self.check("RenderVisualization", |sdk| sdk.render_visualization(instance.0))
    }
}

/// Real part then dual part, each as (x, y, z, w)
fn dual_quat_array(dq: &DualQuat) -> [f32; 8] {
    let (r, d): (Quat, Quat) = (dq.real, dq.dual);
    [r.x, r.y, r.z, r.w, d.x, d.y, d.z, d.w]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "legacy_tests.rs"]
mod tests;
