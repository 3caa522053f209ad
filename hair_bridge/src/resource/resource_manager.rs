/// Handle-table resource manager.
///
/// Owns the three resource tables (shaders, assets, instances) and implements
/// their reference-counted lifecycle. Every failure is logged with the
/// operation and handle, and turned into a null handle or a no-op.

use std::path::Path;

use crate::graphics_device::GraphicsDevice;
use crate::handle::{AssetHandle, InstanceHandle, ShaderHandle};
use crate::resource::{AssetResource, InstanceResource, ResourceTable, ShaderResource};
use crate::sdk::{AssetId, ConversionSettings, HairSdk, InstanceId};
use crate::{hw_debug, hw_error, hw_info, hw_warn};

const SOURCE: &str = "hairbridge::ResourceManager";

/// Central storage for shaders, assets and instances
#[derive(Default)]
pub struct ResourceManager {
    shaders: ResourceTable<ShaderResource>,
    assets: ResourceTable<AssetResource>,
    instances: ResourceTable<InstanceResource>,
}

impl ResourceManager {
    /// Create a new empty resource manager
    pub fn new() -> Self {
        Self::default()
    }

    // ===== SHADERS =====

    /// Load a compiled pixel shader, or add a reference to an already live one
    pub fn load_shader(&mut self, device: &dyn GraphicsDevice, path: &Path) -> ShaderHandle {
        if let Some(index) = self.shaders.find(|s| s.path == path) {
            if let Some(slot) = self.shaders.get_mut(index) {
                slot.ref_count += 1;
                hw_debug!(SOURCE, "shader {} ({}) ref_count {}", index, path.display(), slot.ref_count);
            }
            return ShaderHandle(index as u32);
        }

        let bytecode = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                hw_error!(SOURCE, "failed to load shader ({}): {}", path.display(), e);
                return ShaderHandle::NULL;
            }
        };

        let index = self.shaders.acquire_slot();
        match device.create_pixel_shader(&bytecode) {
            Ok(shader) => {
                if let Some(slot) = self.shaders.get_mut(index) {
                    slot.path = path.to_path_buf();
                    slot.shader = Some(shader);
                    slot.ref_count = 1;
                }
                hw_info!(SOURCE, "CreatePixelShader({}) : {} succeeded", path.display(), index);
                ShaderHandle(index as u32)
            }
            Err(e) => {
                hw_error!(SOURCE, "CreatePixelShader({}) failed: {}", path.display(), e);
                ShaderHandle::NULL
            }
        }
    }

    /// Drop one reference; the native shader is released with the last one
    pub fn release_shader(&mut self, device: &dyn GraphicsDevice, handle: ShaderHandle) {
        let Some(slot) = self.shaders.get_mut(handle.index()) else {
            return;
        };
        if slot.ref_count == 0 {
            return;
        }
        slot.ref_count -= 1;
        if slot.ref_count == 0 {
            if let Some(shader) = slot.shader.take() {
                device.release_pixel_shader(shader);
            }
            hw_info!(SOURCE, "shaderRelease({})", handle.raw());
        }
    }

    /// Recreate the native shader from its file, keeping handle and refcount
    pub fn reload_shader(&mut self, device: &dyn GraphicsDevice, handle: ShaderHandle) {
        let Some(slot) = self.shaders.live_mut(handle.index()) else {
            hw_warn!(SOURCE, "reload of {} ignored: not loaded", handle);
            return;
        };

        let bytecode = match std::fs::read(&slot.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                hw_error!(SOURCE, "failed to reload shader ({}): {}", slot.path.display(), e);
                return;
            }
        };

        match device.create_pixel_shader(&bytecode) {
            Ok(shader) => {
                if let Some(old) = slot.shader.replace(shader) {
                    device.release_pixel_shader(old);
                }
                hw_info!(SOURCE, "CreatePixelShader({}) : {} reloaded", slot.path.display(), handle.raw());
            }
            Err(e) => {
                hw_error!(SOURCE, "CreatePixelShader({}) failed to reload: {}", slot.path.display(), e);
            }
        }
    }

    /// Live shader slot
    pub fn shader(&self, handle: ShaderHandle) -> Option<&ShaderResource> {
        self.shaders.live(handle.index())
    }

    pub fn shader_ref_count(&self, handle: ShaderHandle) -> u32 {
        self.shaders.get(handle.index()).map_or(0, |s| s.ref_count)
    }

    // ===== ASSETS =====

    /// Load a hair asset, or add a reference to a live one with the same
    /// path and conversion settings
    pub fn load_asset(&mut self, sdk: &dyn HairSdk, path: &Path, settings: &ConversionSettings) -> AssetHandle {
        if let Some(index) = self.assets.find(|a| a.matches(path, settings)) {
            if let Some(slot) = self.assets.get_mut(index) {
                slot.ref_count += 1;
                hw_debug!(SOURCE, "asset {} ({}) ref_count {}", index, path.display(), slot.ref_count);
            }
            return AssetHandle(index as u32);
        }

        let index = self.assets.acquire_slot();
        match sdk.load_asset(path, settings) {
            Ok(asset) => {
                if let Some(slot) = self.assets.get_mut(index) {
                    slot.path = path.to_path_buf();
                    slot.settings = *settings;
                    slot.asset = Some(asset);
                    slot.ref_count = 1;
                }
                hw_info!(SOURCE, "LoadHairAssetFromFile({}) : {} succeeded", path.display(), index);
                AssetHandle(index as u32)
            }
            Err(e) => {
                hw_error!(SOURCE, "LoadHairAssetFromFile({}) failed: {}", path.display(), e);
                AssetHandle::NULL
            }
        }
    }

    /// Drop one reference; the SDK asset is freed with the last one
    pub fn release_asset(&mut self, sdk: &dyn HairSdk, handle: AssetHandle) {
        let Some(slot) = self.assets.get_mut(handle.index()) else {
            return;
        };
        if slot.ref_count == 0 {
            return;
        }
        slot.ref_count -= 1;
        if slot.ref_count == 0 {
            if let Some(asset) = slot.asset.take() {
                if let Err(e) = sdk.free_asset(asset) {
                    hw_error!(SOURCE, "FreeHairAsset({}) failed: {}", handle.raw(), e);
                }
            }
            hw_info!(SOURCE, "assetRelease({})", handle.raw());
        }
    }

    /// Reload the asset from its file and stored settings, keeping handle and refcount
    pub fn reload_asset(&mut self, sdk: &dyn HairSdk, handle: AssetHandle) {
        let Some(slot) = self.assets.live_mut(handle.index()) else {
            hw_warn!(SOURCE, "reload of {} ignored: not loaded", handle);
            return;
        };

        match sdk.load_asset(&slot.path, &slot.settings) {
            Ok(asset) => {
                if let Some(old) = slot.asset.replace(asset) {
                    if let Err(e) = sdk.free_asset(old) {
                        hw_error!(SOURCE, "FreeHairAsset({}) failed: {}", handle.raw(), e);
                    }
                }
                hw_info!(SOURCE, "LoadHairAssetFromFile({}) : {} reloaded", slot.path.display(), handle.raw());
            }
            Err(e) => {
                hw_error!(SOURCE, "LoadHairAssetFromFile({}) failed to reload: {}", slot.path.display(), e);
            }
        }
    }

    /// SDK id of a live asset
    pub fn asset_id(&self, handle: AssetHandle) -> Option<AssetId> {
        self.assets.live(handle.index()).and_then(|a| a.asset)
    }

    pub fn asset(&self, handle: AssetHandle) -> Option<&AssetResource> {
        self.assets.live(handle.index())
    }

    pub fn asset_ref_count(&self, handle: AssetHandle) -> u32 {
        self.assets.get(handle.index()).map_or(0, |a| a.ref_count)
    }

    // ===== INSTANCES =====

    /// Create an instance of a live asset
    ///
    /// The asset's refcount is not changed.
    pub fn create_instance(&mut self, sdk: &dyn HairSdk, asset: AssetHandle) -> InstanceHandle {
        let Some(asset_id) = self.asset_id(asset) else {
            hw_error!(SOURCE, "CreateHairInstance({}) failed: asset not loaded", asset);
            return InstanceHandle::NULL;
        };

        let index = self.instances.acquire_slot();
        match sdk.create_instance(asset_id) {
            Ok(instance) => {
                if let Some(slot) = self.instances.get_mut(index) {
                    slot.asset = asset;
                    slot.instance = Some(instance);
                }
                hw_info!(SOURCE, "CreateHairInstance({}) : {} succeeded", asset.raw(), index);
                InstanceHandle(index as u32)
            }
            Err(e) => {
                hw_error!(SOURCE, "CreateHairInstance({}) failed: {}", asset.raw(), e);
                InstanceHandle::NULL
            }
        }
    }

    /// Free an instance and release the texture views it owns
    pub fn release_instance(&mut self, device: &dyn GraphicsDevice, sdk: &dyn HairSdk, handle: InstanceHandle) {
        let Some(slot) = self.instances.live_mut(handle.index()) else {
            return;
        };
        for view in slot.take_texture_views() {
            device.release_shader_resource_view(view);
        }
        if let Some(instance) = slot.instance.take() {
            if let Err(e) = sdk.free_instance(instance) {
                hw_error!(SOURCE, "FreeHairInstance({}) failed: {}", handle.raw(), e);
            }
        }
        slot.asset = AssetHandle::NULL;
        hw_info!(SOURCE, "instanceRelease({})", handle.raw());
    }

    /// SDK id of a live instance
    pub fn instance_id(&self, handle: InstanceHandle) -> Option<InstanceId> {
        self.instances.live(handle.index()).and_then(|i| i.instance)
    }

    pub fn instance(&self, handle: InstanceHandle) -> Option<&InstanceResource> {
        self.instances.live(handle.index())
    }

    pub fn instance_mut(&mut self, handle: InstanceHandle) -> Option<&mut InstanceResource> {
        self.instances.live_mut(handle.index())
    }

    // ===== TEARDOWN =====

    /// Force-release everything: instances, then assets, then shaders
    ///
    /// Refcounts are ignored. Slots stay in their tables, invalidated.
    pub fn release_all(&mut self, device: &dyn GraphicsDevice, sdk: &dyn HairSdk) {
        for index in self.instances.live_indices() {
            self.release_instance(device, sdk, InstanceHandle(index as u32));
        }

        for index in self.assets.live_indices() {
            if let Some(slot) = self.assets.get_mut(index) {
                slot.ref_count = 1;
            }
            self.release_asset(sdk, AssetHandle(index as u32));
        }

        for index in self.shaders.live_indices() {
            if let Some(slot) = self.shaders.get_mut(index) {
                slot.ref_count = 1;
            }
            self.release_shader(device, ShaderHandle(index as u32));
        }
    }

    /// Number of live (shaders, assets, instances)
    pub fn live_counts(&self) -> (usize, usize, usize) {
        (
            self.shaders.live_count(),
            self.assets.live_count(),
            self.instances.live_count(),
        )
    }

    /// Whether nothing is live in any table
    pub fn is_empty(&self) -> bool {
        self.live_counts() == (0, 0, 0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "resource_manager_tests.rs"]
mod tests;
