/// GPU view cache.
///
/// Memoizes the views derived from host textures, keyed by the texture's
/// native identity. Entries are created lazily on first use and are never
/// evicted: they are released only by `release_all` at context teardown.

use rustc_hash::FxHashMap;

use crate::graphics_device::{
    DepthStencilView, GraphicsDevice, NativeTexture, RenderTargetView, ShaderResourceView,
};
use crate::hw_error;

const SOURCE: &str = "hairbridge::ViewCache";

#[derive(Debug, Default)]
pub struct ViewCache {
    srv: FxHashMap<NativeTexture, ShaderResourceView>,
    rtv: FxHashMap<NativeTexture, RenderTargetView>,
    dsv: FxHashMap<NativeTexture, DepthStencilView>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shader-resource view of `texture`, created on first request
    pub fn get_or_create_srv(
        &mut self,
        device: &dyn GraphicsDevice,
        texture: NativeTexture,
    ) -> Option<ShaderResourceView> {
        if let Some(view) = self.srv.get(&texture) {
            return Some(*view);
        }
        match device.create_shader_resource_view(texture, None) {
            Ok(view) => {
                self.srv.insert(texture, view);
                Some(view)
            }
            Err(e) => {
                hw_error!(SOURCE, "CreateShaderResourceView({:#x}) failed: {}", texture.raw(), e);
                None
            }
        }
    }

    /// Render-target view of `texture`, created on first request
    pub fn get_or_create_rtv(
        &mut self,
        device: &dyn GraphicsDevice,
        texture: NativeTexture,
    ) -> Option<RenderTargetView> {
        if let Some(view) = self.rtv.get(&texture) {
            return Some(*view);
        }
        match device.create_render_target_view(texture) {
            Ok(view) => {
                self.rtv.insert(texture, view);
                Some(view)
            }
            Err(e) => {
                hw_error!(SOURCE, "CreateRenderTargetView({:#x}) failed: {}", texture.raw(), e);
                None
            }
        }
    }

    /// Depth-stencil view of `texture`, created on first request
    pub fn get_or_create_dsv(
        &mut self,
        device: &dyn GraphicsDevice,
        texture: NativeTexture,
    ) -> Option<DepthStencilView> {
        if let Some(view) = self.dsv.get(&texture) {
            return Some(*view);
        }
        match device.create_depth_stencil_view(texture) {
            Ok(view) => {
                self.dsv.insert(texture, view);
                Some(view)
            }
            Err(e) => {
                hw_error!(SOURCE, "CreateDepthStencilView({:#x}) failed: {}", texture.raw(), e);
                None
            }
        }
    }

    /// Release every cached view
    pub fn release_all(&mut self, device: &dyn GraphicsDevice) {
        for (_, view) in self.srv.drain() {
            device.release_shader_resource_view(view);
        }
        for (_, view) in self.rtv.drain() {
            device.release_render_target_view(view);
        }
        for (_, view) in self.dsv.drain() {
            device.release_depth_stencil_view(view);
        }
    }

    /// Total number of cached views
    pub fn len(&self) -> usize {
        self.srv.len() + self.rtv.len() + self.dsv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "view_cache_tests.rs"]
mod tests;
