/// Render-thread state.
///
/// Everything here is only touched while commands execute (or at teardown):
/// the device-bound pipeline objects, the pixel-shader constant block being
/// accumulated by SetLights / SetSphericalHarmonics / SetGIParameters, the
/// view cache, and the reflection / shadow bindings.

use crate::constants::HairConstants;
use crate::graphics_device::{
    DepthStencilDesc, DepthStencilState, GraphicsDevice, NativeBuffer, NativeTexture,
    SamplerState, ShaderResourceView, ViewDesc,
};
use crate::view_cache::ViewCache;
use crate::{hw_error, hw_info};

const SOURCE: &str = "hairbridge::RenderState";

/// Reflection cube map pair and the views created for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectionProbe {
    pub textures: (NativeTexture, NativeTexture),
    pub views: [ShaderResourceView; 2],
}

/// Shadow map texture and its R32_FLOAT view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowMap {
    pub texture: NativeTexture,
    pub view: ShaderResourceView,
}

#[derive(Default)]
pub struct RenderState {
    pub depth_stencil: Option<DepthStencilState>,
    pub constant_buffer: Option<NativeBuffer>,
    pub linear_sampler: Option<SamplerState>,
    pub shadow_sampler: Option<SamplerState>,
    pub constants: HairConstants,
    pub views: ViewCache,
    pub reflection: Option<ReflectionProbe>,
    pub shadow: Option<ShadowMap>,
    /// Host-owned, never released here
    pub shadow_params: Option<NativeBuffer>,
}

impl RenderState {
    /// Replace the depth-stencil state, releasing the previous one
    pub fn create_depth_stencil(&mut self, device: &dyn GraphicsDevice, reversed_z: bool) -> bool {
        let desc = if reversed_z {
            DepthStencilDesc::reversed_z()
        } else {
            DepthStencilDesc::standard()
        };
        if let Some(old) = self.depth_stencil.take() {
            device.release_depth_stencil_state(old);
        }
        match device.create_depth_stencil_state(&desc) {
            Ok(state) => {
                self.depth_stencil = Some(state);
                hw_info!(SOURCE, "CreateDepthStencilState(reversed_z: {}) succeeded", reversed_z);
                true
            }
            Err(e) => {
                hw_error!(SOURCE, "CreateDepthStencilState(reversed_z: {}) failed: {}", reversed_z, e);
                false
            }
        }
    }

    /// Bind a new reflection pair
    ///
    /// Both textures are validated together: a missing texture clears the
    /// pair, an identical pair is kept, and a pair whose views cannot both be
    /// created is cleared.
    pub fn set_reflection_probe(
        &mut self,
        device: &dyn GraphicsDevice,
        primary: Option<NativeTexture>,
        secondary: Option<NativeTexture>,
    ) {
        let (Some(primary), Some(secondary)) = (primary, secondary) else {
            self.release_reflection(device);
            return;
        };
        if let Some(probe) = &self.reflection {
            if probe.textures == (primary, secondary) {
                return;
            }
        }
        self.release_reflection(device);

        let first = cube_view(device, primary);
        let second = cube_view(device, secondary);
        match (first, second) {
            (Some(a), Some(b)) => {
                self.reflection = Some(ReflectionProbe {
                    textures: (primary, secondary),
                    views: [a, b],
                });
            }
            (a, b) => {
                for view in [a, b].into_iter().flatten() {
                    device.release_shader_resource_view(view);
                }
                hw_error!(SOURCE, "SetReflectionProbe: cube views could not be created, probe cleared");
            }
        }
    }

    fn release_reflection(&mut self, device: &dyn GraphicsDevice) {
        if let Some(probe) = self.reflection.take() {
            for view in probe.views {
                device.release_shader_resource_view(view);
            }
        }
    }

    /// Bind a new shadow map (`None` clears it)
    pub fn set_shadow_texture(&mut self, device: &dyn GraphicsDevice, texture: Option<NativeTexture>) {
        if let (Some(current), Some(texture)) = (&self.shadow, texture) {
            if current.texture == texture {
                return;
            }
        }
        self.release_shadow(device);

        let Some(texture) = texture else {
            return;
        };
        match device.create_shader_resource_view(texture, Some(&ViewDesc::shadow_map())) {
            Ok(view) => self.shadow = Some(ShadowMap { texture, view }),
            Err(e) => hw_error!(SOURCE, "Create Shadow SRV failed: {}", e),
        }
    }

    fn release_shadow(&mut self, device: &dyn GraphicsDevice) {
        if let Some(shadow) = self.shadow.take() {
            device.release_shader_resource_view(shadow.view);
        }
    }

    /// Views bound at pixel slots 6, 7 and 8
    pub fn environment_views(&self) -> [Option<ShaderResourceView>; 3] {
        let [first, second] = match &self.reflection {
            Some(probe) => [Some(probe.views[0]), Some(probe.views[1])],
            None => [None, None],
        };
        [first, second, self.shadow.map(|s| s.view)]
    }

    /// Release every device object held by this state
    ///
    /// Order: cached views, reflection and shadow views, then the
    /// depth-stencil state, constant buffer and samplers.
    pub fn release_all(&mut self, device: &dyn GraphicsDevice) {
        self.views.release_all(device);
        self.release_reflection(device);
        self.release_shadow(device);
        if let Some(state) = self.depth_stencil.take() {
            device.release_depth_stencil_state(state);
        }
        if let Some(buffer) = self.constant_buffer.take() {
            device.release_buffer(buffer);
        }
        for sampler in [self.linear_sampler.take(), self.shadow_sampler.take()].into_iter().flatten() {
            device.release_sampler_state(sampler);
        }
        self.shadow_params = None;
        self.constants = HairConstants::default();
    }
}

/// Cube view covering every mip of `texture`
fn cube_view(device: &dyn GraphicsDevice, texture: NativeTexture) -> Option<ShaderResourceView> {
    let info = match device.texture_info(texture) {
        Ok(info) => info,
        Err(e) => {
            hw_error!(SOURCE, "texture_info({:#x}) failed: {}", texture.raw(), e);
            return None;
        }
    };
    match device.create_shader_resource_view(texture, Some(&ViewDesc::texture_cube(&info))) {
        Ok(view) => Some(view),
        Err(e) => {
            hw_error!(SOURCE, "CreateShaderResourceView({:#x}) failed: {}", texture.raw(), e);
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "render_state_tests.rs"]
mod tests;
