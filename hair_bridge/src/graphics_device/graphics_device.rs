/// GraphicsDevice trait - the host graphics API as seen by the plugin

use crate::error::Result;
use crate::graphics_device::{
    DepthStencilDesc, DepthStencilState, DepthStencilView, NativeBuffer, NativeDevice,
    NativeDeviceContext, NativeTexture, PixelShader, RenderTargetView, SamplerDesc, SamplerState,
    ShaderResourceView, TextureInfo, ViewDesc,
};

/// Graphics device interface
///
/// Object creation may be called from any thread. The `set_*`, `update_buffer`
/// calls drive the immediate context and are only issued from the render thread,
/// while a flush is draining the command queue.
///
/// Every object returned by a `create_*` call is owned by the caller and must be
/// handed back to the matching `release_*` call exactly once.
pub trait GraphicsDevice: Send + Sync {
    /// Native device handle (passed to the SDK's render-resource initialization)
    fn native_device(&self) -> NativeDevice;

    /// The device's immediate context
    fn immediate_context(&self) -> Result<NativeDeviceContext>;

    // ===== OBJECT CREATION =====

    /// Create a pixel shader from compiled bytecode
    fn create_pixel_shader(&self, bytecode: &[u8]) -> Result<PixelShader>;

    /// Release a pixel shader
    fn release_pixel_shader(&self, shader: PixelShader);

    /// Query format, size and mip count of a native texture
    fn texture_info(&self, texture: NativeTexture) -> Result<TextureInfo>;

    /// Create a shader-resource view (`None` derives the view from the texture)
    fn create_shader_resource_view(
        &self,
        texture: NativeTexture,
        desc: Option<&ViewDesc>,
    ) -> Result<ShaderResourceView>;

    /// Release a shader-resource view
    fn release_shader_resource_view(&self, view: ShaderResourceView);

    /// Create a render-target view over a color texture
    fn create_render_target_view(&self, texture: NativeTexture) -> Result<RenderTargetView>;

    /// Release a render-target view
    fn release_render_target_view(&self, view: RenderTargetView);

    /// Create a depth-stencil view over a depth texture
    fn create_depth_stencil_view(&self, texture: NativeTexture) -> Result<DepthStencilView>;

    /// Release a depth-stencil view
    fn release_depth_stencil_view(&self, view: DepthStencilView);

    /// Create a CPU-writable constant buffer of `size` bytes
    fn create_constant_buffer(&self, size: usize) -> Result<NativeBuffer>;

    /// Release a buffer created by `create_constant_buffer`
    fn release_buffer(&self, buffer: NativeBuffer);

    /// Create a depth-stencil state object
    fn create_depth_stencil_state(&self, desc: &DepthStencilDesc) -> Result<DepthStencilState>;

    /// Release a depth-stencil state object
    fn release_depth_stencil_state(&self, state: DepthStencilState);

    /// Create a sampler state object
    fn create_sampler_state(&self, desc: &SamplerDesc) -> Result<SamplerState>;

    /// Release a sampler state object
    fn release_sampler_state(&self, sampler: SamplerState);

    // ===== IMMEDIATE CONTEXT =====

    /// Bind the output-merger depth-stencil state
    fn set_depth_stencil_state(&self, state: Option<DepthStencilState>);

    /// Bind the output-merger color/depth targets
    fn set_render_targets(&self, color: Option<RenderTargetView>, depth: Option<DepthStencilView>);

    /// Bind the pixel shader
    fn set_pixel_shader(&self, shader: Option<PixelShader>);

    /// Overwrite the whole content of a dynamic buffer
    fn update_buffer(&self, buffer: NativeBuffer, data: &[u8]) -> Result<()>;

    /// Bind pixel-shader constant buffers starting at `start_slot`
    fn set_ps_constant_buffers(&self, start_slot: u32, buffers: &[Option<NativeBuffer>]);

    /// Bind pixel-shader resource views starting at `start_slot`
    fn set_ps_shader_resources(&self, start_slot: u32, views: &[Option<ShaderResourceView>]);

    /// Bind pixel-shader samplers starting at `start_slot`
    fn set_ps_samplers(&self, start_slot: u32, samplers: &[Option<SamplerState>]);
}
