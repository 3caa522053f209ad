/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Every native object gets a fresh id, is tracked while alive, and every call
/// is appended to a command log so tests can assert creation/release balance
/// and the exact order of immediate-context calls.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::Result;
use crate::graphics_device::{
    DepthStencilDesc, DepthStencilState, DepthStencilView, GraphicsDevice, NativeBuffer,
    NativeDevice, NativeDeviceContext, NativeTexture, PixelShader, RenderTargetView,
    SamplerDesc, SamplerState, ShaderResourceView, TextureFormat, TextureInfo, ViewDesc,
};
use crate::hw_bail;

/// Number of pixel-shader slots tracked per binding kind
pub const MOCK_SLOT_COUNT: usize = 16;

/// Currently bound immediate-context state
#[derive(Debug, Clone, Default)]
pub struct MockBindings {
    pub depth_stencil_state: Option<DepthStencilState>,
    pub render_target: Option<RenderTargetView>,
    pub depth_target: Option<DepthStencilView>,
    pub pixel_shader: Option<PixelShader>,
    pub constant_buffers: [Option<NativeBuffer>; MOCK_SLOT_COUNT],
    pub shader_resources: [Option<ShaderResourceView>; MOCK_SLOT_COUNT],
    pub samplers: [Option<SamplerState>; MOCK_SLOT_COUNT],
}

#[derive(Default)]
struct MockDeviceState {
    next_id: u64,
    live: HashMap<u64, &'static str>,
    created: HashMap<&'static str, usize>,
    released: HashMap<&'static str, usize>,
    textures: HashMap<NativeTexture, TextureInfo>,
    failing: HashSet<&'static str>,
    view_descs: HashMap<u64, Option<ViewDesc>>,
    depth_stencil_descs: Vec<DepthStencilDesc>,
    buffer_data: HashMap<NativeBuffer, Vec<u8>>,
    bindings: MockBindings,
    commands: Vec<String>,
}

impl MockDeviceState {
    fn create(&mut self, kind: &'static str) -> u64 {
        self.next_id += 1;
        let id = 0x1000 + self.next_id;
        self.live.insert(id, kind);
        *self.created.entry(kind).or_insert(0) += 1;
        self.commands.push(format!("create_{}", kind));
        id
    }

    fn release(&mut self, kind: &'static str, id: u64) {
        match self.live.remove(&id) {
            Some(live_kind) => {
                assert_eq!(live_kind, kind, "released {} {:#x} as {}", live_kind, id, kind);
                *self.released.entry(kind).or_insert(0) += 1;
                self.commands.push(format!("release_{}", kind));
            }
            None => panic!("double release or unknown {} {:#x}", kind, id),
        }
    }
}

/// Recording mock device
pub struct MockGraphicsDevice {
    state: Mutex<MockDeviceState>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockDeviceState::default()),
        }
    }

    /// Register a host texture the device can describe
    pub fn add_texture(&self, width: u32, height: u32, format: TextureFormat, mip_levels: u32) -> NativeTexture {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let texture = NativeTexture(0x9000 + state.next_id);
        state.textures.insert(texture, TextureInfo { width, height, format, mip_levels });
        texture
    }

    /// Make every subsequent call to `operation` fail
    pub fn fail_on(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    /// Undo `fail_on`
    pub fn succeed_on(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.remove(operation);
    }

    /// Recorded call log
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.state.lock().unwrap().commands.clear();
    }

    /// Number of native objects currently alive
    pub fn live_count(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    /// Number of alive native objects of one kind
    pub fn live_of(&self, kind: &str) -> usize {
        self.state.lock().unwrap().live.values().filter(|k| **k == kind).count()
    }

    pub fn created(&self, kind: &str) -> usize {
        self.state.lock().unwrap().created.get(kind).copied().unwrap_or(0)
    }

    pub fn released(&self, kind: &str) -> usize {
        self.state.lock().unwrap().released.get(kind).copied().unwrap_or(0)
    }

    pub fn is_live(&self, id: u64) -> bool {
        self.state.lock().unwrap().live.contains_key(&id)
    }

    /// Description a shader-resource view was created with
    pub fn view_desc(&self, view: ShaderResourceView) -> Option<Option<ViewDesc>> {
        self.state.lock().unwrap().view_descs.get(&view.0).copied()
    }

    /// Descriptions of every depth-stencil state created so far
    pub fn depth_stencil_descs(&self) -> Vec<DepthStencilDesc> {
        self.state.lock().unwrap().depth_stencil_descs.clone()
    }

    /// Last content uploaded to a buffer
    pub fn buffer_data(&self, buffer: NativeBuffer) -> Option<Vec<u8>> {
        self.state.lock().unwrap().buffer_data.get(&buffer).cloned()
    }

    pub fn bindings(&self) -> MockBindings {
        self.state.lock().unwrap().bindings.clone()
    }

    fn failing(&self, operation: &str) -> bool {
        self.state.lock().unwrap().failing.contains(operation)
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn native_device(&self) -> NativeDevice {
        NativeDevice(0xD3D)
    }

    fn immediate_context(&self) -> Result<NativeDeviceContext> {
        if self.failing("immediate_context") {
            hw_bail!("hairbridge::MockGraphicsDevice", "immediate_context unavailable");
        }
        Ok(NativeDeviceContext(0xC0C))
    }

    fn create_pixel_shader(&self, bytecode: &[u8]) -> Result<PixelShader> {
        if self.failing("pixel_shader") || bytecode.is_empty() {
            hw_bail!("hairbridge::MockGraphicsDevice", "CreatePixelShader failed");
        }
        Ok(PixelShader(self.state.lock().unwrap().create("pixel_shader")))
    }

    fn release_pixel_shader(&self, shader: PixelShader) {
        self.state.lock().unwrap().release("pixel_shader", shader.0);
    }

    fn texture_info(&self, texture: NativeTexture) -> Result<TextureInfo> {
        match self.state.lock().unwrap().textures.get(&texture) {
            Some(info) => Ok(*info),
            None => hw_bail!("hairbridge::MockGraphicsDevice", "unknown texture {:#x}", texture.0),
        }
    }

    fn create_shader_resource_view(
        &self,
        texture: NativeTexture,
        desc: Option<&ViewDesc>,
    ) -> Result<ShaderResourceView> {
        if self.failing("srv") {
            hw_bail!("hairbridge::MockGraphicsDevice", "CreateShaderResourceView failed");
        }
        let mut state = self.state.lock().unwrap();
        if !state.textures.contains_key(&texture) {
            hw_bail!("hairbridge::MockGraphicsDevice", "unknown texture {:#x}", texture.0);
        }
        let id = state.create("srv");
        state.view_descs.insert(id, desc.copied());
        Ok(ShaderResourceView(id))
    }

    fn release_shader_resource_view(&self, view: ShaderResourceView) {
        self.state.lock().unwrap().release("srv", view.0);
    }

    fn create_render_target_view(&self, texture: NativeTexture) -> Result<RenderTargetView> {
        if self.failing("rtv") {
            hw_bail!("hairbridge::MockGraphicsDevice", "CreateRenderTargetView failed");
        }
        let _ = texture;
        Ok(RenderTargetView(self.state.lock().unwrap().create("rtv")))
    }

    fn release_render_target_view(&self, view: RenderTargetView) {
        self.state.lock().unwrap().release("rtv", view.0);
    }

    fn create_depth_stencil_view(&self, texture: NativeTexture) -> Result<DepthStencilView> {
        if self.failing("dsv") {
            hw_bail!("hairbridge::MockGraphicsDevice", "CreateDepthStencilView failed");
        }
        let _ = texture;
        Ok(DepthStencilView(self.state.lock().unwrap().create("dsv")))
    }

    fn release_depth_stencil_view(&self, view: DepthStencilView) {
        self.state.lock().unwrap().release("dsv", view.0);
    }

    fn create_constant_buffer(&self, size: usize) -> Result<NativeBuffer> {
        if self.failing("buffer") || size == 0 || size % 16 != 0 {
            hw_bail!("hairbridge::MockGraphicsDevice", "CreateBuffer({}) failed", size);
        }
        Ok(NativeBuffer(self.state.lock().unwrap().create("buffer")))
    }

    fn release_buffer(&self, buffer: NativeBuffer) {
        let mut state = self.state.lock().unwrap();
        state.buffer_data.remove(&buffer);
        state.release("buffer", buffer.0);
    }

    fn create_depth_stencil_state(&self, desc: &DepthStencilDesc) -> Result<DepthStencilState> {
        if self.failing("depth_stencil_state") {
            hw_bail!("hairbridge::MockGraphicsDevice", "CreateDepthStencilState failed");
        }
        let mut state = self.state.lock().unwrap();
        state.depth_stencil_descs.push(*desc);
        Ok(DepthStencilState(state.create("depth_stencil_state")))
    }

    fn release_depth_stencil_state(&self, state: DepthStencilState) {
        self.state.lock().unwrap().release("depth_stencil_state", state.0);
    }

    fn create_sampler_state(&self, desc: &SamplerDesc) -> Result<SamplerState> {
        if self.failing("sampler") {
            hw_bail!("hairbridge::MockGraphicsDevice", "CreateSamplerState failed");
        }
        let _ = desc;
        Ok(SamplerState(self.state.lock().unwrap().create("sampler")))
    }

    fn release_sampler_state(&self, sampler: SamplerState) {
        self.state.lock().unwrap().release("sampler", sampler.0);
    }

    fn set_depth_stencil_state(&self, depth_stencil: Option<DepthStencilState>) {
        let mut state = self.state.lock().unwrap();
        state.bindings.depth_stencil_state = depth_stencil;
        state.commands.push("set_depth_stencil_state".to_string());
    }

    fn set_render_targets(&self, color: Option<RenderTargetView>, depth: Option<DepthStencilView>) {
        let mut state = self.state.lock().unwrap();
        state.bindings.render_target = color;
        state.bindings.depth_target = depth;
        state.commands.push("set_render_targets".to_string());
    }

    fn set_pixel_shader(&self, shader: Option<PixelShader>) {
        let mut state = self.state.lock().unwrap();
        state.bindings.pixel_shader = shader;
        state.commands.push(match shader {
            Some(s) => format!("set_pixel_shader({:#x})", s.0),
            None => "set_pixel_shader(none)".to_string(),
        });
    }

    fn update_buffer(&self, buffer: NativeBuffer, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.live.contains_key(&buffer.0) {
            hw_bail!("hairbridge::MockGraphicsDevice", "update of dead buffer {:#x}", buffer.0);
        }
        state.buffer_data.insert(buffer, data.to_vec());
        state.commands.push("update_buffer".to_string());
        Ok(())
    }

    fn set_ps_constant_buffers(&self, start_slot: u32, buffers: &[Option<NativeBuffer>]) {
        let mut state = self.state.lock().unwrap();
        for (i, buffer) in buffers.iter().enumerate() {
            state.bindings.constant_buffers[start_slot as usize + i] = *buffer;
        }
        state.commands.push(format!("set_ps_constant_buffers({}, {})", start_slot, buffers.len()));
    }

    fn set_ps_shader_resources(&self, start_slot: u32, views: &[Option<ShaderResourceView>]) {
        let mut state = self.state.lock().unwrap();
        for (i, view) in views.iter().enumerate() {
            state.bindings.shader_resources[start_slot as usize + i] = *view;
        }
        state.commands.push(format!("set_ps_shader_resources({}, {})", start_slot, views.len()));
    }

    fn set_ps_samplers(&self, start_slot: u32, samplers: &[Option<SamplerState>]) {
        let mut state = self.state.lock().unwrap();
        for (i, sampler) in samplers.iter().enumerate() {
            state.bindings.samplers[start_slot as usize + i] = *sampler;
        }
        state.commands.push(format!("set_ps_samplers({}, {})", start_slot, samplers.len()));
    }
}
