/// Plugin context.
///
/// The context owns the resource tables, the deferred command queue and every
/// device-bound object. It is an explicit value: whoever embeds the plugin
/// creates one, initializes it against a device and an SDK, and finalizes it
/// (dropping it finalizes too).
///
/// Operations come in two kinds:
/// - immediate: resource loads/releases, asset and instance queries, scene
///   bracket, depth-stencil setup
/// - deferred: everything that drives the device context or SDK render calls
///   is recorded as a `Command` and executed by `flush` on the render thread
///
/// # Threading
///
/// The resource tables and the pending queue share one scene lock. It is
/// reentrant so that a thread inside a `begin_scene` / `end_scene` bracket can
/// still load resources and enqueue commands. `flush` holds it only while it
/// swaps the queue out; the batch executes with the lock released.

use std::cell::RefCell;
use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use parking_lot::{Mutex, ReentrantMutex};
use rustc_hash::FxHashMap;

use crate::command::{Command, CommandQueue};
use crate::config::{BridgeConfig, MAX_LIGHTS, SH_COEFFICIENT_COUNT};
use crate::constants::{HairConstants, LightData};
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, NativeBuffer, NativeTexture, PixelShader, SamplerDesc, ViewDesc,
};
use crate::handle::{AssetHandle, InstanceHandle, ShaderHandle};
use crate::log;
use crate::render_state::RenderState;
use crate::resource::ResourceManager;
use crate::sdk::{
    AssetId, ConversionSettings, DualQuat, HairSdk, Handedness, InstanceDescriptor, InstanceId,
    ShaderSettings, TextureType,
};
use crate::{hw_debug, hw_error, hw_info, hw_warn};

const SOURCE: &str = "hairbridge::Context";

/// Lifecycle state of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStatus {
    Uninitialized,
    Initialized,
    Finalizing,
}

/// State guarded by the scene lock
#[derive(Default)]
struct SceneState {
    resources: ResourceManager,
    queue: CommandQueue,
    /// Open `begin_scene` brackets on the thread holding the lock
    bracket_depth: u32,
}

/// Handles of one batch resolved against the tables at swap time
#[derive(Default)]
struct ResolvedHandles {
    shaders: FxHashMap<ShaderHandle, PixelShader>,
    instances: FxHashMap<InstanceHandle, InstanceId>,
}

impl ResolvedHandles {
    fn resolve(batch: &[Command], resources: &ResourceManager) -> Self {
        let mut resolved = Self::default();
        for command in batch {
            match command {
                Command::SetShader(handle) => {
                    if let Some(shader) = resources.shader(*handle).and_then(|s| s.shader) {
                        resolved.shaders.insert(*handle, shader);
                    }
                }
                Command::Render(handle) | Command::RenderShadow(handle) => {
                    if let Some(instance) = resources.instance_id(*handle) {
                        resolved.instances.insert(*handle, instance);
                    }
                }
                _ => {}
            }
        }
        resolved
    }
}

/// Plugin context
pub struct Context {
    status: ContextStatus,
    config: BridgeConfig,
    sdk: Option<Arc<dyn HairSdk>>,
    device: Option<Arc<dyn GraphicsDevice>>,
    scene: ReentrantMutex<RefCell<SceneState>>,
    render: Mutex<RenderState>,
}

impl Context {
    /// Create an uninitialized context
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            status: ContextStatus::Uninitialized,
            config,
            sdk: None,
            device: None,
            scene: ReentrantMutex::new(RefCell::new(SceneState::default())),
            render: Mutex::new(RenderState::default()),
        }
    }

    pub fn status(&self) -> ContextStatus {
        self.status
    }

    pub fn is_initialized(&self) -> bool {
        self.status == ContextStatus::Initialized
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    // ===== LIFECYCLE =====

    /// Bind the context to a device and an SDK
    ///
    /// Loads the SDK if needed, initializes its render resources, binds the
    /// immediate context, then creates the depth-stencil state, the constant
    /// buffer and the samplers. Any failing required step rolls everything
    /// back: the context is left uninitialized.
    pub fn initialize(&mut self, sdk: Arc<dyn HairSdk>, device: Arc<dyn GraphicsDevice>) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }

        self.sdk = Some(sdk.clone());
        self.device = Some(device.clone());

        match self.create_device_objects(sdk.as_ref(), device.as_ref()) {
            Ok(()) => {
                self.status = ContextStatus::Initialized;
                hw_info!(SOURCE, "context initialized");
                Ok(())
            }
            Err(e) => {
                hw_error!(SOURCE, "context initialization failed: {}", e);
                self.finalize();
                Err(e)
            }
        }
    }

    fn create_device_objects(&mut self, sdk: &dyn HairSdk, device: &dyn GraphicsDevice) -> Result<()> {
        if !sdk.is_loaded() {
            sdk.load(self.config.sdk_library_dir.as_deref())
                .map_err(|e| Error::InitializationFailed(format!("LoadHairSDK: {}", e)))?;
            hw_info!(SOURCE, "LoadHairSDK() succeeded");
        }

        sdk.init_render_resources(device.native_device())
            .map_err(|e| Error::InitializationFailed(format!("InitRenderResources: {}", e)))?;
        hw_info!(SOURCE, "InitRenderResources() succeeded");

        let immediate = device
            .immediate_context()
            .map_err(|e| Error::InitializationFailed(format!("GetImmediateContext: {}", e)))?;
        sdk.set_current_context(immediate)
            .map_err(|e| Error::InitializationFailed(format!("SetCurrentContext: {}", e)))?;
        hw_info!(SOURCE, "SetCurrentContext() succeeded");

        let reversed_z = self.config.reversed_z;
        let render = self.render.get_mut();
        render.create_depth_stencil(device, reversed_z);

        let buffer = device
            .create_constant_buffer(std::mem::size_of::<HairConstants>())
            .map_err(|e| Error::InitializationFailed(format!("CreateBuffer: {}", e)))?;
        render.constant_buffer = Some(buffer);

        render.linear_sampler = device
            .create_sampler_state(&SamplerDesc::linear_wrap())
            .map_err(|e| hw_error!(SOURCE, "CreateSamplerState(linear) failed: {}", e))
            .ok();
        render.shadow_sampler = device
            .create_sampler_state(&SamplerDesc::shadow_comparison())
            .map_err(|e| hw_error!(SOURCE, "CreateSamplerState(shadow) failed: {}", e))
            .ok();

        Ok(())
    }

    /// Tear everything down
    ///
    /// Order: instances, assets, shaders, cached views, then device-bound
    /// objects. Pending commands are dropped. A context that owns nothing
    /// (never initialized, or migrated away) finalizes as a no-op.
    pub fn finalize(&mut self) {
        let device = self.device.take();
        let sdk = self.sdk.take();

        if let (Some(device), Some(sdk)) = (&device, &sdk) {
            self.status = ContextStatus::Finalizing;

            let scene = self.scene.get_mut().get_mut();
            if scene.bracket_depth > 0 {
                hw_warn!(SOURCE, "finalize inside {} open scene bracket(s)", scene.bracket_depth);
            }
            scene.resources.release_all(device.as_ref(), sdk.as_ref());
            scene.queue.clear();

            self.render.get_mut().release_all(device.as_ref());
            hw_info!(SOURCE, "context finalized");
        }

        self.scene = ReentrantMutex::new(RefCell::new(SceneState::default()));
        *self.render.get_mut() = RenderState::default();
        self.status = ContextStatus::Uninitialized;
    }

    /// Transfer ownership of everything `source` holds into a new context
    ///
    /// Device, SDK, resource tables, view caches, device objects and pending
    /// commands all move. `source` is left as a valid empty context whose
    /// finalize does nothing.
    pub fn migrate_from(source: &mut Context) -> Context {
        let migrated = std::mem::take(source);
        let (shaders, assets, instances) = migrated.live_counts();
        hw_info!(
            SOURCE,
            "context migrated: {} shaders, {} assets, {} instances, {} pending commands",
            shaders,
            assets,
            instances,
            migrated.pending_count()
        );
        migrated
    }

    // ===== INTERNAL ACCESS =====

    /// Scene access; entries logged inside reach the host after the borrow ends
    fn with_scene<R>(&self, f: impl FnOnce(&mut SceneState) -> R) -> R {
        log::deferred(|| {
            let guard = self.scene.lock();
            let mut scene = guard.borrow_mut();
            f(&mut scene)
        })
    }

    fn backends(&self) -> Option<(&dyn GraphicsDevice, &dyn HairSdk)> {
        self.device.as_deref().zip(self.sdk.as_deref())
    }

    /// Run an SDK call against a live asset; failures are logged and give None
    fn query_asset<R>(
        &self,
        handle: AssetHandle,
        operation: &str,
        f: impl FnOnce(&dyn HairSdk, AssetId) -> Result<R>,
    ) -> Option<R> {
        let sdk = self.sdk.as_deref()?;
        let asset = self.with_scene(|scene| scene.resources.asset_id(handle))?;
        match f(sdk, asset) {
            Ok(value) => Some(value),
            Err(e) => {
                hw_error!(SOURCE, "{}({}) failed: {}", operation, handle.raw(), e);
                None
            }
        }
    }

    /// Run an SDK call against a live instance; failures are logged and give None
    fn query_instance<R>(
        &self,
        handle: InstanceHandle,
        operation: &str,
        f: impl FnOnce(&dyn HairSdk, InstanceId) -> Result<R>,
    ) -> Option<R> {
        let sdk = self.sdk.as_deref()?;
        let instance = self.with_scene(|scene| scene.resources.instance_id(handle))?;
        match f(sdk, instance) {
            Ok(value) => Some(value),
            Err(e) => {
                hw_error!(SOURCE, "{}({}) failed: {}", operation, handle.raw(), e);
                None
            }
        }
    }

    // ===== SHADERS =====

    pub fn load_shader(&self, path: impl AsRef<Path>) -> ShaderHandle {
        let Some(device) = self.device.as_deref() else {
            hw_error!(SOURCE, "shaderLoadFromFile({}) failed: {}", path.as_ref().display(), Error::DeviceLost);
            return ShaderHandle::NULL;
        };
        self.with_scene(|scene| scene.resources.load_shader(device, path.as_ref()))
    }

    pub fn release_shader(&self, handle: ShaderHandle) {
        if let Some(device) = self.device.as_deref() {
            self.with_scene(|scene| scene.resources.release_shader(device, handle));
        }
    }

    pub fn reload_shader(&self, handle: ShaderHandle) {
        if let Some(device) = self.device.as_deref() {
            self.with_scene(|scene| scene.resources.reload_shader(device, handle));
        }
    }

    pub fn shader_ref_count(&self, handle: ShaderHandle) -> u32 {
        self.with_scene(|scene| scene.resources.shader_ref_count(handle))
    }

    // ===== ASSETS =====

    pub fn load_asset(&self, path: impl AsRef<Path>, settings: &ConversionSettings) -> AssetHandle {
        let Some(sdk) = self.sdk.as_deref() else {
            hw_error!(SOURCE, "assetLoadFromFile({}) failed: {}", path.as_ref().display(), Error::SdkNotLoaded);
            return AssetHandle::NULL;
        };
        self.with_scene(|scene| scene.resources.load_asset(sdk, path.as_ref(), settings))
    }

    pub fn release_asset(&self, handle: AssetHandle) {
        if let Some(sdk) = self.sdk.as_deref() {
            self.with_scene(|scene| scene.resources.release_asset(sdk, handle));
        }
    }

    pub fn reload_asset(&self, handle: AssetHandle) {
        if let Some(sdk) = self.sdk.as_deref() {
            self.with_scene(|scene| scene.resources.reload_asset(sdk, handle));
        }
    }

    pub fn asset_ref_count(&self, handle: AssetHandle) -> u32 {
        self.with_scene(|scene| scene.resources.asset_ref_count(handle))
    }

    /// Number of bones (0 for an invalid asset)
    pub fn asset_bone_count(&self, handle: AssetHandle) -> u32 {
        self.query_asset(handle, "GetNumBones", |sdk, asset| sdk.bone_count(asset))
            .unwrap_or(0)
    }

    /// Name of a bone (empty for an invalid asset or bone)
    pub fn asset_bone_name(&self, handle: AssetHandle, bone: u32) -> String {
        self.query_asset(handle, "GetBoneName", |sdk, asset| sdk.bone_name(asset, bone))
            .unwrap_or_default()
    }

    pub fn asset_bone_indices(&self, handle: AssetHandle) -> Vec4 {
        self.query_asset(handle, "GetBoneIndices", |sdk, asset| sdk.bone_indices(asset))
            .unwrap_or(Vec4::ZERO)
    }

    pub fn asset_bone_weights(&self, handle: AssetHandle) -> Vec4 {
        self.query_asset(handle, "GetBoneWeights", |sdk, asset| sdk.bone_weights(asset))
            .unwrap_or(Vec4::ZERO)
    }

    /// Bind pose of a bone (identity for an invalid asset or bone)
    pub fn asset_bind_pose(&self, handle: AssetHandle, bone: u32) -> Mat4 {
        self.query_asset(handle, "GetBindPose", |sdk, asset| sdk.bind_pose(asset, bone))
            .unwrap_or(Mat4::IDENTITY)
    }

    pub fn asset_default_descriptor(&self, handle: AssetHandle) -> Option<InstanceDescriptor> {
        self.query_asset(handle, "CopyInstanceDescriptorFromAsset", |sdk, asset| {
            sdk.default_descriptor(asset)
        })
    }

    // ===== INSTANCES =====

    pub fn create_instance(&self, asset: AssetHandle) -> InstanceHandle {
        let Some(sdk) = self.sdk.as_deref() else {
            hw_error!(SOURCE, "instanceCreate({}) failed: {}", asset.raw(), Error::SdkNotLoaded);
            return InstanceHandle::NULL;
        };
        self.with_scene(|scene| scene.resources.create_instance(sdk, asset))
    }

    pub fn release_instance(&self, handle: InstanceHandle) {
        if let Some((device, sdk)) = self.backends() {
            self.with_scene(|scene| scene.resources.release_instance(device, sdk, handle));
        }
    }

    /// Asset an instance was created from (null for an invalid instance)
    pub fn instance_asset(&self, handle: InstanceHandle) -> AssetHandle {
        self.with_scene(|scene| scene.resources.instance(handle).map_or(AssetHandle::NULL, |i| i.asset))
    }

    /// World-space (min, max) bounds; None leaves the caller's values untouched
    pub fn instance_bounds(&self, handle: InstanceHandle) -> Option<(Vec3, Vec3)> {
        self.query_instance(handle, "GetBounds", |sdk, instance| sdk.instance_bounds(instance))
    }

    pub fn instance_descriptor(&self, handle: InstanceHandle) -> Option<InstanceDescriptor> {
        self.query_instance(handle, "CopyCurrentInstanceDescriptor", |sdk, instance| {
            sdk.instance_descriptor(instance)
        })
    }

    pub fn set_instance_descriptor(&self, handle: InstanceHandle, descriptor: &InstanceDescriptor) -> bool {
        self.query_instance(handle, "UpdateInstanceDescriptor", |sdk, instance| {
            sdk.set_instance_descriptor(instance, descriptor)
        })
        .is_some()
    }

    /// Bind a control texture to an instance (`None` clears the slot)
    ///
    /// The context creates a 2D view matching the texture's format and mip
    /// count and owns it until it is replaced, cleared, or the instance is
    /// released.
    pub fn set_instance_texture(
        &self,
        handle: InstanceHandle,
        texture_type: TextureType,
        texture: Option<NativeTexture>,
    ) -> bool {
        let Some((device, sdk)) = self.backends() else {
            return false;
        };

        self.with_scene(|scene| {
            let Some(slot) = scene.resources.instance_mut(handle) else {
                return false;
            };
            let Some(instance) = slot.instance else {
                return false;
            };

            let view = match texture {
                None => None,
                Some(texture) => {
                    let created = device
                        .texture_info(texture)
                        .and_then(|info| device.create_shader_resource_view(texture, Some(&ViewDesc::texture_2d(&info))));
                    match created {
                        Ok(view) => Some(view),
                        Err(e) => {
                            hw_error!(SOURCE, "SetTextureSRV({}, {:?}) failed: {}", handle.raw(), texture_type, e);
                            return false;
                        }
                    }
                }
            };

            if let Err(e) = sdk.set_texture(instance, texture_type, view) {
                hw_error!(SOURCE, "SetTextureSRV({}, {:?}) failed: {}", handle.raw(), texture_type, e);
                if let Some(view) = view {
                    device.release_shader_resource_view(view);
                }
                return false;
            }

            if let Some(old) = std::mem::replace(&mut slot.texture_views[texture_type as usize], view) {
                device.release_shader_resource_view(old);
            }
            true
        })
    }

    /// Upload skinning matrices; the count must match the asset's bone count
    pub fn update_skinning_matrices(&self, handle: InstanceHandle, matrices: &[Mat4]) -> bool {
        if !self.check_bone_count(handle, matrices.len()) {
            return false;
        }
        self.query_instance(handle, "UpdateSkinningMatrices", |sdk, instance| {
            sdk.update_skinning_matrices(instance, matrices)
        })
        .is_some()
    }

    /// Upload skinning dual quaternions; the count must match the asset's bone count
    pub fn update_skinning_dqs(&self, handle: InstanceHandle, dqs: &[DualQuat]) -> bool {
        if !self.check_bone_count(handle, dqs.len()) {
            return false;
        }
        self.query_instance(handle, "UpdateSkinningDQs", |sdk, instance| {
            sdk.update_skinning_dqs(instance, dqs)
        })
        .is_some()
    }

    fn check_bone_count(&self, handle: InstanceHandle, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        let bones = self.asset_bone_count(self.instance_asset(handle));
        if bones as usize != count {
            hw_warn!(SOURCE, "skinning update of {} ignored: {} transforms for {} bones", handle, count, bones);
            return false;
        }
        true
    }

    // ===== SCENE BRACKET =====

    /// Acquire the scene lock until the matching `end_scene`
    ///
    /// Brackets nest. `end_scene` must be called on the same thread.
    pub fn begin_scene(&self) {
        let guard = self.scene.lock();
        guard.borrow_mut().bracket_depth += 1;
        std::mem::forget(guard);
    }

    /// Release the scene lock taken by `begin_scene`
    pub fn end_scene(&self) {
        let guard = self.scene.lock();
        let open = {
            let mut scene = guard.borrow_mut();
            if scene.bracket_depth > 0 {
                scene.bracket_depth -= 1;
                true
            } else {
                false
            }
        };
        drop(guard);

        if open {
            // SAFETY: bracket_depth > 0 means this thread owns the lock through
            // the guard forgotten by begin_scene (no other thread could have
            // acquired it to observe a non-zero depth).
            unsafe { self.scene.force_unlock() };
        } else {
            hw_warn!(SOURCE, "endScene without beginScene");
        }
    }

    /// Number of open scene brackets
    pub fn scene_depth(&self) -> u32 {
        self.with_scene(|scene| scene.bracket_depth)
    }

    /// Recreate the depth-stencil state bound by `flush`
    pub fn initialize_depth_stencil(&self, reversed_z: bool) -> bool {
        match self.device.as_deref() {
            Some(device) => self.render.lock().create_depth_stencil(device, reversed_z),
            None => false,
        }
    }

    // ===== DEFERRED OPERATIONS =====

    /// Append a command to the pending queue (any thread)
    pub fn enqueue(&self, command: Command) {
        self.with_scene(|scene| scene.queue.push(command));
    }

    pub fn set_render_target(&self, framebuffer: Option<NativeTexture>, depth: Option<NativeTexture>) {
        self.enqueue(Command::SetRenderTarget { framebuffer, depth });
    }

    pub fn set_view_projection(&self, view: Mat4, projection: Mat4, fov: f32) {
        self.enqueue(Command::SetViewProjection { view, projection, fov });
    }

    pub fn set_shader(&self, shader: ShaderHandle) {
        self.enqueue(Command::SetShader(shader));
    }

    /// Replace the light list; entries past MAX_LIGHTS are dropped
    pub fn set_lights(&self, lights: &[LightData]) {
        if lights.len() > MAX_LIGHTS {
            hw_warn!(SOURCE, "setLights: {} lights, only {} are used", lights.len(), MAX_LIGHTS);
        }
        let count = lights.len().min(MAX_LIGHTS);
        self.enqueue(Command::SetLights(lights[..count].to_vec()));
    }

    pub fn set_spherical_harmonics(&self, coefficients: [Vec4; SH_COEFFICIENT_COUNT]) {
        self.enqueue(Command::SetSphericalHarmonics(coefficients));
    }

    pub fn set_gi_parameters(&self, params: Vec4) {
        self.enqueue(Command::SetGiParameters(params));
    }

    pub fn set_reflection_probe(&self, primary: Option<NativeTexture>, secondary: Option<NativeTexture>) {
        self.enqueue(Command::SetReflectionProbe { primary, secondary });
    }

    pub fn set_shadow_texture(&self, texture: Option<NativeTexture>) {
        self.enqueue(Command::SetShadowTexture(texture));
    }

    pub fn set_shadow_params(&self, buffer: Option<NativeBuffer>) {
        self.enqueue(Command::SetShadowParams(buffer));
    }

    pub fn render(&self, instance: InstanceHandle) {
        self.enqueue(Command::Render(instance));
    }

    pub fn render_shadow(&self, instance: InstanceHandle) {
        self.enqueue(Command::RenderShadow(instance));
    }

    /// Advance the simulation at the next flush
    ///
    /// Takes the scene lock, so it waits for a bracket held by another thread.
    pub fn step_simulation(&self, dt: f32) {
        self.enqueue(Command::StepSimulation(dt));
    }

    /// Snapshot of the pending commands, oldest first
    pub fn pending_commands(&self) -> Vec<Command> {
        self.with_scene(|scene| scene.queue.iter().cloned().collect())
    }

    pub fn pending_count(&self) -> usize {
        self.with_scene(|scene| scene.queue.len())
    }

    /// Live (shaders, assets, instances)
    pub fn live_counts(&self) -> (usize, usize, usize) {
        self.with_scene(|scene| scene.resources.live_counts())
    }

    // ===== FLUSH =====

    /// Execute every pending command on the calling (render) thread
    ///
    /// The queue is swapped out under the scene lock and drained in FIFO
    /// order with the lock released; commands enqueued meanwhile wait for the
    /// next flush. Returns the number of commands executed.
    pub fn flush(&self) -> usize {
        let Some((device, sdk)) = self.backends() else {
            return 0;
        };

        let (batch, resolved) = self.with_scene(|scene| {
            let batch = scene.queue.take();
            let resolved = ResolvedHandles::resolve(&batch, &scene.resources);
            (batch, resolved)
        });
        if batch.is_empty() {
            return 0;
        }

        let count = batch.len();
        let mut render = self.render.lock();
        device.set_depth_stencil_state(render.depth_stencil);
        for command in batch {
            self.execute(&mut render, device, sdk, &resolved, command);
        }
        count
    }

    fn execute(
        &self,
        render: &mut RenderState,
        device: &dyn GraphicsDevice,
        sdk: &dyn HairSdk,
        resolved: &ResolvedHandles,
        command: Command,
    ) {
        let name = command.name();
        match command {
            Command::SetRenderTarget { framebuffer, depth } => {
                let color = framebuffer.and_then(|texture| render.views.get_or_create_rtv(device, texture));
                let depth = depth.and_then(|texture| render.views.get_or_create_dsv(device, texture));
                device.set_render_targets(color, depth);
            }
            Command::SetViewProjection { view, projection, fov } => {
                if let Err(e) = sdk.set_view_projection(&view, &projection, Handedness::Right, fov) {
                    hw_error!(SOURCE, "{}() failed: {}", name, e);
                }
            }
            Command::SetShader(handle) => match resolved.shaders.get(&handle) {
                Some(shader) => device.set_pixel_shader(Some(*shader)),
                None => hw_warn!(SOURCE, "{}({}) ignored: not loaded", name, handle),
            },
            Command::SetLights(lights) => render.constants.set_lights(&lights),
            Command::SetSphericalHarmonics(coefficients) => render.constants.sh = coefficients,
            Command::SetGiParameters(params) => render.constants.gi_params = params,
            Command::SetReflectionProbe { primary, secondary } => {
                render.set_reflection_probe(device, primary, secondary)
            }
            Command::SetShadowTexture(texture) => render.set_shadow_texture(device, texture),
            Command::SetShadowParams(buffer) => render.shadow_params = buffer,
            Command::Render(handle) => match resolved.instances.get(&handle) {
                Some(instance) => self.render_instance(render, device, sdk, handle, *instance),
                None => hw_debug!(SOURCE, "{}({}) skipped: no such instance", name, handle),
            },
            Command::RenderShadow(handle) => match resolved.instances.get(&handle) {
                Some(instance) => render_instance_shadow(device, sdk, handle, *instance),
                None => hw_debug!(SOURCE, "{}({}) skipped: no such instance", name, handle),
            },
            Command::StepSimulation(dt) => {
                if let Err(e) = sdk.step_simulation(dt) {
                    hw_error!(SOURCE, "{}({}) failed: {}", name, dt, e);
                }
            }
        }
    }

    /// Normal pass: constants, samplers, resource slots 0..9, draw
    fn render_instance(
        &self,
        render: &mut RenderState,
        device: &dyn GraphicsDevice,
        sdk: &dyn HairSdk,
        handle: InstanceHandle,
        instance: InstanceId,
    ) {
        match sdk.prepare_shader_constants(instance) {
            Ok(constants) => render.constants.sdk = constants,
            Err(e) => hw_error!(SOURCE, "PrepareShaderConstantBuffer({}) failed: {}", handle.raw(), e),
        }
        if let Some(buffer) = render.constant_buffer {
            if let Err(e) = device.update_buffer(buffer, render.constants.as_bytes()) {
                hw_error!(SOURCE, "constant buffer update failed: {}", e);
            }
            device.set_ps_constant_buffers(0, &[Some(buffer)]);
        }
        device.set_ps_constant_buffers(1, &[render.shadow_params]);
        device.set_ps_samplers(0, &[render.linear_sampler, render.shadow_sampler]);

        bind_sdk_resources(device, sdk, handle, instance);

        let [root, tip, specular] = [TextureType::RootColor, TextureType::TipColor, TextureType::Specular]
            .map(|texture_type| match sdk.texture(instance, texture_type) {
                Ok(view) => view,
                Err(e) => {
                    hw_error!(SOURCE, "GetTextureSRV({}, {:?}) failed: {}", handle.raw(), texture_type, e);
                    None
                }
            });
        let [reflection_a, reflection_b, shadow] = render.environment_views();
        device.set_ps_shader_resources(3, &[root, tip, specular, reflection_a, reflection_b, shadow]);

        if let Err(e) = sdk.render_hairs(instance, ShaderSettings::CUSTOM_SHADER) {
            hw_error!(SOURCE, "RenderHairs({}) failed: {}", handle.raw(), e);
        }
        if self.config.render_visualization {
            if let Err(e) = sdk.render_visualization(instance) {
                hw_error!(SOURCE, "RenderVisualization({}) failed: {}", handle.raw(), e);
            }
        }
    }
}

/// Shadow pass: SDK resource slots 0..3 only, depth-only draw
fn render_instance_shadow(device: &dyn GraphicsDevice, sdk: &dyn HairSdk, handle: InstanceHandle, instance: InstanceId) {
    bind_sdk_resources(device, sdk, handle, instance);
    if let Err(e) = sdk.render_hairs(instance, ShaderSettings::SHADOW_PASS) {
        hw_error!(SOURCE, "RenderHairs({}) failed: {}", handle.raw(), e);
    }
}

fn bind_sdk_resources(device: &dyn GraphicsDevice, sdk: &dyn HairSdk, handle: InstanceHandle, instance: InstanceId) {
    match sdk.shader_resources(instance) {
        Ok(views) => device.set_ps_shader_resources(0, &views),
        Err(e) => hw_error!(SOURCE, "GetShaderResources({}) failed: {}", handle.raw(), e),
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.finalize();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
