/// Deferred command values
///
/// Each variant carries its own argument payload, captured by value at enqueue
/// time. Commands only reference resources by handle or native identity, so a
/// pending queue stays valid when it is moved to another context.

use glam::{Mat4, Vec4};

use crate::config::SH_COEFFICIENT_COUNT;
use crate::constants::LightData;
use crate::graphics_device::{NativeBuffer, NativeTexture};
use crate::handle::{InstanceHandle, ShaderHandle};

/// An operation executed on the render thread at the next flush
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Bind the framebuffer / depth buffer pair as output targets
    SetRenderTarget {
        framebuffer: Option<NativeTexture>,
        depth: Option<NativeTexture>,
    },
    /// Forward camera matrices to the SDK
    SetViewProjection {
        view: Mat4,
        projection: Mat4,
        fov: f32,
    },
    /// Bind a loaded pixel shader
    SetShader(ShaderHandle),
    /// Replace the light list (at most MAX_LIGHTS entries)
    SetLights(Vec<LightData>),
    /// Ar, Ag, Ab, Br, Bg, Bb, C
    SetSphericalHarmonics([Vec4; SH_COEFFICIENT_COUNT]),
    SetGiParameters(Vec4),
    /// Bind the reflection cube map pair
    SetReflectionProbe {
        primary: Option<NativeTexture>,
        secondary: Option<NativeTexture>,
    },
    SetShadowTexture(Option<NativeTexture>),
    /// Host-owned buffer bound at pixel constant slot 1
    SetShadowParams(Option<NativeBuffer>),
    /// Normal-pass render of one instance
    Render(InstanceHandle),
    /// Shadow-pass render of one instance
    RenderShadow(InstanceHandle),
    StepSimulation(f32),
}

impl Command {
    /// Operation name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetRenderTarget { .. } => "SetRenderTarget",
            Command::SetViewProjection { .. } => "SetViewProjection",
            Command::SetShader(_) => "SetShader",
            Command::SetLights(_) => "SetLights",
            Command::SetSphericalHarmonics(_) => "SetSphericalHarmonics",
            Command::SetGiParameters(_) => "SetGIParameters",
            Command::SetReflectionProbe { .. } => "SetReflectionProbe",
            Command::SetShadowTexture(_) => "SetShadowTexture",
            Command::SetShadowParams(_) => "SetShadowParams",
            Command::Render(_) => "Render",
            Command::RenderShadow(_) => "RenderShadow",
            Command::StepSimulation(_) => "StepSimulation",
        }
    }
}
