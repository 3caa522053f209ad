/// Pixel-shader constant layout shared with the hair shader
///
/// `HairConstants` is uploaded as-is into constant buffer slot 0 for every
/// normal-pass render. Field order and padding follow HLSL packing rules.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

use crate::config::{MAX_LIGHTS, SH_COEFFICIENT_COUNT};
use crate::sdk::ShaderConstants;

/// Kind of light forwarded to the hair shader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum LightType {
    Spot = 0,
    Directional = 1,
    Point = 2,
    Area = 3,
}

/// One light entry
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightData {
    pub light_type: i32,
    pub angle: f32,
    pub range: f32,
    pub _pad: f32,
    pub position: Vec4,
    pub direction: Vec4,
    pub color: Vec4,
}

impl LightData {
    pub fn new(light_type: LightType, position: Vec3, direction: Vec3, color: Vec4) -> Self {
        Self {
            light_type: light_type as i32,
            angle: 0.0,
            range: 0.0,
            _pad: 0.0,
            position: position.extend(1.0),
            direction: direction.extend(0.0),
            color,
        }
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }
}

impl Default for LightData {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Full pixel-shader constant block
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct HairConstants {
    /// Per-instance block prepared by the SDK
    pub sdk: ShaderConstants,
    pub lights: [LightData; MAX_LIGHTS],
    pub num_lights: i32,
    pub _pad: [i32; 3],
    /// Ar, Ag, Ab, Br, Bg, Bb, C
    pub sh: [Vec4; SH_COEFFICIENT_COUNT],
    pub gi_params: Vec4,
}

impl Default for HairConstants {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl HairConstants {
    /// Replace the light list, keeping at most MAX_LIGHTS entries
    pub fn set_lights(&mut self, lights: &[LightData]) {
        let count = lights.len().min(MAX_LIGHTS);
        self.lights = [LightData::zeroed(); MAX_LIGHTS];
        self.lights[..count].copy_from_slice(&lights[..count]);
        self.num_lights = count as i32;
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
