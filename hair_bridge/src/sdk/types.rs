/// Value types exchanged with the hair SDK

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3, Vec4};

/// Identifier of an asset inside the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub u32);

/// Identifier of an instance inside the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub u32);

// ===== ASSET CONVERSION =====

/// Up-axis hint for asset conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpAxis {
    #[default]
    Unknown,
    Y,
    Z,
}

/// Coordinate-system handedness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    #[default]
    Unknown,
    Left,
    Right,
}

/// Parameters normalizing an asset's authored space to the engine's space
///
/// Two loads of the same path share one asset only when their settings
/// compare equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionSettings {
    pub up_axis: UpAxis,
    pub handedness: Handedness,
    pub conversion_matrix: Option<Mat4>,
    pub scene_unit: f32,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            up_axis: UpAxis::Unknown,
            handedness: Handedness::Unknown,
            conversion_matrix: None,
            scene_unit: 1.0,
        }
    }
}

impl ConversionSettings {
    /// Settings with unknown hints, no matrix, and the given scene unit
    pub fn with_unit(scene_unit: f32) -> Self {
        Self {
            scene_unit,
            ..Self::default()
        }
    }
}

// ===== INSTANCE DESCRIPTOR =====

/// Simulation and rendering tunables of one hair instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceDescriptor {
    // Geometry
    pub width: f32,
    pub width_root_scale: f32,
    pub width_tip_scale: f32,
    pub width_noise: f32,
    pub density: f32,
    pub length_scale: f32,
    pub length_noise: f32,
    pub clump_scale: f32,
    pub clump_roundness: f32,
    pub clump_noise: f32,
    pub wave_scale: f32,
    pub wave_freq: f32,

    // Simulation
    pub simulate: bool,
    pub mass_scale: f32,
    pub damping: f32,
    pub stiffness: f32,
    pub root_stiffness: f32,
    pub tip_stiffness: f32,
    pub friction: f32,
    pub backstop_radius: f32,
    pub gravity_dir: Vec3,
    pub wind: Vec3,
    pub wind_noise: f32,

    // Shading
    pub root_color: Vec4,
    pub tip_color: Vec4,
    pub specular_color: Vec4,
    pub specular_primary: f32,
    pub specular_power_primary: f32,
    pub diffuse_blend: f32,
    pub shadow_sigma: f32,

    // Visibility
    pub enable: bool,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
    pub visualize_bones: bool,
    pub visualize_guide_hairs: bool,
}

impl Default for InstanceDescriptor {
    fn default() -> Self {
        Self {
            width: 1.0,
            width_root_scale: 1.0,
            width_tip_scale: 0.1,
            width_noise: 0.0,
            density: 1.0,
            length_scale: 1.0,
            length_noise: 1.0,
            clump_scale: 0.0,
            clump_roundness: 1.0,
            clump_noise: 0.0,
            wave_scale: 0.0,
            wave_freq: 3.0,
            simulate: true,
            mass_scale: 10.0,
            damping: 0.0,
            stiffness: 0.5,
            root_stiffness: 0.5,
            tip_stiffness: 0.0,
            friction: 0.0,
            backstop_radius: 0.0,
            gravity_dir: Vec3::new(0.0, -1.0, 0.0),
            wind: Vec3::ZERO,
            wind_noise: 0.0,
            root_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            tip_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular_primary: 0.1,
            specular_power_primary: 100.0,
            diffuse_blend: 0.5,
            shadow_sigma: 0.2,
            enable: true,
            cast_shadows: true,
            receive_shadows: true,
            visualize_bones: false,
            visualize_guide_hairs: false,
        }
    }
}

// ===== TEXTURES =====

/// Semantic slot of a per-instance control texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureType {
    Density,
    RootColor,
    TipColor,
    Width,
    Stiffness,
    RootStiffness,
    ClumpScale,
    ClumpRoundness,
    WaveScale,
    WaveFreq,
    Strand,
    Length,
    Specular,
    Weights,
}

impl TextureType {
    /// Number of texture semantics
    pub const COUNT: usize = 14;

    pub const ALL: [TextureType; Self::COUNT] = [
        TextureType::Density,
        TextureType::RootColor,
        TextureType::TipColor,
        TextureType::Width,
        TextureType::Stiffness,
        TextureType::RootStiffness,
        TextureType::ClumpScale,
        TextureType::ClumpRoundness,
        TextureType::WaveScale,
        TextureType::WaveFreq,
        TextureType::Strand,
        TextureType::Length,
        TextureType::Specular,
        TextureType::Weights,
    ];

    /// Convert from the host's integer encoding
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

// ===== SKINNING =====

/// Dual-quaternion bone transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualQuat {
    pub real: Quat,
    pub dual: Quat,
}

impl Default for DualQuat {
    fn default() -> Self {
        Self {
            real: Quat::IDENTITY,
            dual: Quat::from_xyzw(0.0, 0.0, 0.0, 0.0),
        }
    }
}

// ===== RENDERING =====

bitflags! {
    /// Options for one `render_hairs` call
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShaderSettings: u32 {
        /// The caller has bound its own pixel shader
        const CUSTOM_SHADER = 1 << 0;
        /// Render depth only into the bound shadow target
        const SHADOW_PASS = 1 << 1;
    }
}

/// Number of float4 registers in the SDK per-instance constant block
pub const SHADER_CONSTANT_VECTORS: usize = 64;

/// Per-instance constant block prepared by the SDK for the hair pixel shader
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ShaderConstants {
    pub data: [Vec4; SHADER_CONSTANT_VECTORS],
}

impl Default for ShaderConstants {
    fn default() -> Self {
        Self::zeroed()
    }
}
