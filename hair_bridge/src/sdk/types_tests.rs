/// Unit tests for the SDK value types.

use crate::sdk::*;
use glam::{Mat4, Vec3};

// ============================================================================
// ConversionSettings Tests
// ============================================================================

#[test]
fn test_conversion_settings_value_equality() {
    let a = ConversionSettings::with_unit(1.0);
    let b = ConversionSettings::with_unit(1.0);
    assert_eq!(a, b);

    let c = ConversionSettings::with_unit(0.01);
    assert_ne!(a, c);

    let d = ConversionSettings {
        conversion_matrix: Some(Mat4::from_scale(Vec3::splat(2.0))),
        ..a
    };
    assert_ne!(a, d);
}

#[test]
fn test_conversion_settings_default_hints() {
    let settings = ConversionSettings::default();
    assert_eq!(settings.up_axis, UpAxis::Unknown);
    assert_eq!(settings.handedness, Handedness::Unknown);
    assert!(settings.conversion_matrix.is_none());
    assert_eq!(settings.scene_unit, 1.0);
}

// ============================================================================
// TextureType Tests
// ============================================================================

#[test]
fn test_texture_type_from_index() {
    assert_eq!(TextureType::from_index(0), Some(TextureType::Density));
    assert_eq!(TextureType::from_index(1), Some(TextureType::RootColor));
    assert_eq!(TextureType::from_index(12), Some(TextureType::Specular));
    assert_eq!(TextureType::from_index(13), Some(TextureType::Weights));
    assert_eq!(TextureType::from_index(14), None);
    assert_eq!(TextureType::ALL.len(), TextureType::COUNT);
}

// ============================================================================
// Render Types Tests
// ============================================================================

#[test]
fn test_shader_settings_flags() {
    let settings = ShaderSettings::CUSTOM_SHADER | ShaderSettings::SHADOW_PASS;
    assert!(settings.contains(ShaderSettings::SHADOW_PASS));
    assert!(!ShaderSettings::CUSTOM_SHADER.contains(ShaderSettings::SHADOW_PASS));
}

#[test]
fn test_shader_constants_layout() {
    assert_eq!(std::mem::size_of::<ShaderConstants>(), SHADER_CONSTANT_VECTORS * 16);
    let constants = ShaderConstants::default();
    assert!(bytemuck::bytes_of(&constants).iter().all(|b| *b == 0));
}

#[test]
fn test_default_descriptor_is_enabled() {
    let descriptor = InstanceDescriptor::default();
    assert!(descriptor.enable);
    assert!(descriptor.simulate);
    assert_eq!(descriptor.gravity_dir, Vec3::new(0.0, -1.0, 0.0));
}

#[test]
fn test_dual_quat_default_is_identity() {
    let dq = DualQuat::default();
    assert_eq!(dq.real, glam::Quat::IDENTITY);
}
