/// Unit tests for RenderState (reflection / shadow binding policy, teardown)

use super::*;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::{ComparisonFunc, TextureFormat, ViewDimension};

fn cube(device: &MockGraphicsDevice) -> NativeTexture {
    device.add_texture(128, 128, TextureFormat::R16G16B16A16_FLOAT, 8)
}

// ============================================================================
// Depth-Stencil Tests
// ============================================================================

#[test]
fn test_create_depth_stencil_replaces_previous() {
    let device = MockGraphicsDevice::new();
    let mut state = RenderState::default();

    assert!(state.create_depth_stencil(&device, false));
    assert!(state.create_depth_stencil(&device, true));

    assert_eq!(device.live_of("depth_stencil_state"), 1);
    let descs = device.depth_stencil_descs();
    assert_eq!(descs[0].depth_func, ComparisonFunc::Less);
    assert_eq!(descs[1].depth_func, ComparisonFunc::Greater);
}

#[test]
fn test_failed_depth_stencil_leaves_none() {
    let device = MockGraphicsDevice::new();
    let mut state = RenderState::default();
    state.create_depth_stencil(&device, false);

    device.fail_on("depth_stencil_state");
    assert!(!state.create_depth_stencil(&device, true));
    assert!(state.depth_stencil.is_none());
    assert_eq!(device.live_count(), 0);
}

// ============================================================================
// Reflection Probe Tests
// ============================================================================

#[test]
fn test_reflection_pair_creates_cube_views() {
    let device = MockGraphicsDevice::new();
    let mut state = RenderState::default();
    let (a, b) = (cube(&device), cube(&device));

    state.set_reflection_probe(&device, Some(a), Some(b));

    let probe = state.reflection.unwrap();
    assert_eq!(probe.textures, (a, b));
    let desc = device.view_desc(probe.views[0]).unwrap().unwrap();
    assert_eq!(desc.dimension, ViewDimension::TextureCube);
    assert_eq!(desc.mip_levels, 8);
}

#[test]
fn test_identical_reflection_pair_is_noop() {
    let device = MockGraphicsDevice::new();
    let mut state = RenderState::default();
    let (a, b) = (cube(&device), cube(&device));

    state.set_reflection_probe(&device, Some(a), Some(b));
    state.set_reflection_probe(&device, Some(a), Some(b));

    assert_eq!(device.created("srv"), 2);
    assert_eq!(device.live_of("srv"), 2);
}

#[test]
fn test_new_reflection_pair_releases_old_views() {
    let device = MockGraphicsDevice::new();
    let mut state = RenderState::default();
    let (a, b, c) = (cube(&device), cube(&device), cube(&device));

    state.set_reflection_probe(&device, Some(a), Some(b));
    state.set_reflection_probe(&device, Some(a), Some(c));

    assert_eq!(device.created("srv"), 4);
    assert_eq!(device.live_of("srv"), 2);
    assert_eq!(state.reflection.unwrap().textures, (a, c));
}

#[test]
fn test_half_missing_reflection_pair_clears_both() {
    let device = MockGraphicsDevice::new();
    let mut state = RenderState::default();
    let (a, b) = (cube(&device), cube(&device));

    state.set_reflection_probe(&device, Some(a), Some(b));
    state.set_reflection_probe(&device, Some(a), None);

    assert!(state.reflection.is_none());
    assert_eq!(device.live_count(), 0);
    assert_eq!(state.environment_views()[0], None);
    assert_eq!(state.environment_views()[1], None);
}

#[test]
fn test_reflection_pair_with_unknown_texture_is_cleared() {
    let device = MockGraphicsDevice::new();
    let mut state = RenderState::default();
    let a = cube(&device);

    state.set_reflection_probe(&device, Some(a), Some(NativeTexture(0xBAD)));

    assert!(state.reflection.is_none());
    assert_eq!(device.live_count(), 0);
}

// ============================================================================
// Shadow Texture Tests
// ============================================================================

#[test]
fn test_shadow_texture_uses_r32_float_view() {
    let device = MockGraphicsDevice::new();
    let mut state = RenderState::default();
    let shadow = device.add_texture(2048, 2048, TextureFormat::R32_TYPELESS, 1);

    state.set_shadow_texture(&device, Some(shadow));
    state.set_shadow_texture(&device, Some(shadow));

    assert_eq!(device.created("srv"), 1);
    let view = state.shadow.unwrap().view;
    let desc = device.view_desc(view).unwrap().unwrap();
    assert_eq!(desc.format, TextureFormat::R32_FLOAT);
    assert_eq!(state.environment_views()[2], Some(view));

    state.set_shadow_texture(&device, None);
    assert!(state.shadow.is_none());
    assert_eq!(device.live_count(), 0);
}

// ============================================================================
// Teardown Tests
// ============================================================================

#[test]
fn test_release_all_frees_every_object() {
    let device = MockGraphicsDevice::new();
    let mut state = RenderState::default();
    let (a, b) = (cube(&device), cube(&device));

    state.create_depth_stencil(&device, false);
    state.constant_buffer = Some(device.create_constant_buffer(256).unwrap());
    state.linear_sampler = Some(device.create_sampler_state(&crate::graphics_device::SamplerDesc::linear_wrap()).unwrap());
    state.set_reflection_probe(&device, Some(a), Some(b));
    state.set_shadow_texture(&device, Some(a));
    state.views.get_or_create_rtv(&device, a);
    state.shadow_params = Some(NativeBuffer(0x77));

    state.release_all(&device);

    assert_eq!(device.live_count(), 0);
    assert!(state.shadow_params.is_none());
    assert!(state.views.is_empty());
}
