/// Unit tests for ViewCache

use super::*;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::TextureFormat;

fn device_with_textures() -> (MockGraphicsDevice, NativeTexture, NativeTexture) {
    let device = MockGraphicsDevice::new();
    let a = device.add_texture(1920, 1080, TextureFormat::R8G8B8A8_UNORM, 1);
    let b = device.add_texture(1920, 1080, TextureFormat::R32_TYPELESS, 1);
    (device, a, b)
}

#[test]
fn test_same_texture_returns_cached_view() {
    let (device, a, _) = device_with_textures();
    let mut cache = ViewCache::new();

    let first = cache.get_or_create_srv(&device, a).unwrap();
    let second = cache.get_or_create_srv(&device, a).unwrap();

    assert_eq!(first, second);
    assert_eq!(device.created("srv"), 1);
}

#[test]
fn test_distinct_textures_get_distinct_views() {
    let (device, a, b) = device_with_textures();
    let mut cache = ViewCache::new();

    let va = cache.get_or_create_srv(&device, a).unwrap();
    let vb = cache.get_or_create_srv(&device, b).unwrap();

    assert_ne!(va, vb);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_view_kinds_are_cached_separately() {
    let (device, a, b) = device_with_textures();
    let mut cache = ViewCache::new();

    let rtv = cache.get_or_create_rtv(&device, a).unwrap();
    assert_eq!(cache.get_or_create_rtv(&device, a), Some(rtv));
    let dsv = cache.get_or_create_dsv(&device, b).unwrap();
    assert_eq!(cache.get_or_create_dsv(&device, b), Some(dsv));
    cache.get_or_create_srv(&device, a).unwrap();

    assert_eq!(cache.len(), 3);
    assert_eq!(device.created("rtv"), 1);
    assert_eq!(device.created("dsv"), 1);
}

#[test]
fn test_failed_creation_is_not_cached() {
    let (device, a, _) = device_with_textures();
    let mut cache = ViewCache::new();

    device.fail_on("rtv");
    assert!(cache.get_or_create_rtv(&device, a).is_none());
    assert!(cache.is_empty());

    device.succeed_on("rtv");
    assert!(cache.get_or_create_rtv(&device, a).is_some());
}

#[test]
fn test_release_all() {
    let (device, a, b) = device_with_textures();
    let mut cache = ViewCache::new();
    cache.get_or_create_srv(&device, a);
    cache.get_or_create_srv(&device, b);
    cache.get_or_create_rtv(&device, a);
    cache.get_or_create_dsv(&device, b);

    cache.release_all(&device);

    assert!(cache.is_empty());
    assert_eq!(device.live_count(), 0);
}
