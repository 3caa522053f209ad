/// Hair instance slot

use crate::graphics_device::ShaderResourceView;
use crate::handle::AssetHandle;
use crate::resource::Slot;
use crate::sdk::{InstanceId, TextureType};

/// A hair instance created from an asset
///
/// Instances are not shared and carry no refcount. The owner asset handle is
/// a non-owning back-reference: creating an instance does not keep the asset
/// alive.
#[derive(Debug, Default)]
pub struct InstanceResource {
    pub asset: AssetHandle,
    pub instance: Option<InstanceId>,
    /// Views created for control textures, owned by this slot
    pub texture_views: [Option<ShaderResourceView>; TextureType::COUNT],
}

impl InstanceResource {
    /// Take every owned texture view out of the slot
    pub fn take_texture_views(&mut self) -> Vec<ShaderResourceView> {
        self.texture_views.iter_mut().filter_map(Option::take).collect()
    }
}

impl Slot for InstanceResource {
    fn is_live(&self) -> bool {
        self.instance.is_some()
    }
}
