/// Hair asset slot

use std::path::PathBuf;

use crate::resource::Slot;
use crate::sdk::{AssetId, ConversionSettings};

/// A hair asset loaded into the SDK
///
/// Assets are shared: loading the same (path, settings) pair again bumps
/// `ref_count` instead of loading a second copy.
#[derive(Debug, Default)]
pub struct AssetResource {
    pub path: PathBuf,
    pub settings: ConversionSettings,
    pub asset: Option<AssetId>,
    pub ref_count: u32,
}

impl AssetResource {
    /// Whether this slot holds `path` loaded with `settings`
    pub fn matches(&self, path: &std::path::Path, settings: &ConversionSettings) -> bool {
        self.path == path && self.settings == *settings
    }
}

impl Slot for AssetResource {
    fn is_live(&self) -> bool {
        self.ref_count > 0
    }
}
