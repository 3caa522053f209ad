/// Pixel shader slot

use std::path::PathBuf;

use crate::graphics_device::PixelShader;
use crate::resource::Slot;

/// A pixel shader loaded from a compiled shader file
///
/// An empty slot has `ref_count == 0` and no native shader.
#[derive(Debug, Default)]
pub struct ShaderResource {
    pub path: PathBuf,
    pub shader: Option<PixelShader>,
    pub ref_count: u32,
}

impl Slot for ShaderResource {
    fn is_live(&self) -> bool {
        self.ref_count > 0
    }
}
