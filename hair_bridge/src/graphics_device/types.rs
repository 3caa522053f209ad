/// Native object identifiers and descriptors for the graphics device
///
/// Native objects are owned by the host's graphics API. The plugin only sees
/// them as opaque identities: two values compare equal exactly when they name
/// the same native object (pointer-equality semantics).

macro_rules! native_object {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw native identity (address of the native object)
            pub fn raw(self) -> u64 {
                self.0
            }
        }
    };
}

native_object!(
    /// The host's graphics device
    NativeDevice
);
native_object!(
    /// The device's immediate context
    NativeDeviceContext
);
native_object!(
    /// A 2D/cube texture resource handed over by the host
    NativeTexture
);
native_object!(
    /// A GPU buffer (host shadow parameters or the plugin's constant buffer)
    NativeBuffer
);
native_object!(
    /// A compiled pixel shader
    PixelShader
);
native_object!(
    /// A shader-resource view over a texture
    ShaderResourceView
);
native_object!(
    /// A render-target view over a texture
    RenderTargetView
);
native_object!(
    /// A depth-stencil view over a depth texture
    DepthStencilView
);
native_object!(
    /// A depth-stencil state object
    DepthStencilState
);
native_object!(
    /// A sampler state object
    SamplerState
);

// ===== TEXTURES =====

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    Unknown,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R16G16B16A16_FLOAT,
    R32_FLOAT,
    R32_TYPELESS,
    BC1_UNORM,
    BC3_UNORM,
}

/// Read-only properties of a native texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub mip_levels: u32,
}

/// Dimension of a shader-resource view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDimension {
    Texture2D,
    TextureCube,
}

/// Explicit shader-resource view description
///
/// Passing `None` instead of a description lets the device derive the view
/// from the texture itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDesc {
    pub dimension: ViewDimension,
    pub format: TextureFormat,
    pub most_detailed_mip: u32,
    pub mip_levels: u32,
}

impl ViewDesc {
    /// 2D view covering every mip of a texture
    pub fn texture_2d(info: &TextureInfo) -> Self {
        Self {
            dimension: ViewDimension::Texture2D,
            format: info.format,
            most_detailed_mip: 0,
            mip_levels: info.mip_levels,
        }
    }

    /// Cube view covering every mip of a texture
    pub fn texture_cube(info: &TextureInfo) -> Self {
        Self {
            dimension: ViewDimension::TextureCube,
            format: info.format,
            most_detailed_mip: 0,
            mip_levels: info.mip_levels,
        }
    }

    /// Single-mip R32_FLOAT view used to sample a copied shadow map
    pub fn shadow_map() -> Self {
        Self {
            dimension: ViewDimension::Texture2D,
            format: TextureFormat::R32_FLOAT,
            most_detailed_mip: 0,
            mip_levels: 1,
        }
    }
}

// ===== PIPELINE STATE =====

/// Comparison function for depth tests and comparison samplers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonFunc {
    Never,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Always,
}

/// Depth-stencil state description (stencil is always disabled)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilDesc {
    pub depth_enable: bool,
    pub depth_write: bool,
    pub depth_func: ComparisonFunc,
}

impl DepthStencilDesc {
    /// Depth test LESS with writes enabled
    pub fn standard() -> Self {
        Self {
            depth_enable: true,
            depth_write: true,
            depth_func: ComparisonFunc::Less,
        }
    }

    /// Depth test GREATER with writes enabled, for reversed-Z depth buffers
    pub fn reversed_z() -> Self {
        Self {
            depth_func: ComparisonFunc::Greater,
            ..Self::standard()
        }
    }
}

/// Texture filtering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    MinMagMipLinear,
    ComparisonMinMagMipPoint,
}

/// Texture addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    Wrap,
    Clamp,
}

/// Sampler state description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDesc {
    pub filter: Filter,
    pub address: AddressMode,
    pub comparison: ComparisonFunc,
    pub max_anisotropy: u32,
}

impl SamplerDesc {
    /// Trilinear wrap sampler for hair textures
    pub fn linear_wrap() -> Self {
        Self {
            filter: Filter::MinMagMipLinear,
            address: AddressMode::Wrap,
            comparison: ComparisonFunc::Always,
            max_anisotropy: 1,
        }
    }

    /// Point comparison sampler for the copied shadow map
    pub fn shadow_comparison() -> Self {
        Self {
            filter: Filter::ComparisonMinMagMipPoint,
            address: AddressMode::Clamp,
            comparison: ComparisonFunc::Greater,
            max_anisotropy: 0,
        }
    }
}
