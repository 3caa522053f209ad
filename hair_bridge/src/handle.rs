/// Resource handles
///
/// A handle is a small integer naming a slot in one of the context's resource
/// tables. Handles are stable for the table's lifetime: tables never shrink,
/// and a slot keeps its index when it is recycled for a new resource.

/// Sentinel value never used as a slot index
pub const NULL_HANDLE: u32 = u32::MAX;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// The null handle (returned by failed loads/creations)
            pub const NULL: Self = Self(NULL_HANDLE);

            /// Whether this is the null sentinel
            pub fn is_null(self) -> bool {
                self.0 == NULL_HANDLE
            }

            /// Slot index in the owning table
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Raw value as passed across the host boundary
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::NULL
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.is_null() {
                    write!(f, "{}(null)", $label)
                } else {
                    write!(f, "{}({})", $label, self.0)
                }
            }
        }
    };
}

define_handle!(
    /// Handle to a pixel shader slot
    ShaderHandle, "shader"
);

define_handle!(
    /// Handle to a hair asset slot
    AssetHandle, "asset"
);

define_handle!(
    /// Handle to a hair instance slot
    InstanceHandle, "instance"
);
