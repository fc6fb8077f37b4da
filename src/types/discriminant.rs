//! Closed integer enumerations stored as `u32` record fields.
//!
//! Every enumeration in the record is declared through [`discriminant_enum!`],
//! which keeps the wire value next to each variant and gives all of them the
//! same lossless decode: a value outside the defined set becomes
//! `Unknown(raw)` instead of failing, so readers never crash on a record
//! written by a newer producer.

/// Declare a closed enumeration with explicit wire discriminants.
macro_rules! discriminant_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal => $label:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[cfg_attr(feature = "tauri", derive(specta::Type))]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A value outside the defined set; the raw field value is retained.
            Unknown(u32),
        }

        impl $name {
            /// Every defined discriminant in wire order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Decode a raw field value. Values outside the set map to `Unknown`.
            pub const fn from_raw(raw: u32) -> Self {
                match raw {
                    $($value => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }

            /// The value stored in the record for this variant.
            pub const fn raw(self) -> u32 {
                match self {
                    $($name::$variant => $value,)+
                    $name::Unknown(raw) => raw,
                }
            }

            /// Returns false for values this build does not define.
            pub const fn is_known(self) -> bool {
                !matches!(self, $name::Unknown(_))
            }

            /// Constant name as written in the C header.
            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unknown(_) => "UNKNOWN",
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::from_raw(0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self::from_raw(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> Self {
                value.raw()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $name::Unknown(raw) => write!(f, "UNKNOWN({raw})"),
                    known => f.write_str(known.label()),
                }
            }
        }
    };
}

pub(crate) use discriminant_enum;
