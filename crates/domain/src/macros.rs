//! Macro for implementing string conversions on wire enums
//!
//! The remote API spells enum values as fixed uppercase strings
//! (`"AMAZON_S3"`, `"INACTIVE"`, ...). This macro keeps the variant to
//! string mapping in one place and derives everything else from it.
//!
//! # Example
//!
//! ```rust
//! use feedlink_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Direction {
//!     Inbound,
//!     Outbound,
//! }
//!
//! impl_wire_enum_conversions!(Direction {
//!     Inbound => "INBOUND",
//!     Outbound => "OUTBOUND",
//! });
//!
//! assert_eq!(Direction::Inbound.as_str(), "INBOUND");
//! assert_eq!("OUTBOUND".parse::<Direction>(), Ok(Direction::Outbound));
//! ```

/// Implements `as_str`, `ALL`, Display, FromStr, Serialize and Deserialize
/// for a fieldless enum
///
/// # Features
///
/// - Exact, case-sensitive parsing: the wire format is not forgiving, so
///   neither is the parser
/// - Serde goes through the same table, so JSON and `to_string()` agree
/// - Descriptive error messages with the enum name
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }

        impl ::serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}
