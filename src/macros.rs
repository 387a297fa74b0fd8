//! Macros for code generation in catalog types.
//!
//! The S-57 object and attribute catalogs are long, static code tables. This
//! module provides [`catalog_enum!`](crate::catalog_enum), which turns such a
//! table into a closed enum with an explicit `Unknown(code)` variant plus its
//! lookup methods, so the table is written once and never re-resolved at
//! query time.

/// Generate a catalog enum from a static code table.
///
/// Each entry is `Variant = code, "ACRONYM", "Name", extra;`. The generated
/// enum gets:
///
/// - `from_code(u16)` (unknown codes map to `Unknown(code)`)
/// - `code()`, `acronym()`, `name()`, `is_known()`
/// - `from_acronym(&str)`, which also parses the `unknown(n)` sentinel
/// - the per-entry `extra` value through the named accessor
/// - `Display` (the acronym) and `Serialize` (the acronym as a string)
///
/// # Example
///
/// ```ignore
/// catalog_enum! {
///     /// Colours
///     Colour, "colour", rgb -> u32 = 0;
///     Red = 1, "RED", "Red", 0xFF0000;
///     Green = 2, "GREEN", "Green", 0x00FF00;
/// }
///
/// assert_eq!(Colour::from_code(2).acronym(), "GREEN");
/// assert_eq!(Colour::from_code(9).acronym(), "unknown(9)");
/// ```
#[macro_export]
macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        $enum:ident, $label:literal, $extra_fn:ident -> $extra_ty:ty = $unknown_extra:expr;
        $( $variant:ident = $code:literal, $acronym:literal, $name:literal, $extra:expr; )+
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $enum {
            $(
                #[doc = $name]
                $variant,
            )+
            /// A code missing from the catalog.
            Unknown(u16),
        }

        impl $enum {
            /// Every known entry, in code order.
            pub const ALL: &'static [$enum] = &[$($enum::$variant),+];

            #[doc = concat!("Resolve a numeric ", $label, " code.")]
            #[must_use]
            pub fn from_code(code: u16) -> Self {
                match code {
                    $( $code => $enum::$variant, )+
                    other => $enum::Unknown(other),
                }
            }

            /// The numeric code.
            #[must_use]
            pub fn code(self) -> u16 {
                match self {
                    $( $enum::$variant => $code, )+
                    $enum::Unknown(code) => code,
                }
            }

            /// The six-character acronym, or `unknown(code)`.
            #[must_use]
            pub fn acronym(self) -> ::std::borrow::Cow<'static, str> {
                match self {
                    $( $enum::$variant => ::std::borrow::Cow::Borrowed($acronym), )+
                    $enum::Unknown(code) => ::std::borrow::Cow::Owned(format!("unknown({code})")),
                }
            }

            /// The descriptive name.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $( $enum::$variant => $name, )+
                    $enum::Unknown(_) => concat!("Unknown ", $label),
                }
            }

            /// Whether the code is in the catalog.
            #[must_use]
            pub fn is_known(self) -> bool {
                !matches!(self, $enum::Unknown(_))
            }

            #[doc = concat!("Look up a ", $label, " by acronym. Accepts `unknown(n)`.")]
            #[must_use]
            pub fn from_acronym(acronym: &str) -> Option<Self> {
                ::lazy_static::lazy_static! {
                    static ref BY_ACRONYM: ::std::collections::HashMap<&'static str, $enum> = {
                        let mut map = ::std::collections::HashMap::new();
                        $( map.insert($acronym, $enum::$variant); )+
                        map
                    };
                }
                if let Some(found) = BY_ACRONYM.get(acronym) {
                    return Some(*found);
                }
                acronym
                    .strip_prefix("unknown(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .and_then(|digits| digits.parse::<u16>().ok())
                    .map($enum::from_code)
            }

            #[doc = concat!("Per-entry catalog data of this ", $label, ".")]
            #[must_use]
            pub fn $extra_fn(self) -> $extra_ty {
                match self {
                    $( $enum::$variant => $extra, )+
                    $enum::Unknown(_) => $unknown_extra,
                }
            }
        }

        impl ::std::fmt::Display for $enum {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.acronym())
            }
        }

        impl ::serde::Serialize for $enum {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.acronym())
            }
        }
    };
}
