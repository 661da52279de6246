/*++

Licensed under the Apache-2.0 license.

File Name:

    macros.rs

Abstract:

    Macros used by the project

--*/

/// Declares an enum that maps a closed set of integer values onto named
/// variants. Values outside the set are preserved in the `$invalid` variant,
/// so conversions in both directions are total.
#[macro_export]
macro_rules! emu_enum {
    (
        $(#[$($enum_attrs:tt)*])*
        $vis:vis $enum_name:ident;
        $type:ty;
        {
            $(
                $(#[$($attrs:tt)*])*
                $name:ident = $value:literal,
            )*
        };
        $invalid:ident
    ) => {
        $(#[$($enum_attrs)*])*
        $vis enum $enum_name {
            $(
                $(#[$($attrs)*])*
                $name,
            )*
            $invalid($type),
        }

        impl From<$enum_name> for $type {
            fn from(val: $enum_name) -> $type {
                match val {
                    $($enum_name::$name => $value,)*
                    $enum_name::$invalid(raw) => raw,
                }
            }
        }

        impl From<$type> for $enum_name {
            fn from(val: $type) -> $enum_name {
                match val {
                    $($value => $enum_name::$name,)*
                    raw => $enum_name::$invalid(raw),
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                match self {
                    $($enum_name::$name => write!(f, stringify!($name)),)*
                    $enum_name::$invalid(raw) => write!(f, "{}({})", stringify!($invalid), raw),
                }
            }
        }
    };
}
