/// Implements [`Injectable`](crate::Injectable) for a struct from a list of
/// `field => "logical name"` pairs, in declaration order.
///
/// An optional trailing `extends field: Parent` names the embedded parent
/// whose own marked fields are applied after these.
///
/// ```
/// use prop_inject::{inject, injectable};
/// use std::collections::HashMap;
///
/// #[derive(Default)]
/// struct Pool {
///     size: i32,
/// }
///
/// #[derive(Default)]
/// struct Database {
///     pool: Pool,
///     url: String,
/// }
///
/// injectable!(Pool { size => "pool.size" });
/// injectable!(Database { url => "db.${env}.url" } extends pool: Pool);
///
/// let params = HashMap::from([
///     ("env", "prod"),
///     ("db.prod.url", "postgres://db"),
///     ("pool.size", "8"),
/// ]);
/// let mut db = Database::default();
/// inject(&mut db, &params)?;
/// assert_eq!(db.url, "postgres://db");
/// assert_eq!(db.pool.size, 8);
/// # Ok::<(), prop_inject::InjectError>(())
/// ```
#[macro_export]
macro_rules! injectable {
    ($Type:ty { $($field:ident => $name:expr),* $(,)? } $(extends $parent:ident : $Parent:ty)?) => {
        impl $crate::Injectable for $Type {
            #[allow(unused_variables)]
            fn describe(level: &mut $crate::Level<Self>) {
                $( level.field(stringify!($field), $name, |target| &mut target.$field); )*
                $( level.extends::<$Parent>(|target| &mut target.$parent); )?
            }
        }
    };
}

/// Defines a fieldless enum usable as an injectable field type.
///
/// Variants are matched by their exact identifier.
#[macro_export]
macro_rules! injectable_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $Enum:ident {
            $($(#[$vmeta:meta])* $Variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $Enum {
            $($(#[$vmeta])* $Variant),+
        }

        impl $crate::InjectableEnum for $Enum {
            const NAME: &'static str = stringify!($Enum);
            const VARIANTS: &'static [&'static str] = &[$(stringify!($Variant)),+];

            fn ordinal(&self) -> usize {
                [$($Enum::$Variant),+]
                    .iter()
                    .position(|v| ::core::mem::discriminant(v) == ::core::mem::discriminant(self))
                    .unwrap_or_default()
            }

            fn from_ordinal(ordinal: usize) -> ::core::option::Option<Self> {
                [$($Enum::$Variant),+].into_iter().nth(ordinal)
            }
        }

        impl $crate::FieldValue for $Enum {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::Enum($crate::EnumDescriptor::of::<Self>())
            }

            fn from_injected(
                value: $crate::Injected,
            ) -> ::core::result::Result<Self, $crate::FieldError> {
                $crate::inject::enum_from_injected(value)
            }
        }
    };
}
