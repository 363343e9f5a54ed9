//! Declared field types and the typed write into a target field.

use std::any::{type_name, Any};
use std::sync::Arc;

use super::{FieldError, Injected};

/// The kind of value a field declares.
#[derive(Debug, Clone, Copy)]
pub enum TypeDescriptor {
    Int,
    Long,
    Bool,
    Str,
    Enum(EnumDescriptor),
    /// A shared handle to an open type, typically `Arc<dyn Trait>`.
    Interface(&'static str),
    /// Declared but not injectable; rejected at discovery.
    Unsupported(&'static str),
}

impl TypeDescriptor {
    pub fn is_supported(&self) -> bool {
        !matches!(self, TypeDescriptor::Unsupported(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeDescriptor::Int => "int",
            TypeDescriptor::Long => "long",
            TypeDescriptor::Bool => "bool",
            TypeDescriptor::Str => "string",
            TypeDescriptor::Enum(e) => e.name(),
            TypeDescriptor::Interface(name) | TypeDescriptor::Unsupported(name) => *name,
        }
    }
}

/// A fieldless enum whose variants can be addressed by name.
///
/// Usually implemented through [`injectable_enum!`](crate::injectable_enum).
pub trait InjectableEnum: Sized + Send + Sync + 'static {
    const NAME: &'static str;

    /// Variant names, in declaration order.
    const VARIANTS: &'static [&'static str];

    fn ordinal(&self) -> usize;

    fn from_ordinal(ordinal: usize) -> Option<Self>;
}

/// Runtime view of an [`InjectableEnum`].
#[derive(Clone, Copy)]
pub struct EnumDescriptor {
    name: &'static str,
    variants: &'static [&'static str],
    ordinal_of: fn(&(dyn Any + Send + Sync)) -> Option<usize>,
}

impl EnumDescriptor {
    pub fn of<E: InjectableEnum>() -> Self {
        Self {
            name: E::NAME,
            variants: E::VARIANTS,
            ordinal_of: ordinal_of::<E>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    /// Ordinal of `value` if it already is a variant of this enum.
    pub fn ordinal_of(&self, value: &(dyn Any + Send + Sync)) -> Option<usize> {
        (self.ordinal_of)(value)
    }

    /// Ordinal of the variant named exactly `name`.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| *v == name)
    }
}

impl std::fmt::Debug for EnumDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumDescriptor")
            .field("name", &self.name)
            .field("variants", &self.variants)
            .finish_non_exhaustive()
    }
}

fn ordinal_of<E: InjectableEnum>(value: &(dyn Any + Send + Sync)) -> Option<usize> {
    value.downcast_ref::<E>().map(E::ordinal)
}

/// A Rust type that can back an injectable field.
pub trait FieldValue: Sized + 'static {
    fn descriptor() -> TypeDescriptor;

    /// Builds the field value from a converted parameter.
    fn from_injected(value: Injected) -> Result<Self, FieldError>;
}

fn mismatch<T: FieldValue>(found: &Injected) -> FieldError {
    FieldError::TypeMismatch {
        expected: T::descriptor().name(),
        found: found.kind(),
    }
}

impl FieldValue for i32 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Int
    }

    fn from_injected(value: Injected) -> Result<Self, FieldError> {
        match value {
            Injected::Int(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FieldValue for i64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Long
    }

    fn from_injected(value: Injected) -> Result<Self, FieldError> {
        match value {
            Injected::Long(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FieldValue for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Bool
    }

    fn from_injected(value: Injected) -> Result<Self, FieldError> {
        match value {
            Injected::Bool(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FieldValue for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Str
    }

    fn from_injected(value: Injected) -> Result<Self, FieldError> {
        match value {
            Injected::Text(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

/// An optional field has the kind of its inner type; a write always stores `Some`.
impl<T: FieldValue> FieldValue for Option<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }

    fn from_injected(value: Injected) -> Result<Self, FieldError> {
        T::from_injected(value).map(Some)
    }
}

/// Shared handles are interface fields: the raw object must already be an `Arc<T>`.
impl<T: ?Sized + Send + Sync + 'static> FieldValue for Arc<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Interface(type_name::<T>())
    }

    fn from_injected(value: Injected) -> Result<Self, FieldError> {
        match &value {
            Injected::Object(object) => object
                .downcast_ref::<Arc<T>>()
                .cloned()
                .ok_or_else(|| mismatch::<Self>(&value)),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

/// Helper for [`injectable_enum!`](crate::injectable_enum).
#[doc(hidden)]
pub fn enum_from_injected<E: InjectableEnum + FieldValue>(value: Injected) -> Result<E, FieldError> {
    match value {
        Injected::Variant(ordinal) => E::from_ordinal(ordinal).ok_or(FieldError::TypeMismatch {
            expected: E::NAME,
            found: "out-of-range variant",
        }),
        other => Err(mismatch::<E>(&other)),
    }
}

macro_rules! unsupported_field {
    ($($ty:ty),+ $(,)?) => {
        $(
        impl FieldValue for $ty {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::Unsupported(type_name::<Self>())
            }

            fn from_injected(value: Injected) -> Result<Self, FieldError> {
                Err(mismatch::<Self>(&value))
            }
        }
        )+
    };
}

unsupported_field!(f32, f64, char, u32, u64, usize);

impl<T: 'static> FieldValue for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Unsupported(type_name::<Self>())
    }

    fn from_injected(value: Injected) -> Result<Self, FieldError> {
        Err(mismatch::<Self>(&value))
    }
}

type Writer<T> = Arc<dyn Fn(&mut T, Injected) -> Result<(), FieldError> + Send + Sync>;

/// Write access to one field of `T`, together with its declared type.
pub struct FieldHandle<T> {
    field: &'static str,
    declared: TypeDescriptor,
    write: Writer<T>,
}

impl<T> Clone for FieldHandle<T> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            declared: self.declared,
            write: Arc::clone(&self.write),
        }
    }
}

impl<T: 'static> FieldHandle<T> {
    /// Handle over the field reached through `accessor`.
    pub fn of<F: FieldValue>(field: &'static str, accessor: fn(&mut T) -> &mut F) -> Self {
        Self {
            field,
            declared: F::descriptor(),
            write: Arc::new(move |target: &mut T, value: Injected| {
                *accessor(target) = F::from_injected(value)?;
                Ok(())
            }),
        }
    }

    /// Handle with an explicit declared type and a custom writer.
    pub fn new<W>(field: &'static str, declared: TypeDescriptor, write: W) -> Self
    where
        W: Fn(&mut T, Injected) -> Result<(), FieldError> + Send + Sync + 'static,
    {
        Self {
            field,
            declared,
            write: Arc::new(write),
        }
    }

    /// Re-targets this handle at the enclosing type `U`.
    pub fn project<U: 'static>(self, accessor: fn(&mut U) -> &mut T) -> FieldHandle<U> {
        let write = self.write;
        FieldHandle {
            field: self.field,
            declared: self.declared,
            write: Arc::new(move |target: &mut U, value: Injected| write(accessor(target), value)),
        }
    }
}

impl<T> FieldHandle<T> {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn declared_type(&self) -> &TypeDescriptor {
        &self.declared
    }

    pub fn write(&self, target: &mut T, value: Injected) -> Result<(), FieldError> {
        (self.write)(target, value)
    }
}

impl<T> std::fmt::Debug for FieldHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldHandle")
            .field("field", &self.field)
            .field("declared", &self.declared)
            .finish_non_exhaustive()
    }
}
