//! Field injection: discovery, name templates, conversion and writes.

mod convert;
mod error;
mod field;
mod injector;
mod macros;
mod registry;
mod template;

pub use convert::{convert, Converter, Injected, Object, Parameters};
pub use error::{FieldError, InjectError};
#[doc(hidden)]
pub use field::enum_from_injected;
pub use field::{EnumDescriptor, FieldHandle, FieldValue, InjectableEnum, TypeDescriptor};
pub use injector::{FieldInjector, Outcome};
pub use registry::{discover, Injectable, Level, Registry};
pub use template::NameTemplate;

pub(crate) use convert::{float_to_long, float_to_text};

/// Populates the marked fields of `target` from `parameters`.
///
/// The injector list of `T` is discovered on first use and cached for the
/// life of the process. The only error is a discovery failure; missing or
/// unconvertible parameters leave their fields untouched.
pub fn inject<T, P>(target: &mut T, parameters: &P) -> Result<(), InjectError>
where
    T: Injectable,
    P: Parameters + ?Sized,
{
    Registry::global().inject(target, parameters)
}

/// Like [`inject`], returning the outcome of every field.
pub fn inject_with_report<T, P>(target: &mut T, parameters: &P) -> Result<Vec<Outcome>, InjectError>
where
    T: Injectable,
    P: Parameters + ?Sized,
{
    Registry::global().inject_with_report(target, parameters)
}
