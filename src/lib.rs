//! Populates the marked fields of plain structs from a flat, string-keyed
//! parameter map.
//!
//! A type lists its injectable fields and their logical names with
//! [`injectable!`]; a name may embed one `${var}` placeholder that is itself
//! looked up in the parameter map. Values are coerced to the declared field
//! type (int, long, bool, enum, interface, or string). Missing or
//! unconvertible parameters leave fields untouched.

pub mod config;
mod error;
pub mod inject;
mod value;

pub use config::{Config, ConfigError, ParameterMap};
pub use error::Error;
pub use inject::{
    inject, inject_with_report, Converter, EnumDescriptor, FieldError, FieldHandle, FieldInjector,
    FieldValue, InjectError, Injectable, InjectableEnum, Injected, Level, NameTemplate, Outcome,
    Parameters, Registry, TypeDescriptor,
};
pub use value::Value;
