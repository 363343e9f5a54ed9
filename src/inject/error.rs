use thiserror::Error;

/// Raised while building the injector list of a type.
///
/// Discovery happens inline on the first injection of a type, so this error
/// reaches the caller of [`inject`](crate::inject) for that type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InjectError {
    #[error(
        "unsupported type for injectable field '{field}' ({name}) of {owner}: {type_name}; \
         expected int, long, bool, enum, interface or string"
    )]
    UnsupportedType {
        owner: &'static str,
        field: &'static str,
        name: String,
        type_name: &'static str,
    },
}

/// Per-field failure. Never escapes [`inject`](crate::inject); surfaced only
/// through [`Outcome::Failed`](crate::Outcome::Failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FieldError {
    #[error("no variant named '{value}' in enum {enum_name}")]
    UnknownVariant {
        enum_name: &'static str,
        value: String,
    },

    #[error("cannot write a {found} value into a field of type {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}
