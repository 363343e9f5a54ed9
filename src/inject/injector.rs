use super::{convert, FieldError, FieldHandle, NameTemplate, Parameters};

/// What happened to one field during an injection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The field now holds the converted value found at `key`.
    Written { field: &'static str, key: String },
    /// No parameter exists at `key`.
    Missing { field: &'static str, key: String },
    /// The parameter exists but has no form the field can hold.
    Unconverted { field: &'static str, key: String },
    /// Conversion or write failed; the field keeps its previous value.
    Failed {
        field: &'static str,
        key: String,
        error: FieldError,
    },
}

impl Outcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Outcome::Written { .. })
    }

    pub fn key(&self) -> &str {
        match self {
            Outcome::Written { key, .. }
            | Outcome::Missing { key, .. }
            | Outcome::Unconverted { key, .. }
            | Outcome::Failed { key, .. } => key,
        }
    }
}

/// Resolves, converts, and writes one marked field of `T`.
pub struct FieldInjector<T> {
    template: NameTemplate,
    field: FieldHandle<T>,
}

impl<T> std::fmt::Debug for FieldInjector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldInjector")
            .field("template", &self.template)
            .field("field", &self.field)
            .finish()
    }
}

impl<T> Clone for FieldInjector<T> {
    fn clone(&self) -> Self {
        Self {
            template: self.template.clone(),
            field: self.field.clone(),
        }
    }
}

impl<T: 'static> FieldInjector<T> {
    /// Re-targets this injector at the enclosing type `U`.
    pub(crate) fn project<U: 'static>(self, accessor: fn(&mut U) -> &mut T) -> FieldInjector<U> {
        FieldInjector {
            template: self.template,
            field: self.field.project(accessor),
        }
    }
}

impl<T> FieldInjector<T> {
    /// The logical name is parsed here, once.
    pub fn new(name: impl Into<String>, field: FieldHandle<T>) -> Self {
        Self {
            template: NameTemplate::parse(name),
            field,
        }
    }

    pub fn template(&self) -> &NameTemplate {
        &self.template
    }

    pub fn field(&self) -> &FieldHandle<T> {
        &self.field
    }

    /// Applies this injector to `target`.
    ///
    /// Never fails: every problem is reported in the returned [`Outcome`]
    /// and leaves the field at its previous value.
    pub fn apply<P>(&self, target: &mut T, parameters: &P) -> Outcome
    where
        P: Parameters + ?Sized,
    {
        let field = self.field.field();
        let key = self.template.resolve(parameters).into_owned();

        let Some(raw) = parameters.lookup(&key) else {
            return Outcome::Missing { field, key };
        };

        let value = match convert(self.field.declared_type(), raw) {
            Ok(Some(value)) => value,
            Ok(None) => return Outcome::Unconverted { field, key },
            Err(error) => return Outcome::Failed { field, key, error },
        };

        match self.field.write(target, value) {
            Ok(()) => Outcome::Written { field, key },
            Err(error) => Outcome::Failed { field, key, error },
        }
    }
}
