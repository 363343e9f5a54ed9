//! Per-type discovery of injectable fields and the process-wide cache of the
//! resulting injector lists.
//!
//! A type describes one level of its chain in [`Injectable::describe`]: its own
//! marked fields in declaration order and, optionally, the embedded parent it
//! extends. Discovery flattens the chain from the most-derived level upwards.
//! Fields repeated across levels are kept, so the ancestor's injector runs
//! last.

use std::any::{type_name, Any, TypeId};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use once_cell::sync::Lazy;

use super::{FieldHandle, FieldInjector, FieldValue, InjectError, Outcome, Parameters};

/// A type whose fields can be populated from a parameter map.
///
/// Usually implemented through [`injectable!`](crate::injectable).
pub trait Injectable: Sized + 'static {
    fn describe(level: &mut Level<Self>);
}

type Ancestors<T> = Box<dyn FnOnce() -> Result<Vec<FieldInjector<T>>, InjectError>>;

/// One level of a type chain, as declared by [`Injectable::describe`].
pub struct Level<T> {
    fields: Vec<(String, FieldHandle<T>)>,
    ancestors: Option<Ancestors<T>>,
}

impl<T: 'static> Level<T> {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            ancestors: None,
        }
    }

    /// Marks the field reached through `accessor` as injectable under `name`.
    pub fn field<F: FieldValue>(
        &mut self,
        field: &'static str,
        name: impl Into<String>,
        accessor: fn(&mut T) -> &mut F,
    ) -> &mut Self {
        self.fields
            .push((name.into(), FieldHandle::of(field, accessor)));
        self
    }

    /// Marks a field through a prepared handle.
    pub fn handle(&mut self, name: impl Into<String>, handle: FieldHandle<T>) -> &mut Self {
        self.fields.push((name.into(), handle));
        self
    }

    /// Declares the parent level. Its complete chain is discovered after this
    /// level's fields, with every write going through `accessor`.
    pub fn extends<P: Injectable>(&mut self, accessor: fn(&mut T) -> &mut P) -> &mut Self {
        self.ancestors = Some(Box::new(move || {
            Ok(discover::<P>()?
                .into_iter()
                .map(|injector| injector.project(accessor))
                .collect())
        }));
        self
    }
}

/// Builds the injector list of `T` without touching any cache.
pub fn discover<T: Injectable>() -> Result<Vec<FieldInjector<T>>, InjectError> {
    let mut level = Level::new();
    T::describe(&mut level);

    let mut injectors = Vec::with_capacity(level.fields.len());
    for (name, handle) in level.fields {
        let declared = handle.declared_type();
        if !declared.is_supported() {
            return Err(InjectError::UnsupportedType {
                owner: type_name::<T>(),
                field: handle.field(),
                name,
                type_name: declared.name(),
            });
        }
        injectors.push(FieldInjector::new(name, handle));
    }

    if let Some(ancestors) = level.ancestors {
        injectors.extend(ancestors()?);
    }
    Ok(injectors)
}

type Entry = Arc<dyn Any + Send + Sync>;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// Cache of injector lists, keyed by target type.
///
/// Entries are built once and never evicted: the set of injectable types in
/// a process is bounded and fixed.
#[derive(Default)]
pub struct Registry {
    entries: DashMap<TypeId, Entry>,
    build: Mutex<()>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry used by [`inject`](crate::inject).
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Returns the injector list of `T`, discovering it on first use.
    ///
    /// Concurrent first requests are serialised by one lock shared by all
    /// types; the list is published whole. A failed discovery caches nothing.
    pub fn injectors<T: Injectable>(&self) -> Result<Arc<Vec<FieldInjector<T>>>, InjectError> {
        if let Some(injectors) = self.cached::<T>() {
            return Ok(injectors);
        }

        let _guard = self.build.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(injectors) = self.cached::<T>() {
            return Ok(injectors);
        }

        let injectors = Arc::new(discover::<T>()?);
        tracing::debug!(
            target_type = type_name::<T>(),
            fields = injectors.len(),
            "discovered injectable fields"
        );
        self.entries
            .insert(TypeId::of::<T>(), Arc::clone(&injectors) as Entry);
        Ok(injectors)
    }

    fn cached<T: Injectable>(&self) -> Option<Arc<Vec<FieldInjector<T>>>> {
        let entry = Arc::clone(self.entries.get(&TypeId::of::<T>())?.value());
        entry.downcast().ok()
    }

    pub fn contains<T: Injectable>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Populates `target` from `parameters`.
    ///
    /// Only discovery can fail. Per-field problems are logged and skipped.
    pub fn inject<T, P>(&self, target: &mut T, parameters: &P) -> Result<(), InjectError>
    where
        T: Injectable,
        P: Parameters + ?Sized,
    {
        for injector in self.injectors::<T>()?.iter() {
            log_outcome(&injector.apply(target, parameters));
        }
        Ok(())
    }

    /// Like [`inject`](Self::inject), returning the outcome of every field in
    /// application order.
    pub fn inject_with_report<T, P>(
        &self,
        target: &mut T,
        parameters: &P,
    ) -> Result<Vec<Outcome>, InjectError>
    where
        T: Injectable,
        P: Parameters + ?Sized,
    {
        Ok(self
            .injectors::<T>()?
            .iter()
            .map(|injector| {
                let outcome = injector.apply(target, parameters);
                log_outcome(&outcome);
                outcome
            })
            .collect())
    }
}

fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Written { .. } => {}
        Outcome::Missing { field, key } => {
            tracing::trace!(field, key = key.as_str(), "no parameter for field");
        }
        Outcome::Unconverted { field, key } => {
            tracing::trace!(field, key = key.as_str(), "parameter not convertible to field type");
        }
        Outcome::Failed { field, key, error } => {
            tracing::debug!(field, key = key.as_str(), %error, "field injection skipped");
        }
    }
}
