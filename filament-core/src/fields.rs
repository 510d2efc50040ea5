//! Accessor adapter.
//!
//! Backs named fields of a host object with reactive variables, giving them
//! conventional get/set semantics while making reads trackable. The adapter
//! is a consumer of the engine, not part of it: it touches nothing but
//! [`create_variable`] and [`untrack`].
//!
//! A field is described by a [`FieldSpec`]: a name plus read and write
//! accessors against the host. Only fully paired specs can be bound.
//! Following the configuration-warning policy, [`bind_fields`] logs and
//! skips a partially paired spec instead of failing the batch; the host
//! field is simply left non-reactive.

use thiserror::Error;
use tracing::warn;

use crate::reactive::{create_variable, untrack, Variable};

type ReadAccessor<O, T> = Box<dyn Fn(&O) -> T + Send + Sync>;
type WriteAccessor<O, T> = Box<dyn Fn(&mut O, T) + Send + Sync>;

/// A named accessor pair against a host of type `O`.
pub struct FieldSpec<O, T> {
    name: &'static str,
    read: Option<ReadAccessor<O, T>>,
    write: Option<WriteAccessor<O, T>>,
}

impl<O, T> FieldSpec<O, T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            read: None,
            write: None,
        }
    }

    pub fn with_read<F>(mut self, read: F) -> Self
    where
        F: Fn(&O) -> T + Send + Sync + 'static,
    {
        self.read = Some(Box::new(read));
        self
    }

    pub fn with_write<F>(mut self, write: F) -> Self
    where
        F: Fn(&mut O, T) + Send + Sync + 'static,
    {
        self.write = Some(Box::new(write));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Why a field spec could not be bound.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field `{0}` has no read accessor")]
    NotReadable(&'static str),

    #[error("field `{0}` has no write accessor")]
    NotWritable(&'static str),
}

/// A host field backed by a privately held variable.
///
/// Reads go through the variable and are tracked like any variable read;
/// writes propagate synchronously. [`flush`](ReactiveField::flush) pushes
/// the current value back into the host through its original setter.
pub struct ReactiveField<O, T>
where
    T: Clone + Send + Sync + 'static,
{
    name: &'static str,
    variable: Variable<T>,
    write_back: WriteAccessor<O, T>,
}

impl<O, T> ReactiveField<O, T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tracked read of the field's current value.
    pub fn get(&self) -> T {
        self.variable.get()
    }

    /// Store a new value and propagate to subscribers.
    pub fn set(&self, value: T) {
        self.variable.set(value);
    }

    /// Write the current value back into the host through its setter.
    pub fn flush(&self, host: &mut O) {
        (self.write_back)(host, self.variable.get_untracked());
    }
}

impl<O, T> std::fmt::Debug for ReactiveField<O, T>
where
    T: Clone + Send + Sync + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveField")
            .field("name", &self.name)
            .field("value", &self.variable.get_untracked())
            .finish()
    }
}

/// Back one accessor pair with a variable.
///
/// The seed value is read from the host through `untrack`, so installing a
/// field never registers a dependency edge for an enclosing computation. A
/// spec missing either accessor is rejected.
pub fn bind_field<O, T>(host: &O, spec: FieldSpec<O, T>) -> Result<ReactiveField<O, T>, FieldError>
where
    T: Clone + Send + Sync + 'static,
{
    let FieldSpec { name, read, write } = spec;
    let read = read.ok_or(FieldError::NotReadable(name))?;
    let write = write.ok_or(FieldError::NotWritable(name))?;

    let initial = untrack(|| read(host));
    Ok(ReactiveField {
        name,
        variable: create_variable(initial),
        write_back: write,
    })
}

/// Bind every fully paired spec in `specs`.
///
/// Partially paired accessors are not errors at this level: each one is
/// logged as a diagnostic and skipped, leaving the host field unmodified.
pub fn bind_fields<O, T>(host: &O, specs: Vec<FieldSpec<O, T>>) -> Vec<ReactiveField<O, T>>
where
    T: Clone + Send + Sync + 'static,
{
    let mut bound = Vec::with_capacity(specs.len());
    for spec in specs {
        let name = spec.name();
        match bind_field(host, spec) {
            Ok(field) => bound.push(field),
            Err(error) => warn!(field = name, %error, "field left non-reactive"),
        }
    }
    bound
}
