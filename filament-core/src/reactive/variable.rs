//! Reactive variables: the public handle over a signal.
//!
//! [`Variable`] exposes the cell with both naming conventions (`get`/`set`
//! and `read`/`write`) and can be decomposed into a `(ReadHandle,
//! WriteHandle)` pair to hand out read-only or write-only capability. All
//! handles are cheap clones sharing one cell.

use std::fmt::Debug;

use super::signal::Signal;

/// Create a reactive variable holding `initial`.
///
/// Reads inside a running computation register a dependency edge; writes
/// synchronously re-run every subscriber before returning.
pub fn create_variable<T>(initial: T) -> Variable<T>
where
    T: Clone + Send + Sync + 'static,
{
    Variable::new(initial)
}

/// A mutable observable value cell.
pub struct Variable<T>
where
    T: Clone + Send + Sync + 'static,
{
    signal: Signal<T>,
}

impl<T> Variable<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            signal: Signal::new(initial),
        }
    }

    /// Read the current value, registering a dependency edge if a
    /// computation is active.
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// Alias for [`get`](Variable::get).
    pub fn read(&self) -> T {
        self.signal.get()
    }

    /// Read without registering a dependency edge.
    pub fn get_untracked(&self) -> T {
        self.signal.get_untracked()
    }

    /// Store `value` and propagate synchronously. Every explicit write
    /// notifies, even if the value is unchanged.
    pub fn set(&self, value: T) {
        self.signal.set(value);
    }

    /// Alias for [`set`](Variable::set).
    pub fn write(&self, value: T) {
        self.signal.set(value);
    }

    /// Read-modify-write convenience. Always notifies.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        self.signal.update(f);
    }

    /// Decompose into a read-only and a write-only capability handle.
    pub fn split(&self) -> (ReadHandle<T>, WriteHandle<T>) {
        (self.reader(), self.writer())
    }

    /// A read-only handle to the same cell.
    pub fn reader(&self) -> ReadHandle<T> {
        ReadHandle {
            signal: self.signal.clone(),
        }
    }

    /// A write-only handle to the same cell.
    pub fn writer(&self) -> WriteHandle<T> {
        WriteHandle {
            signal: self.signal.clone(),
        }
    }

    /// Number of computations currently subscribed.
    pub fn subscriber_count(&self) -> usize {
        self.signal.subscriber_count()
    }
}

impl<T> Clone for Variable<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
        }
    }
}

impl<T> Debug for Variable<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variable")
            .field("signal", &self.signal)
            .finish()
    }
}

/// Read-only capability over a variable's cell.
pub struct ReadHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    signal: Signal<T>,
}

impl<T> ReadHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Tracked read, like [`Variable::get`].
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// Alias for [`get`](ReadHandle::get).
    pub fn read(&self) -> T {
        self.signal.get()
    }

    /// Read without registering a dependency edge.
    pub fn get_untracked(&self) -> T {
        self.signal.get_untracked()
    }
}

impl<T> Clone for ReadHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
        }
    }
}

/// Write-only capability over a variable's cell.
pub struct WriteHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    signal: Signal<T>,
}

impl<T> WriteHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Store and propagate, like [`Variable::set`].
    pub fn set(&self, value: T) {
        self.signal.set(value);
    }

    /// Alias for [`set`](WriteHandle::set).
    pub fn write(&self, value: T) {
        self.signal.set(value);
    }

    /// Read-modify-write through the write capability. Always notifies.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        self.signal.update(f);
    }
}

impl<T> Clone for WriteHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
        }
    }
}
