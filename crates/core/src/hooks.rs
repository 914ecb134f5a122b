//! Priority-ordered callback lists used for every extension point.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Execution priority of a mod or hook callback; lower runs earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// Runs before everything else.
    pub const FIRST: Priority = Priority(-100);
    /// Runs before normal callbacks.
    pub const PRE: Priority = Priority(-10);
    /// Default priority.
    pub const NORMAL: Priority = Priority(0);
    /// Runs after normal callbacks.
    pub const POST: Priority = Priority(10);
    /// Runs after everything else.
    pub const LAST: Priority = Priority(100);
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NORMAL
    }
}

struct Entry<T: ?Sized> {
    callback: Arc<T>,
    priority: Priority,
}

struct Inner<T: ?Sized> {
    entries: Vec<Entry<T>>,
    dirty: bool,
}

/// An ordered list of callbacks.
///
/// Entries are sorted by priority the first time the list is read after an
/// [`add`](CallbackList::add). The sort is stable, so callbacks sharing a
/// priority keep their insertion order.
pub struct CallbackList<T: ?Sized> {
    inner: Mutex<Inner<T>>,
}

impl<T: ?Sized> CallbackList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: Vec::new(),
                dirty: false,
            }),
        }
    }

    /// Appends a callback with the given priority.
    pub fn add(&mut self, callback: Arc<T>, priority: Priority) {
        let inner = self.inner.get_mut();
        inner.entries.push(Entry { callback, priority });
        inner.dirty = true;
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Callbacks in execution order.
    ///
    /// Returns a snapshot so callbacks run without the list being locked.
    pub fn sorted(&self) -> Vec<Arc<T>> {
        let mut inner = self.inner.lock();
        if inner.dirty {
            inner.entries.sort_by_key(|entry| entry.priority);
            inner.dirty = false;
        }
        inner
            .entries
            .iter()
            .map(|entry| Arc::clone(&entry.callback))
            .collect()
    }

    /// Invokes callbacks in order until one returns `Some`.
    pub fn first_some<R>(&self, mut invoke: impl FnMut(&T) -> Option<R>) -> Option<R> {
        self.sorted()
            .iter()
            .find_map(|callback| invoke(callback.as_ref()))
    }

    /// Invokes every callback in order.
    pub fn invoke_all(&self, mut invoke: impl FnMut(&T)) {
        for callback in self.sorted() {
            invoke(callback.as_ref());
        }
    }

    /// Invokes callbacks in order while `invoke` keeps returning true.
    pub fn for_each_while(&self, mut invoke: impl FnMut(&T) -> bool) {
        for callback in self.sorted() {
            if !invoke(callback.as_ref()) {
                return;
            }
        }
    }
}

impl<T: ?Sized> Default for CallbackList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for CallbackList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("CallbackList")
            .field(
                "priorities",
                &inner.entries.iter().map(|e| e.priority.0).collect::<Vec<_>>(),
            )
            .field("dirty", &inner.dirty)
            .finish()
    }
}
