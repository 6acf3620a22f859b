//! The upgradeable lock and its RAII guards.
//!
//! [`NestedRwLock`] is a reader-writer lock with one twist: exclusive access
//! is not an independent request, it is an *escalation* of a read acquisition
//! the caller already holds. The guard types make the protocol a compile-time
//! fact: a [`WriteGuard`] can only be produced from a [`ReadGuard`] via
//! [`ReadGuard::upgrade`], and it mutably borrows the read guard, so the
//! write acquisition must end before the read acquisition can.
//!
//! Writers take priority: once any thread is escalating, new readers are
//! deferred until that writer (or a later one) has run and released. Among
//! simultaneously escalating writers only mutual exclusion and eventual
//! progress are guaranteed, not FIFO order.
//!
//! # Examples
//!
//! ```
//! use nested_rwlock::NestedRwLock;
//!
//! let lock = NestedRwLock::new();
//!
//! let mut read = lock.read();
//! // shared section: any number of readers may be here together
//! {
//!     let write = read.upgrade();
//!     // exclusive section: no reader and no other writer
//!     drop(write);
//! }
//! // the reader slot is restored; this thread is a plain reader again
//! drop(read);
//!
//! assert!(lock.snapshot().is_idle());
//! ```
//!
//! Concurrent readers:
//!
//! ```
//! use nested_rwlock::NestedRwLock;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let lock = Arc::new(NestedRwLock::new());
//! let mut handles = vec![];
//!
//! for _ in 0..10 {
//!     let lock = Arc::clone(&lock);
//!     handles.push(thread::spawn(move || {
//!         let guard = lock.read();
//!         // shared work happens here
//!         drop(guard);
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert!(lock.snapshot().is_idle());
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use crate::handle::{ReadHandle, WriteHandle};
use crate::state::{LockSnapshot, SharedState};

/// An upgradeable reader-writer lock.
///
/// Each instance is fully self-contained: it owns one mutex-guarded state
/// record that every guard and handle derived from it shares by reference
/// counting. There is no process-wide state, no timeout support, and no
/// per-thread reentrancy tracking; calls block until the protocol allows them
/// to proceed.
///
/// Unlike `std::sync::RwLock`, this lock carries no data; it is a pure
/// synchronization object. The embedding program performs the protected work
/// between acquisition and release.
#[derive(Debug)]
pub struct NestedRwLock {
    shared: Arc<SharedState>,
}

impl NestedRwLock {
    /// Creates a new lock in the idle state.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_rwlock::NestedRwLock;
    ///
    /// let lock = NestedRwLock::new();
    /// assert!(lock.snapshot().is_idle());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(SharedState::new()),
        }
    }

    /// Acquires shared access, blocking while a writer is active or queued.
    ///
    /// Any number of read acquisitions may be outstanding at once; readers
    /// never block each other. New readers yield to queued writers, which
    /// bounds writer starvation at the cost of deferring readers under a
    /// steady stream of writers.
    pub fn read(&self) -> ReadGuard<'_> {
        self.shared.acquire_read();
        ReadGuard {
            shared: &self.shared,
            _not_send: PhantomData,
        }
    }

    /// Copies the current counters out for diagnostics or assertions.
    #[must_use]
    pub fn snapshot(&self) -> LockSnapshot {
        self.shared.snapshot()
    }

    /// Returns a cloneable handle to the shared-access capability.
    ///
    /// Handles expose the raw acquire/release protocol for embeddings where
    /// RAII guards do not fit; see [`ReadHandle`].
    #[must_use]
    pub fn read_handle(&self) -> ReadHandle {
        ReadHandle::new(Arc::clone(&self.shared))
    }

    /// Returns a cloneable handle to the exclusive-access capability.
    ///
    /// See [`WriteHandle`] for the escalation contract.
    #[must_use]
    pub fn write_handle(&self) -> WriteHandle {
        WriteHandle::new(Arc::clone(&self.shared))
    }
}

impl Default for NestedRwLock {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for a read acquisition.
///
/// Dropping the guard releases shared access. The guard is deliberately not
/// `Send`: it must be released on the thread that acquired it, since an
/// escalation waits on that thread's behalf.
#[must_use = "the read acquisition is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ReadGuard<'a> {
    shared: &'a SharedState,
    _not_send: PhantomData<*const ()>,
}

impl ReadGuard<'_> {
    /// Escalates this read acquisition to exclusive access, blocking until
    /// every other reader has released.
    ///
    /// The read acquisition is consumed for the duration of the escalation
    /// and restored when the returned [`WriteGuard`] is dropped; this guard
    /// keeps representing it throughout. A sole reader upgrades without
    /// blocking.
    ///
    /// The mutable borrow means the write guard must be dropped before this
    /// guard can be used or dropped, which is exactly the release order the
    /// protocol requires.
    pub fn upgrade(&mut self) -> WriteGuard<'_> {
        self.shared.acquire_write();
        WriteGuard {
            shared: self.shared,
            _not_send: PhantomData,
        }
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.shared.release_read();
    }
}

/// RAII guard for exclusive access obtained by escalation.
///
/// Dropping the guard releases exclusive access and restores the underlying
/// read acquisition: the thread is a plain reader again and still holds its
/// [`ReadGuard`]. Queued writers are handed the lock one at a time before any
/// parked reader resumes.
#[must_use = "exclusive access is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct WriteGuard<'a> {
    shared: &'a SharedState,
    _not_send: PhantomData<*const ()>,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.shared.release_write();
    }
}
