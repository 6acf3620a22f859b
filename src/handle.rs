//! Raw acquire/release handles over a shared lock instance.
//!
//! The guard API in [`crate::lock`] is the recommended surface, but some
//! embeddings cannot scope an acquisition to a lexical region: state
//! machines, FFI-driven callbacks, long-lived sessions. For those, a lock
//! instance hands out [`ReadHandle`] and [`WriteHandle`]: cheaply cloneable,
//! reference-counted views of the same state record with an explicit
//! `acquire`/`release` protocol.
//!
//! The nested contract still applies and is checked where it cheaply can be:
//! a write acquisition is refused outright when no read acquisition is
//! outstanding anywhere, and releases without a matching acquisition are
//! refused instead of corrupting the counters. Whether the outstanding read
//! acquisition belongs to *this* caller cannot be checked without per-thread
//! bookkeeping, so that part remains the caller's obligation.
//!
//! # Examples
//!
//! ```
//! use nested_rwlock::NestedRwLock;
//!
//! # fn main() -> Result<(), nested_rwlock::ContractViolation> {
//! let lock = NestedRwLock::new();
//! let read = lock.read_handle();
//! let write = lock.write_handle();
//!
//! read.acquire();
//! // shared section
//! write.acquire()?;
//! // exclusive section
//! write.release()?;
//! // shared section again: the reader slot was restored
//! read.release()?;
//!
//! assert!(lock.snapshot().is_idle());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::error::ContractViolation;
use crate::state::SharedState;

/// Handle to the shared-access capability of a lock instance.
///
/// Clones refer to the same lock. The handle performs no ownership or
/// identity check on release; callers must pair every `acquire` with exactly
/// one `release` on their own behalf.
#[derive(Debug, Clone)]
pub struct ReadHandle {
    shared: Arc<SharedState>,
}

impl ReadHandle {
    pub(crate) fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Acquires shared access, blocking while a writer is active or queued.
    ///
    /// Purely blocking, with no timeout and no error conditions.
    pub fn acquire(&self) {
        self.shared.acquire_read();
    }

    /// Releases one read acquisition.
    ///
    /// Never blocks. If this was the last reader and writers are queued, one
    /// of them is woken.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::ReadNotHeld`] if no read acquisition is
    /// outstanding; the lock state is left untouched.
    pub fn release(&self) -> Result<(), ContractViolation> {
        self.shared.release_read_checked()
    }
}

/// Handle to the exclusive-access capability of a lock instance.
///
/// Exclusive access is an escalation: the caller must already hold a read
/// acquisition on the same lock before calling [`WriteHandle::acquire`], and
/// still holds it (restored) after [`WriteHandle::release`].
#[derive(Debug, Clone)]
pub struct WriteHandle {
    shared: Arc<SharedState>,
}

impl WriteHandle {
    pub(crate) fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Escalates the caller's held read acquisition to exclusive access,
    /// blocking until every other reader has released and no writer is
    /// active.
    ///
    /// The caller's reader slot is consumed for the duration of the
    /// escalation, so a sole reader acquires without blocking. Competing
    /// escalations are serialized but not FIFO-ordered.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::WriteWithoutRead`] if no read acquisition is
    /// outstanding on the lock at all, in which case the caller cannot possibly
    /// hold one and proceeding would corrupt the reader count. Checked before
    /// blocking; on error the lock state is left untouched.
    pub fn acquire(&self) -> Result<(), ContractViolation> {
        self.shared.acquire_write_checked()
    }

    /// Releases exclusive access and restores the caller's reader slot.
    ///
    /// Never blocks. A queued writer is handed the lock first; only when none
    /// is queued are all parked readers woken. The caller remains a reader
    /// and must still call [`ReadHandle::release`] to fully unlock.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::WriteNotHeld`] if no thread holds exclusive
    /// access; the lock state is left untouched.
    pub fn release(&self) -> Result<(), ContractViolation> {
        self.shared.release_write_checked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::NestedRwLock;

    #[test]
    fn test_single_thread_protocol() {
        let lock = NestedRwLock::new();
        let read = lock.read_handle();
        let write = lock.write_handle();

        read.acquire();
        write.acquire().unwrap();
        write.release().unwrap();
        read.release().unwrap();

        assert!(lock.snapshot().is_idle());
    }

    #[test]
    fn test_release_read_without_acquire() {
        let lock = NestedRwLock::new();
        let read = lock.read_handle();
        assert_eq!(read.release(), Err(ContractViolation::ReadNotHeld));
        assert!(lock.snapshot().is_idle());
    }

    #[test]
    fn test_acquire_write_without_read() {
        let lock = NestedRwLock::new();
        let write = lock.write_handle();
        assert_eq!(write.acquire(), Err(ContractViolation::WriteWithoutRead));
        assert!(lock.snapshot().is_idle());
    }

    #[test]
    fn test_release_write_without_acquire() {
        let lock = NestedRwLock::new();
        let write = lock.write_handle();
        assert_eq!(write.release(), Err(ContractViolation::WriteNotHeld));
        assert!(lock.snapshot().is_idle());
    }

    #[test]
    fn test_clones_share_the_lock() {
        let lock = NestedRwLock::new();
        let read = lock.read_handle();
        let read2 = read.clone();

        read.acquire();
        read2.acquire();
        assert_eq!(lock.snapshot().readers, 2);

        read2.release().unwrap();
        read.release().unwrap();
        assert!(lock.snapshot().is_idle());
    }

    #[test]
    fn test_handles_interoperate_with_guards() {
        let lock = NestedRwLock::new();
        let read = lock.read_handle();

        let guard = lock.read();
        read.acquire();
        assert_eq!(lock.snapshot().readers, 2);

        read.release().unwrap();
        drop(guard);
        assert!(lock.snapshot().is_idle());
    }
}
