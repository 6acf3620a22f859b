//! Shared lock state and the wait/signal protocol over it.
//!
//! Everything in this crate coordinates through one [`SharedState`] per lock
//! instance: three counters guarded by a single mutex, plus two condition
//! variables that partition the wait sets. Readers park on one condvar while
//! a writer is active or queued; escalating writers park on the other until
//! the reader population drains and it is their turn. One mutex is enough
//! because every critical section is an O(1) counter update, and sharing it
//! between the read and write paths removes any lock-ordering hazard.

use parking_lot::{Condvar, Mutex, MutexGuard};
use serde::Serialize;

use crate::error::ContractViolation;

/// The counters and flag every acquisition path inspects and mutates.
///
/// Invariants (whenever the internal mutex is not held):
/// - `writer == true` implies `readers == 0`
/// - at most one thread has the writer flag set on its behalf
/// - the counters never underflow; checked entry points refuse misuse before
///   touching them
#[derive(Debug)]
struct LockState {
    /// Threads currently holding read access. During an in-progress
    /// escalation this transiently counts "effective readers": the escalating
    /// thread has already given up its slot.
    readers: usize,
    /// Threads blocked inside a write acquisition.
    waiting_writers: usize,
    /// Set while exactly one thread holds exclusive access.
    writer: bool,
}

/// A point-in-time copy of the lock counters.
///
/// Useful for diagnostics and assertions; serializable so embedding
/// applications can export it alongside their own telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockSnapshot {
    /// Threads currently holding read access.
    pub readers: usize,
    /// Threads blocked inside a write acquisition.
    pub waiting_writers: usize,
    /// Whether a thread currently holds exclusive access.
    pub writer: bool,
}

impl LockSnapshot {
    /// Returns `true` when no thread holds or awaits any access.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.readers == 0 && self.waiting_writers == 0 && !self.writer
    }
}

/// The mutex-guarded record both lock handles reference.
///
/// Created once per lock instance and shared by reference counting; it has no
/// independent destruction path and no persisted form.
#[derive(Debug)]
pub(crate) struct SharedState {
    state: Mutex<LockState>,
    /// Readers parked while a writer is active or queued. Always woken en
    /// masse, since any number of readers may proceed together.
    readers_cv: Condvar,
    /// Escalating writers parked until the readers drain and it is their
    /// turn. Always woken one at a time to keep writer hand-off serialized.
    writers_cv: Condvar,
}

impl SharedState {
    pub(crate) const fn new() -> Self {
        Self {
            state: Mutex::new(LockState {
                readers: 0,
                waiting_writers: 0,
                writer: false,
            }),
            readers_cv: Condvar::new(),
            writers_cv: Condvar::new(),
        }
    }

    /// Blocks until no writer is active and none is queued, then joins the
    /// reader population.
    ///
    /// Yielding to queued writers (not just active ones) is what bounds
    /// writer starvation, at the cost of deferring new readers under a steady
    /// stream of writers.
    pub(crate) fn acquire_read(&self) {
        let mut s = self.state.lock();
        while s.writer || s.waiting_writers > 0 {
            tracing::trace!(
                waiting_writers = s.waiting_writers,
                writer = s.writer,
                "reader yielding to writer activity"
            );
            self.readers_cv.wait(&mut s);
        }
        s.readers += 1;
        tracing::trace!(readers = s.readers, "read acquired");
    }

    /// Releases one read acquisition. Guard paths guarantee the contract, so
    /// no runtime check is needed here.
    pub(crate) fn release_read(&self) {
        let mut s = self.state.lock();
        debug_assert!(s.readers > 0, "read release without a held read");
        self.release_read_locked(&mut s);
    }

    /// Checked form of [`Self::release_read`] for the raw handle surface.
    pub(crate) fn release_read_checked(&self) -> Result<(), ContractViolation> {
        let mut s = self.state.lock();
        if s.readers == 0 {
            return Err(ContractViolation::ReadNotHeld);
        }
        self.release_read_locked(&mut s);
        Ok(())
    }

    fn release_read_locked(&self, s: &mut MutexGuard<'_, LockState>) {
        s.readers -= 1;
        if s.readers == 0 && s.waiting_writers > 0 {
            // The reader population has drained; the next writer can run.
            self.writers_cv.notify_one();
        }
        tracing::trace!(readers = s.readers, "read released");
    }

    /// Escalates the caller's held read acquisition to exclusive access,
    /// blocking until every other reader has released.
    pub(crate) fn acquire_write(&self) {
        let mut s = self.state.lock();
        debug_assert!(s.readers > 0, "write acquisition without a held read");
        self.acquire_write_locked(&mut s);
    }

    /// Checked form of [`Self::acquire_write`] for the raw handle surface.
    ///
    /// With `readers == 0` the caller cannot hold a read acquisition, so the
    /// escalation is refused before any counter moves. A positive count only
    /// proves *some* read acquisition is outstanding; whether it belongs to
    /// the caller is not tracked (no per-thread identity bookkeeping).
    pub(crate) fn acquire_write_checked(&self) -> Result<(), ContractViolation> {
        let mut s = self.state.lock();
        if s.readers == 0 {
            return Err(ContractViolation::WriteWithoutRead);
        }
        self.acquire_write_locked(&mut s);
        Ok(())
    }

    fn acquire_write_locked(&self, s: &mut MutexGuard<'_, LockState>) {
        // The caller stops counting as a reader for the duration of the
        // escalation. A sole reader therefore sees `readers == 0` right away
        // and never self-waits.
        s.readers -= 1;
        s.waiting_writers += 1;
        while s.readers > 0 || s.writer {
            tracing::trace!(
                readers = s.readers,
                writer = s.writer,
                "writer waiting for reader drain"
            );
            self.writers_cv.wait(s);
        }
        s.waiting_writers -= 1;
        s.writer = true;
        tracing::trace!("write acquired");
    }

    /// Drops exclusive access and restores the caller's reader slot.
    pub(crate) fn release_write(&self) {
        let mut s = self.state.lock();
        debug_assert!(s.writer, "write release without a held write");
        self.release_write_locked(&mut s);
    }

    /// Checked form of [`Self::release_write`] for the raw handle surface.
    pub(crate) fn release_write_checked(&self) -> Result<(), ContractViolation> {
        let mut s = self.state.lock();
        if !s.writer {
            return Err(ContractViolation::WriteNotHeld);
        }
        self.release_write_locked(&mut s);
        Ok(())
    }

    fn release_write_locked(&self, s: &mut MutexGuard<'_, LockState>) {
        s.writer = false;
        if s.waiting_writers > 0 {
            // Queued writers are served before readers resume, one at a time.
            self.writers_cv.notify_one();
        } else {
            self.readers_cv.notify_all();
        }
        // Releasing exclusive access does not release the underlying read
        // hold: the caller becomes a reader again and must still release it.
        s.readers += 1;
        tracing::trace!(readers = s.readers, "write released, reader slot restored");
    }

    /// Copies the counters out under the mutex.
    pub(crate) fn snapshot(&self) -> LockSnapshot {
        let s = self.state.lock();
        LockSnapshot {
            readers: s.readers,
            waiting_writers: s.waiting_writers,
            writer: s.writer,
        }
    }
}
