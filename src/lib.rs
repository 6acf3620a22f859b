//! # Nested RwLock
//!
//! An upgradeable reader-writer lock where exclusive access is an
//! *escalation* of a read acquisition the caller already holds.
//!
//! Most reader-writer locks treat read and write acquisition as independent
//! requests. This lock does not: a thread first acquires shared access, and
//! may then escalate, without releasing that access, to exclusive access.
//! Releasing the write side restores the read side, so the thread steps back
//! down to being a plain reader rather than dropping out entirely.
//!
//! ## Protocol
//!
//! The usage protocol is strictly nested:
//!
//! ```text
//! read.acquire();      // shared access
//!     write.acquire(); // exclusive access (requires the read above)
//!     write.release(); // back to shared access
//! read.release();      // fully unlocked
//! ```
//!
//! Internally one mutex guards three counters (`readers`, `waiting_writers`,
//! `writer`) and two condition variables partition the wait sets: readers
//! park while a writer is active or queued, escalating writers park until the
//! reader population drains. Writers take priority: once one is queued, new
//! readers are deferred until it has run. That bounds writer starvation
//! without guaranteeing FIFO order.
//!
//! ## Two surfaces
//!
//! - **Guards** ([`NestedRwLock::read`], [`ReadGuard::upgrade`]): RAII, with
//!   the nested contract enforced by the borrow checker. A [`WriteGuard`]
//!   can only exist while mutably borrowing its [`ReadGuard`].
//! - **Handles** ([`NestedRwLock::read_handle`],
//!   [`NestedRwLock::write_handle`]): explicit acquire/release for
//!   embeddings that cannot scope acquisitions lexically. Contract misuse is
//!   detected where cheaply checkable and reported as [`ContractViolation`]
//!   instead of corrupting the counters.
//!
//! ## Example
//!
//! ```
//! use nested_rwlock::NestedRwLock;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let lock = Arc::new(NestedRwLock::new());
//! let mut workers = vec![];
//!
//! for _ in 0..4 {
//!     let lock = Arc::clone(&lock);
//!     workers.push(thread::spawn(move || {
//!         let mut read = lock.read();
//!         // inspect shared state...
//!         let write = read.upgrade();
//!         // ...mutate it exclusively...
//!         drop(write);
//!         // ...and keep reading before letting go.
//!         drop(read);
//!     }));
//! }
//!
//! for worker in workers {
//!     worker.join().unwrap();
//! }
//! assert!(lock.snapshot().is_idle());
//! ```
//!
//! ## Out of scope
//!
//! No timeouts, no cancellation, no per-thread reentrancy tracking, no
//! deadlock detection, no strict FIFO fairness across mixed readers and
//! writers. Each lock instance is fully self-contained; there is no
//! process-wide state.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Contract-violation error types.
pub mod error;
/// Raw acquire/release handles.
pub mod handle;
/// The lock and its RAII guards.
pub mod lock;
mod state;
/// Tracing bootstrap helpers.
pub mod telemetry;

pub use error::ContractViolation;
pub use handle::{ReadHandle, WriteHandle};
pub use lock::{NestedRwLock, ReadGuard, WriteGuard};
pub use state::LockSnapshot;
