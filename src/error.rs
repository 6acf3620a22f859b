//! Error types for lock contract violations.

use thiserror::Error;

/// Violations of the nested-acquisition protocol.
///
/// The lock has a single failure taxonomy: misuse of the acquire/release
/// contract. Waits themselves never fail; they block until the lock state
/// allows the caller to proceed. Every variant below is detected before the
/// internal counters are touched, so a rejected call leaves the lock fully
/// usable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    /// Write acquisition was requested while no read acquisition is
    /// outstanding anywhere on the lock, so the caller cannot possibly hold
    /// one. Exclusive access is only reachable by escalating a held read.
    #[error("write acquisition requires a held read acquisition")]
    WriteWithoutRead,
    /// Read release without a matching outstanding read acquisition.
    #[error("read release without a matching read acquisition")]
    ReadNotHeld,
    /// Write release while no thread holds exclusive access.
    #[error("write release without a held write acquisition")]
    WriteNotHeld,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_without_read_display() {
        let err = ContractViolation::WriteWithoutRead;
        assert_eq!(
            format!("{}", err),
            "write acquisition requires a held read acquisition"
        );
    }

    #[test]
    fn test_read_not_held_display() {
        let err = ContractViolation::ReadNotHeld;
        assert_eq!(
            format!("{}", err),
            "read release without a matching read acquisition"
        );
    }

    #[test]
    fn test_write_not_held_display() {
        let err = ContractViolation::WriteNotHeld;
        assert_eq!(
            format!("{}", err),
            "write release without a held write acquisition"
        );
    }
}
