use std::sync::OnceLock;

/// Whether `with_txn` commits or rolls back when the closure succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnPolicy {
    /// Commit on success (default)
    CommitOnOk,
    /// Roll back on success, for tests that must not leave data behind
    RollbackOnOk,
}

static POLICY: OnceLock<TxnPolicy> = OnceLock::new();

/// Current process-wide policy; `CommitOnOk` unless set.
pub fn current() -> TxnPolicy {
    POLICY.get().copied().unwrap_or(TxnPolicy::CommitOnOk)
}

/// Set the policy for the process. Only the first call has any effect.
pub fn set_txn_policy(policy: TxnPolicy) {
    let _ = POLICY.set(policy);
}
