use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tokens for one logical operation so a
/// completion can tell whether a newer request superseded it.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
    committed: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Records `token` as applied unless a newer token already was. Newer
    /// requests that never commit (failures) do not block older ones.
    pub fn try_commit(&self, token: RequestToken) -> bool {
        self.committed.fetch_max(token.0, Ordering::SeqCst) < token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_last_token_is_latest() {
        let seq = RequestSequencer::new();
        let a = seq.issue();
        assert!(seq.is_latest(a));

        let b = seq.issue();
        assert!(b > a);
        assert!(!seq.is_latest(a));
        assert!(seq.is_latest(b));
    }

    #[test]
    fn older_token_commits_when_newer_never_did() {
        let seq = RequestSequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        let c = seq.issue();

        assert!(seq.try_commit(b));
        assert!(!seq.try_commit(a));
        assert!(!seq.try_commit(b));
        assert!(seq.try_commit(c));
    }
}
