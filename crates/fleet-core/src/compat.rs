use crate::ContextFingerprint;

/// Decides whether a candidate worker could take over work meant for a worker started
/// under `reference`. The expiration policy always passes the target's fingerprint as
/// `reference`; implementations need not be symmetric.
pub trait CompatibilityPredicate: Send + Sync {
    fn is_compatible(&self, reference: &ContextFingerprint, candidate: &ContextFingerprint) -> bool;
}

impl<F> CompatibilityPredicate for F
where
    F: Fn(&ContextFingerprint, &ContextFingerprint) -> bool + Send + Sync,
{
    fn is_compatible(&self, reference: &ContextFingerprint, candidate: &ContextFingerprint) -> bool {
        self(reference, candidate)
    }
}

/// Compatible iff the fingerprints are identical.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactContext;

impl CompatibilityPredicate for ExactContext {
    fn is_compatible(&self, reference: &ContextFingerprint, candidate: &ContextFingerprint) -> bool {
        reference == candidate
    }
}

/// Compatible iff every listed attribute has the same value (or is absent) on both sides.
/// Attributes not listed are ignored.
#[derive(Clone, Debug, Default)]
pub struct MatchingKeys {
    keys: Vec<String>,
}

impl MatchingKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { keys: keys.into_iter().map(Into::into).collect() }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl CompatibilityPredicate for MatchingKeys {
    fn is_compatible(&self, reference: &ContextFingerprint, candidate: &ContextFingerprint) -> bool {
        self.keys.iter().all(|k| reference.get(k) == candidate.get(k))
    }
}
