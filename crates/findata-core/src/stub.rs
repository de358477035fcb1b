//! Stub generator contract

/// Deterministic synthetic data for a request.
///
/// Output must be shaped like the live payload (same fields and types) so
/// callers need no branching. For a given `request` the output must not depend
/// on wall-clock randomness; anchoring dates to "now" is allowed.
pub trait StubGenerator<R: ?Sized>: Send + Sync {
    /// Payload type produced by the generator
    type Output;

    /// Produce the fallback payload. `reason` is the failure that led here,
    /// if any.
    fn generate(&self, request: &R, reason: Option<&str>) -> Self::Output;
}
