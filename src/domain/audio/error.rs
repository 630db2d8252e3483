/// Failure taxonomy of the audio pipeline, as surfaced to callers.
///
/// `Clone` because a single job outcome is broadcast to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Bad article or voice id. Never creates a job.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Permanent provider refusal. Not retried.
    #[error("synthesis rejected: {0}")]
    SynthesisRejected(String),

    /// Retry budget exhausted on transient provider errors.
    #[error("synthesis unavailable: {0}")]
    SynthesisUnavailable(String),

    /// Per-job deadline exceeded with no provider response.
    #[error("synthesis timed out")]
    SynthesisTimeout,

    /// An individual caller's wait deadline expired. The job is unaffected.
    #[error("timed out waiting for audio")]
    Timeout,

    /// Asset store failed after its single retry.
    #[error("asset storage failure: {0}")]
    StorageFailure(String),
}

impl PipelineError {
    /// Whether a later identical request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PipelineError::SynthesisUnavailable(_)
                | PipelineError::SynthesisTimeout
                | PipelineError::Timeout
                | PipelineError::StorageFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(PipelineError::SynthesisUnavailable("busy".into()).is_transient());
        assert!(PipelineError::SynthesisTimeout.is_transient());
        assert!(PipelineError::StorageFailure("disk".into()).is_transient());
        assert!(!PipelineError::InvalidRequest("bad".into()).is_transient());
        assert!(!PipelineError::SynthesisRejected("no".into()).is_transient());
    }
}
