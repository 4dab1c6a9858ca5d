use crate::error::RemoteError;
use crate::fleet::target::TargetIdentity;

/// What happened on one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub target: TargetIdentity,
    /// Combined stdout/stderr. Kept on failure too, diagnostics usually live there.
    pub output: String,
    pub error: Option<RemoteError>,
}

impl ExecutionResult {
    pub fn success(target: TargetIdentity, output: impl Into<String>) -> Self {
        Self {
            target,
            output: output.into(),
            error: None,
        }
    }

    pub fn failure(target: TargetIdentity, output: impl Into<String>, error: RemoteError) -> Self {
        Self {
            target,
            output: output.into(),
            error: Some(error),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Every result of one batch, in the order the targets were resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub results: Vec<ExecutionResult>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExecutionResult> {
        self.results.iter().filter(|r| !r.succeeded())
    }
}
