use crate::diagnostics::PipelineState;
use crate::error::AnalysisResult;
use log::{debug, warn};

/// Ordered record of the states an invocation visited.
#[derive(Clone, Debug)]
pub struct StateLog {
    states: Vec<PipelineState>,
}

impl Default for StateLog {
    fn default() -> Self {
        Self::new()
    }
}

impl StateLog {
    pub fn new() -> Self {
        Self {
            states: vec![PipelineState::Received],
        }
    }

    pub fn current(&self) -> PipelineState {
        self.states
            .last()
            .copied()
            .unwrap_or(PipelineState::Received)
    }

    pub fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.current().can_advance_to(next),
            "illegal transition {:?} -> {next:?}",
            self.current()
        );
        debug!("pipeline: {:?} -> {next:?}", self.current());
        self.states.push(next);
    }

    /// Enter `Failed`, logging the error that caused it.
    pub fn fail(&mut self, err: &dyn std::error::Error) {
        warn!("pipeline failed in {:?}: {err}", self.current());
        self.advance(PipelineState::Failed);
    }

    /// Run `f`, entering `Failed` if it errors.
    pub fn guard<T>(&mut self, f: impl FnOnce() -> AnalysisResult<T>) -> AnalysisResult<T> {
        let result = f();
        if let Err(err) = &result {
            self.fail(err);
        }
        result
    }

    pub fn states(&self) -> &[PipelineState] {
        &self.states
    }

    pub fn into_states(self) -> Vec<PipelineState> {
        self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn failure_is_recorded_after_current_state() {
        let mut log = StateLog::new();
        log.advance(PipelineState::Decoded);
        log.advance(PipelineState::MetricsComputed);
        let res: AnalysisResult<()> =
            log.guard(|| Err(AnalysisError::metric_computation("nan")));
        assert!(res.is_err());
        assert_eq!(
            log.states(),
            &[
                PipelineState::Received,
                PipelineState::Decoded,
                PipelineState::MetricsComputed,
                PipelineState::Failed
            ]
        );
        assert!(log.current().is_terminal());
    }
}
