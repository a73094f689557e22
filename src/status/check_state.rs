// ABOUTME: Folds several per-function results into one category verdict.
// ABOUTME: Any Error wins over any Missing, which wins over Success.

use super::{Cause, StatusResult};

/// Accumulator for one category of checks (all Lambdas, or one account's
/// external functions).
#[derive(Debug, Default)]
pub struct FunctionCheckState {
    any_error: bool,
    any_missing: bool,
    first_cause: Option<Cause>,
}

impl FunctionCheckState {
    /// Record one result, returning it unchanged so callers can store it.
    pub fn record(&mut self, result: StatusResult) -> StatusResult {
        match &result {
            StatusResult::Error(cause) => {
                if !self.any_error {
                    self.first_cause = Some(cause.clone());
                }
                self.any_error = true;
            }
            StatusResult::Missing(cause) => {
                if !self.any_error && !self.any_missing {
                    self.first_cause = Some(cause.clone());
                }
                self.any_missing = true;
            }
            StatusResult::NotChecked | StatusResult::Success => {}
        }
        result
    }

    pub fn any_error(&self) -> bool {
        self.any_error
    }

    pub fn any_missing(&self) -> bool {
        self.any_missing
    }

    /// Category verdict. An empty category is Success, and so is one whose
    /// members are only Success or NotChecked.
    pub fn verdict(self) -> StatusResult {
        if self.any_error {
            StatusResult::Error(
                self.first_cause
                    .unwrap_or_else(|| Cause::new("at least one function has an error")),
            )
        } else if self.any_missing {
            StatusResult::Missing(
                self.first_cause
                    .unwrap_or_else(|| Cause::new("at least one function is missing")),
            )
        } else {
            StatusResult::Success
        }
    }
}

/// Fold a sequence of results in one pass.
pub fn fold<'a>(results: impl IntoIterator<Item = &'a StatusResult>) -> StatusResult {
    let mut state = FunctionCheckState::default();
    for result in results {
        state.record(result.clone());
    }
    state.verdict()
}
