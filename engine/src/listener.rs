//! Search lifecycle listeners, dispatched synchronously on the worker
//! thread in registration order.

use heurist_core::{Evaluation, ProblemValidation, Solution};

/// Receives notifications of a search's progress.
///
/// Every method defaults to a no-op; implementors override only the events
/// they care about. A listener returning `Err` does not stop dispatch to
/// the remaining listeners in the same round; errors are accumulated and
/// re-raised by the caller once dispatch completes.
pub trait SearchListener<S: Solution>: Send {
    fn search_started(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn search_stopped(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn new_best_solution(&mut self, sol: &S, eval: &dyn Evaluation, validation: &ProblemValidation) -> Result<(), String> {
        let _ = (sol, eval, validation);
        Ok(())
    }

    fn new_current_solution(&mut self, sol: &S, eval: &dyn Evaluation, validation: &ProblemValidation) -> Result<(), String> {
        let _ = (sol, eval, validation);
        Ok(())
    }

    fn step_completed(&mut self, step: u64) -> Result<(), String> {
        let _ = step;
        Ok(())
    }
}

/// Dispatches `f` to every listener in registration order, collecting
/// every error message rather than stopping at the first one.
pub(crate) fn dispatch<S: Solution>(
    listeners: &mut [Box<dyn SearchListener<S>>],
    mut f: impl FnMut(&mut dyn SearchListener<S>) -> Result<(), String>,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    for listener in listeners.iter_mut() {
        if let Err(e) = f(listener.as_mut()) {
            errors.push(e);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
