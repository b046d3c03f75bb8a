//! The search lifecycle state machine: worker thread running the step
//! loop, poller thread watching stop criteria, listener fan-out and
//! metrics, built atop [`crate::neighbourhood_search`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use heurist_core::{ConfigError, Problem, SearchError, Solution, Validation};

use crate::listener::{dispatch, SearchListener};
use crate::metrics::SearchMetrics;
use crate::neighbourhood_search::{Inner, StepContext};
use crate::status::SearchStatus;
use crate::stop_criterion::{validate_check_period, StopCriterion};

/// A single iteration of a local-search algorithm, implemented by the
/// `algorithms` crate (random descent, steepest descent, VND, RVNS, VNS).
///
/// Holds whatever per-run cursor state the algorithm needs (e.g. VND's
/// current neighbourhood index); [`SearchStep::reset`] re-initializes that
/// state at the start of each run.
pub trait SearchStep<S: Solution, D>: Send {
    fn step(&mut self, ctx: &mut StepContext<'_, S, D>);

    fn reset(&mut self) {}
}

type SharedInner<S> = Arc<Mutex<Option<Inner<S>>>>;
type SharedMetrics = Arc<Mutex<SearchMetrics>>;
type SharedListeners<S> = Arc<Mutex<Vec<Box<dyn SearchListener<S>>>>>;
type SharedStopCriteria = Arc<Mutex<Vec<Box<dyn StopCriterion>>>>;

struct WorkerOutcome<S: Solution, D> {
    step: Box<dyn SearchStep<S, D>>,
    listener_errors: Vec<String>,
}

/// Drives one local search: lifecycle state machine, worker + poller
/// threads, listeners and stop criteria, atop a [`Problem`].
pub struct Search<S: Solution + 'static, D: Send + Sync + 'static> {
    problem: Arc<Problem<S, D>>,
    step: Option<Box<dyn SearchStep<S, D>>>,
    inner: SharedInner<S>,
    metrics: SharedMetrics,
    listeners: SharedListeners<S>,
    stop_criteria: SharedStopCriteria,
    status: SearchStatus,
    check_period: Duration,
    seed: Option<u64>,
    seeded_solution: Option<S>,
    stop_flag: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<WorkerOutcome<S, D>>>,
    poller_shutdown: Option<mpsc::Sender<()>>,
    poller: Option<thread::JoinHandle<()>>,
    name: String,
}

impl<S: Solution + 'static, D: Send + Sync + 'static> Search<S, D> {
    pub fn new(
        name: impl Into<String>,
        problem: Problem<S, D>,
        step: Box<dyn SearchStep<S, D>>,
        check_period: Duration,
    ) -> Result<Self, ConfigError> {
        Self::with_shared_problem(name, Arc::new(problem), step, check_period)
    }

    /// As [`Self::new`], but shares an existing `Arc<Problem>` rather than
    /// taking ownership of a fresh one. Used by algorithms (VNS) that spawn
    /// many embedded searches against the same problem instance.
    pub fn with_shared_problem(
        name: impl Into<String>,
        problem: Arc<Problem<S, D>>,
        step: Box<dyn SearchStep<S, D>>,
        check_period: Duration,
    ) -> Result<Self, ConfigError> {
        validate_check_period(check_period)?;
        Ok(Self {
            problem,
            step: Some(step),
            inner: Arc::new(Mutex::new(None)),
            metrics: Arc::new(Mutex::new(SearchMetrics::default())),
            listeners: Arc::new(Mutex::new(Vec::new())),
            stop_criteria: Arc::new(Mutex::new(Vec::new())),
            status: SearchStatus::Idle,
            check_period,
            seed: None,
            seeded_solution: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
            poller_shutdown: None,
            poller: None,
            name: name.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn problem(&self) -> &Problem<S, D> {
        &self.problem
    }

    pub fn shared_problem(&self) -> Arc<Problem<S, D>> {
        Arc::clone(&self.problem)
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    /// Overrides the next run's initial solution, taking priority over
    /// the default "resume from prior best" rule. Cleared once consumed.
    /// Used by VNS to seed an embedded local search with a shaken copy.
    pub fn seed_initial_solution(&mut self, sol: S) {
        self.seeded_solution = Some(sol);
    }

    pub fn add_listener(&self, listener: Box<dyn SearchListener<S>>) {
        self.listeners.lock().unwrap().push(listener);
    }

    pub fn add_stop_criterion(&self, criterion: Box<dyn StopCriterion>) {
        self.stop_criteria.lock().unwrap().push(criterion);
    }

    pub fn metrics(&self) -> SearchMetrics {
        *self.metrics.lock().unwrap()
    }

    pub fn current_solution(&self) -> Option<S> {
        self.inner.lock().unwrap().as_ref().map(|i| i.current.clone())
    }

    pub fn best_solution(&self) -> Option<S> {
        self.inner.lock().unwrap().as_ref().and_then(|i| i.best.clone())
    }

    pub fn best_evaluation_value(&self) -> Option<f64> {
        self.inner
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|i| i.best_eval.as_ref().map(|e| e.value()))
    }

    /// Cooperative, idempotent: safe to call from any thread (including a
    /// step function via [`StepContext::request_stop`], or a listener).
    /// Has no effect once the search is already idle.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Legal only from [`SearchStatus::Idle`]. Creates the run's initial
    /// solution (the seeded solution if one was set, else the prior best,
    /// else a fresh random solution), fires `searchStarted` and the
    /// initial `newCurrentSolution`/`newBestSolution`, then spawns the
    /// worker and poller threads and returns without waiting for the run
    /// to finish. Call [`Self::join`] to await completion.
    pub fn start(&mut self) -> Result<(), SearchError<S>> {
        if !self.status.is_idle() {
            return Err(SearchError::Aborted(format!(
                "start() is only legal from Idle, search '{}' is {:?}",
                self.name, self.status
            )));
        }
        self.status = SearchStatus::Initializing;
        debug!("search '{}' initializing", self.name);

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let prior_best = self.inner.lock().unwrap().as_ref().and_then(|i| i.best.clone());
        let initial = self
            .seeded_solution
            .take()
            .or(prior_best)
            .unwrap_or_else(|| self.problem.create_random_solution(&mut rng));

        let eval = self.problem.evaluate(&initial);
        let validation = self.problem.validate(&initial);
        let value = eval.value();

        let mut inner_guard = self.inner.lock().unwrap();
        let is_new_best = validation.passed()
            && inner_guard
                .as_ref()
                .and_then(|i| i.best_eval.as_ref())
                .is_none_or(|best_eval| {
                    if self.problem.is_minimizing() {
                        value < best_eval.value()
                    } else {
                        value > best_eval.value()
                    }
                });
        let (best, best_eval, best_validation) = if is_new_best {
            (Some(initial.clone()), Some(eval.clone_box()), Some(validation.clone()))
        } else {
            match inner_guard.take() {
                Some(prior) => (prior.best, prior.best_eval, prior.best_validation),
                None => (None, None, None),
            }
        };
        *inner_guard = Some(Inner {
            current: initial.clone(),
            current_eval: eval.clone_box(),
            current_validation: validation.clone(),
            best,
            best_eval,
            best_validation,
            accepted: 0,
            rejected: 0,
        });
        drop(inner_guard);

        {
            let mut metrics = self.metrics.lock().unwrap();
            let best_value = if is_new_best { Some(value) } else { metrics.best_value };
            *metrics = SearchMetrics {
                best_value,
                minimizing: self.problem.is_minimizing(),
                ..SearchMetrics::default()
            };
        }

        self.stop_flag.store(false, Ordering::SeqCst);

        let mut listener_errors = Vec::new();
        {
            let mut listeners = self.listeners.lock().unwrap();
            if let Err(errs) = dispatch(&mut listeners, |l| l.search_started()) {
                listener_errors.extend(errs);
            }
            if let Err(errs) = dispatch(&mut listeners, |l| l.new_current_solution(&initial, eval.as_ref(), &validation)) {
                listener_errors.extend(errs);
            }
            if is_new_best {
                if let Err(errs) = dispatch(&mut listeners, |l| l.new_best_solution(&initial, eval.as_ref(), &validation)) {
                    listener_errors.extend(errs);
                }
            }
        }
        if !listener_errors.is_empty() {
            warn!("search '{}' start listeners raised {} error(s)", self.name, listener_errors.len());
        }

        let mut step = self.step.take().expect("step is always Some while Idle");
        step.reset();

        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        self.poller_shutdown = Some(shutdown_tx);
        let poller_metrics = Arc::clone(&self.metrics);
        let poller_criteria = Arc::clone(&self.stop_criteria);
        let poller_stop_flag = Arc::clone(&self.stop_flag);
        let check_period = self.check_period;
        let poller_name = self.name.clone();
        self.poller = Some(
            thread::Builder::new()
                .name(format!("{}-poller", self.name))
                .spawn(move || {
                    loop {
                        match shutdown_rx.recv_timeout(check_period) {
                            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                            Err(mpsc::RecvTimeoutError::Timeout) => {
                                let snapshot = *poller_metrics.lock().unwrap();
                                let criteria = poller_criteria.lock().unwrap();
                                if criteria.iter().any(|c| c.should_stop(&snapshot)) {
                                    trace!("search '{}' poller triggered stop", poller_name);
                                    poller_stop_flag.store(true, Ordering::SeqCst);
                                    break;
                                }
                            }
                        }
                    }
                })
                .expect("failed to spawn poller thread"),
        );

        self.status = SearchStatus::Running;
        debug!("search '{}' running", self.name);

        let problem = Arc::clone(&self.problem);
        let inner = Arc::clone(&self.inner);
        let metrics_arc = Arc::clone(&self.metrics);
        let listeners_arc = Arc::clone(&self.listeners);
        let stop_flag = Arc::clone(&self.stop_flag);

        self.worker = Some(
            thread::Builder::new()
                .name(format!("{}-worker", self.name))
                .spawn(move || {
                    let start_time = Instant::now();
                    let mut last_improvement = start_time;
                    let mut steps_since_improvement: u64 = 0;
                    let mut listener_errors = Vec::new();

                    loop {
                        if stop_flag.load(Ordering::SeqCst) {
                            break;
                        }
                        let mut stop_requested = false;
                        let mut new_best = false;
                        let mut last_delta = None;
                        let step_snapshot;
                        let accepted_this_step;

                        {
                            let mut guard = inner.lock().unwrap();
                            let inner_ref = guard.as_mut().expect("initialized before worker starts");
                            let accepted_before = inner_ref.accepted;
                            let mut ctx = StepContext {
                                problem: &problem,
                                inner: inner_ref,
                                rng: &mut rng,
                                stop_requested: &mut stop_requested,
                                new_best: &mut new_best,
                                last_delta: &mut last_delta,
                            };
                            step.step(&mut ctx);
                            accepted_this_step = inner_ref.accepted > accepted_before;
                            step_snapshot = Some((
                                inner_ref.current.clone(),
                                inner_ref.current_eval.clone_box(),
                                inner_ref.current_validation.clone(),
                            ));
                        }

                        let (steps, accepted, rejected) = {
                            let guard = inner.lock().unwrap();
                            let inner_ref = guard.as_ref().unwrap();
                            (metrics_arc.lock().unwrap().steps + 1, inner_ref.accepted, inner_ref.rejected)
                        };

                        if new_best {
                            last_improvement = Instant::now();
                            steps_since_improvement = 0;
                        } else {
                            steps_since_improvement += 1;
                        }

                        let best_value = inner.lock().unwrap().as_ref().and_then(|i| i.best_eval.as_ref().map(|e| e.value()));

                        {
                            let mut m = metrics_arc.lock().unwrap();
                            m.steps = steps;
                            m.accepted = accepted;
                            m.rejected = rejected;
                            m.runtime = start_time.elapsed();
                            m.time_since_last_improvement = last_improvement.elapsed();
                            m.steps_since_last_improvement = steps_since_improvement;
                            m.last_delta = last_delta;
                            m.best_value = best_value;
                        }

                        {
                            let mut listeners = listeners_arc.lock().unwrap();
                            if let Err(errs) = dispatch(&mut listeners, |l| l.step_completed(steps)) {
                                listener_errors.extend(errs);
                            }
                            if let Some((sol, eval, validation)) = &step_snapshot {
                                if accepted_this_step {
                                    if let Err(errs) = dispatch(&mut listeners, |l| l.new_current_solution(sol, eval.as_ref(), validation)) {
                                        listener_errors.extend(errs);
                                    }
                                }
                                if new_best {
                                    if let Err(errs) = dispatch(&mut listeners, |l| l.new_best_solution(sol, eval.as_ref(), validation)) {
                                        listener_errors.extend(errs);
                                    }
                                }
                            }
                        }

                        if stop_requested {
                            stop_flag.store(true, Ordering::SeqCst);
                            break;
                        }
                    }

                    WorkerOutcome { step, listener_errors }
                })
                .expect("failed to spawn worker thread"),
        );

        if !listener_errors.is_empty() {
            return Err(SearchError::Listener(listener_errors));
        }
        Ok(())
    }

    /// Blocks until the current run's worker thread has finished, then
    /// joins the poller, restores `Idle` and returns the run's outcome.
    /// No-op (returns immediately) if the search is not running.
    pub fn join(&mut self) -> Result<(), SearchError<S>> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        self.status = SearchStatus::Terminating;
        let outcome = worker.join().expect("worker thread panicked");
        self.step = Some(outcome.step);

        if let Some(tx) = self.poller_shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(poller) = self.poller.take() {
            let _ = poller.join();
        }

        {
            let mut m = self.metrics.lock().unwrap();
            m.runtime = m.runtime.max(Duration::from_nanos(0));
        }

        let mut listener_errors = outcome.listener_errors;
        {
            let mut listeners = self.listeners.lock().unwrap();
            if let Err(errs) = dispatch(&mut listeners, |l| l.search_stopped()) {
                listener_errors.extend(errs);
            }
        }
        self.status = SearchStatus::Idle;
        debug!("search '{}' idle", self.name);

        if listener_errors.is_empty() {
            Ok(())
        } else {
            Err(SearchError::Listener(listener_errors))
        }
    }

    /// Requests stop then blocks until the run has fully terminated.
    pub fn stop_and_join(&mut self) -> Result<(), SearchError<S>> {
        self.request_stop();
        self.join()
    }

    /// Legal only from `Idle`. Subsequent calls to any other method
    /// raise.
    pub fn dispose(&mut self) -> Result<(), ConfigError> {
        if !self.status.is_idle() {
            return Err(ConfigError::InvalidArgument(format!(
                "dispose() is only legal from Idle, search '{}' is {:?}",
                self.name, self.status
            )));
        }
        self.status = SearchStatus::Disposed;
        Ok(())
    }
}
