//! Default MILP backend: `good_lp` modelling over the pure-Rust `microlp` solver
//!
//! Every call builds a fresh problem from the [`TspModel`]. The only state a
//! solver value carries is the gate over its worker threads, shared by clones.

use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use parking_lot::{Condvar, Mutex};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::formulation::{Sense, TspModel, Var, VarKind};
use crate::solver::{AssignmentMatrix, MilpSolver, SolveOutcome, SolverConfig};

/// Default cap on live time-limited solver threads
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Branch-and-bound via `microlp`
///
/// microlp cannot be interrupted, so a time-limited solve runs on its own
/// thread and is abandoned when the budget runs out. Abandoned threads keep
/// their slot until branch-and-bound finishes, and at most `max_workers`
/// threads exist at once. A call that cannot get a slot within its budget
/// reports `TimedOut` without spawning anything.
#[derive(Debug, Clone)]
pub struct MicroLpSolver {
    gate: Arc<WorkerGate>,
}

impl MicroLpSolver {
    pub fn new() -> Self {
        Self::with_max_workers(DEFAULT_MAX_WORKERS)
    }

    pub fn with_max_workers(max_workers: usize) -> Self {
        Self {
            gate: Arc::new(WorkerGate::new(max_workers)),
        }
    }

    /// Solver threads currently alive, abandoned ones included
    pub fn live_workers(&self) -> usize {
        self.gate.live()
    }

    pub fn max_workers(&self) -> usize {
        self.gate.max
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MilpSolver for MicroLpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn optimize(&self, model: &TspModel, config: &SolverConfig) -> SolveOutcome {
        let start = Instant::now();
        let threshold = config.rounding_threshold;

        // A budget too large to represent as an Instant is no budget at all
        let deadline = config.time_limit().and_then(|limit| start.checked_add(limit));

        let outcome = match deadline {
            None => solve_model(model, threshold),
            Some(deadline) => match self.gate.acquire(deadline) {
                Some(permit) => solve_on_worker(model, threshold, permit, deadline),
                None => {
                    warn!(
                        max_workers = self.gate.max,
                        "no solver worker freed up within the time budget"
                    );
                    SolveOutcome::TimedOut
                }
            }
        };

        if config.log_output {
            info!(
                n = model.n(),
                variables = model.variable_count(),
                constraints = model.constraints().len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                outcome = outcome_name(&outcome),
                "microlp finished"
            );
        }

        outcome
    }
}

fn solve_on_worker(
    model: &TspModel,
    threshold: f64,
    permit: WorkerPermit,
    deadline: Instant,
) -> SolveOutcome {
    let (tx, rx) = mpsc::channel();
    let owned = model.clone();
    let spawned = thread::Builder::new()
        .name("microlp-solve".to_string())
        .spawn(move || {
            // The slot is released when this thread exits, answered or not
            let _permit = permit;
            let _ = tx.send(solve_model(&owned, threshold));
        });

    if let Err(e) = spawned {
        return SolveOutcome::Error(format!("failed to spawn solver thread: {e}"));
    }

    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(outcome) => outcome,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(n = model.n(), "solver time budget exceeded, worker abandoned");
            SolveOutcome::TimedOut
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            SolveOutcome::Error("solver thread terminated without a result".to_string())
        }
    }
}

/// Counting gate over live solver threads
#[derive(Debug)]
struct WorkerGate {
    live: Mutex<usize>,
    freed: Condvar,
    max: usize,
}

impl WorkerGate {
    fn new(max: usize) -> Self {
        Self {
            live: Mutex::new(0),
            freed: Condvar::new(),
            max: max.max(1),
        }
    }

    fn live(&self) -> usize {
        *self.live.lock()
    }

    /// Wait until a slot is free or the deadline passes
    fn acquire(self: &Arc<Self>, deadline: Instant) -> Option<WorkerPermit> {
        let mut live = self.live.lock();
        while *live >= self.max {
            if self.freed.wait_until(&mut live, deadline).timed_out() && *live >= self.max {
                return None;
            }
        }
        *live += 1;
        Some(WorkerPermit {
            gate: Arc::clone(self),
        })
    }
}

/// One slot in a [`WorkerGate`], released on drop
#[derive(Debug)]
struct WorkerPermit {
    gate: Arc<WorkerGate>,
}

impl Drop for WorkerPermit {
    fn drop(&mut self) {
        *self.gate.live.lock() -= 1;
        self.gate.freed.notify_one();
    }
}

fn outcome_name(outcome: &SolveOutcome) -> &'static str {
    match outcome {
        SolveOutcome::Optimal { .. } => "optimal",
        SolveOutcome::Infeasible => "infeasible",
        SolveOutcome::Unbounded => "unbounded",
        SolveOutcome::TimedOut => "timed_out",
        SolveOutcome::Error(_) => "error",
    }
}

/// Translate the model into a good_lp problem, solve it, and read back edges.
fn solve_model(model: &TspModel, threshold: f64) -> SolveOutcome {
    let n = model.n();

    let mut vars = ProblemVariables::new();
    let columns: Vec<Variable> = model
        .variables()
        .map(|var| match var.kind() {
            VarKind::Binary => vars.add(variable().binary()),
            // Any feasible order fits in [0, n]; microlp's branch-and-bound
            // needs finite bounds on continuous columns.
            VarKind::Continuous => vars.add(variable().min(0.0).max(n as f64)),
        })
        .collect();

    let linear = |terms: &[(Var, f64)]| -> Expression {
        terms
            .iter()
            .map(|&(var, coeff)| coeff * columns[model.column(var)])
            .sum()
    };

    let mut problem = vars.minimise(linear(model.objective())).using(good_lp::microlp);
    for c in model.constraints() {
        let lhs = linear(&c.terms);
        let built = match c.sense {
            Sense::Eq => constraint::eq(lhs, c.rhs),
            Sense::Le => constraint::leq(lhs, c.rhs),
        };
        problem.add_constraint(built);
    }

    debug!(
        variables = columns.len(),
        constraints = model.constraints().len(),
        "model handed to microlp"
    );

    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => return SolveOutcome::Infeasible,
        Err(ResolutionError::Unbounded) => return SolveOutcome::Unbounded,
        Err(other) => return SolveOutcome::Error(other.to_string()),
    };

    let mut values = vec![0.0; n * n];
    let mut objective = 0.0;
    for &(var, coeff) in model.objective() {
        let value = solution.value(columns[model.column(var)]);
        if let Var::Edge { from, to } = var {
            values[from * n + to] = value;
        }
        objective += coeff * value;
    }

    SolveOutcome::Optimal {
        assignment: AssignmentMatrix::from_values(n, &values, threshold),
        objective,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::formulate;
    use crate::instance::DistanceMatrix;
    use std::time::Duration;

    fn model(rows: &[&[f64]]) -> TspModel {
        let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
        formulate(&DistanceMatrix::from_rows(&rows).unwrap())
    }

    #[test]
    fn test_two_nodes_round_trip() {
        let m = model(&[&[0.0, 10.0], &[20.0, 0.0]]);
        let outcome = MicroLpSolver::new().optimize(&m, &SolverConfig::default());

        let (assignment, objective) = outcome.into_optimal().unwrap();
        assert!(assignment.is_used(0, 1));
        assert!(assignment.is_used(1, 0));
        assert!((objective - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_three_nodes_asymmetric() {
        //      0    1    2
        //  0 [ 0,   1, 100]
        //  1 [100,  0,   1]
        //  2 [ 1, 100,   0]
        // Only 0->1->2->0 is cheap (cost 3); the reverse costs 300.
        let m = model(&[
            &[0.0, 1.0, 100.0],
            &[100.0, 0.0, 1.0],
            &[1.0, 100.0, 0.0],
        ]);
        let (assignment, objective) = MicroLpSolver::new()
            .optimize(&m, &SolverConfig::default())
            .into_optimal()
            .unwrap();

        assert!((objective - 3.0).abs() < 1e-6);
        assert_eq!(assignment.edge_count(), 3);
        assert!(assignment.is_used(0, 1));
        assert!(assignment.is_used(1, 2));
        assert!(assignment.is_used(2, 0));
    }

    #[test]
    fn test_generous_time_limit_still_optimal() {
        let m = model(&[&[0.0, 2.0, 3.0], &[2.0, 0.0, 4.0], &[3.0, 4.0, 0.0]]);
        let config = SolverConfig::default().with_time_limit(Duration::from_secs(60));
        let (_, objective) = MicroLpSolver::new().optimize(&m, &config).into_optimal().unwrap();
        assert!((objective - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_hexagon_needs_order_bounds() {
        // Regular hexagon with unit radius: the perimeter (6) is optimal.
        // Order potentials are only bounded in the backend, and the solve
        // fails outright without those bounds.
        let points: Vec<(f64, f64)> = (0..6)
            .map(|k| {
                let a = k as f64 * std::f64::consts::PI / 3.0;
                (a.cos(), a.sin())
            })
            .collect();
        let rows: Vec<Vec<f64>> = points
            .iter()
            .map(|a| {
                points
                    .iter()
                    .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        let m = formulate(&DistanceMatrix::from_rows(&rows).unwrap());

        let (assignment, objective) = MicroLpSolver::new()
            .optimize(&m, &SolverConfig::default())
            .into_optimal()
            .unwrap();
        assert!((objective - 6.0).abs() < 1e-6, "objective {objective}");
        assert_eq!(assignment.edge_count(), 6);
    }

    #[test]
    fn test_gate_blocks_past_capacity() {
        let gate = Arc::new(WorkerGate::new(1));
        let first = gate.acquire(Instant::now()).expect("free slot");
        assert_eq!(gate.live(), 1);

        let soon = Instant::now() + Duration::from_millis(20);
        assert!(gate.acquire(soon).is_none());
        assert_eq!(gate.live(), 1);

        drop(first);
        assert_eq!(gate.live(), 0);
        assert!(gate.acquire(Instant::now()).is_some());
    }

    #[test]
    fn test_gate_wakes_waiter_on_release() {
        let gate = Arc::new(WorkerGate::new(1));
        let held = gate.acquire(Instant::now()).unwrap();

        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            drop(held);
        });
        let waited = gate.acquire(Instant::now() + Duration::from_secs(10));
        releaser.join().unwrap();

        assert!(waited.is_some());
        assert_eq!(gate.live(), 1);
    }

    #[test]
    fn test_zero_workers_is_clamped() {
        assert_eq!(MicroLpSolver::with_max_workers(0).max_workers(), 1);
    }

    #[test]
    fn test_abandoned_workers_stay_bounded() {
        // 12 points on a circle: far more than a microsecond of work
        let n = 12;
        let points: Vec<(f64, f64)> = (0..n)
            .map(|k| {
                let a = k as f64 * 2.0 * std::f64::consts::PI / n as f64;
                (a.cos(), a.sin())
            })
            .collect();
        let rows: Vec<Vec<f64>> = points
            .iter()
            .map(|a| {
                points
                    .iter()
                    .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        let m = formulate(&DistanceMatrix::from_rows(&rows).unwrap());

        let solver = MicroLpSolver::with_max_workers(2);
        let config = SolverConfig::default().with_time_limit(Duration::from_micros(1));
        for _ in 0..8 {
            assert_eq!(solver.optimize(&m, &config), SolveOutcome::TimedOut);
            assert!(solver.live_workers() <= 2);
        }
    }

    #[test]
    fn test_name() {
        assert_eq!(MicroLpSolver::new().name(), "microlp");
    }
}
