//! The core DPLL algorithm
//!
//! Every step is: unit propagation, then (if there wasn't a conflict) one
//! pass of pure literal elimination, then either we're done or we branch on
//! the variable of the first literal of the first clause, trying `true`
//! before `false`.
//!
//! There's no clause learning and no heuristic: the branching order only
//! depends on the order of the clauses, so results are reproducible.

use crate::config::Strategy;
use crate::data::*;
use crate::simplify::{assign, pure_literal_eliminate, unit_propagate};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Verdict {
    Satisfiable,
    Unsatisfiable,
}

/// Counters for one search
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Branching choices made
    pub decisions: usize,
    /// Branches abandoned because of an empty clause
    pub conflicts: usize,
    /// Variables fixed by unit propagation or pure literal elimination
    pub propagations: usize,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub verdict: Verdict,
    /// A model when satisfiable.  Otherwise whatever the last failed branch
    /// had assigned, which doesn't mean anything.
    pub assignment: Assignment,
    pub stats: SearchStats,
}

impl Outcome {
    pub fn is_satisfiable(&self) -> bool {
        self.verdict == Verdict::Satisfiable
    }
}

/// One pending branch: a formula, and the assignment that produced it
#[derive(Debug, Clone)]
struct Frame {
    formula: Formula,
    assignment: Assignment,
}

/// What happened to a frame after simplifying it
enum Step {
    Conflict(Assignment),
    Done(Assignment),
    /// Need to guess this variable; children are true then false
    Branch([Frame; 2]),
}

/// Run DPLL on `formula`, starting from `assignment`
pub fn search(formula: Formula, assignment: Assignment, strategy: Strategy) -> Outcome {
    let mut stats = SearchStats::default();
    let frame = Frame {
        formula,
        assignment,
    };

    let (verdict, assignment) = match strategy {
        Strategy::Stack => stack_search(frame, &mut stats),
        Strategy::Recursive => recursive_search(frame, &mut stats),
    };

    log::info!(
        "Search finished: {:?} after {} decisions, {} conflicts, {} propagations",
        verdict,
        stats.decisions,
        stats.conflicts,
        stats.propagations
    );

    Outcome {
        verdict,
        assignment,
        stats,
    }
}

/// Simplify a frame, and figure out what to do with it
fn step(frame: Frame, stats: &mut SearchStats) -> Step {
    let Frame {
        formula,
        mut assignment,
    } = frame;
    let before = assignment.len();

    let formula = match unit_propagate(formula, &mut assignment) {
        Ok(formula) => formula,
        Err(Conflict) => {
            stats.propagations += assignment.len() - before;
            stats.conflicts += 1;
            return Step::Conflict(assignment);
        }
    };
    let formula = pure_literal_eliminate(formula, &mut assignment);
    stats.propagations += assignment.len() - before;

    // unit propagation and pure literals never leave an empty clause behind,
    // so the first clause has a first literal
    let var = match formula.first().and_then(|clause| clause.first()) {
        None => return Step::Done(assignment),
        Some(lit) => lit.var_id(),
    };

    log::debug!(
        "Branching on {:?} with {} clauses left",
        var,
        formula.len()
    );
    stats.decisions += 1;

    let child = |value| {
        let mut snapshot = assignment.clone();
        snapshot.insert(var, value);
        Frame {
            formula: assign(&formula, var, value),
            assignment: snapshot,
        }
    };
    Step::Branch([child(true), child(false)])
}

fn stack_search(root: Frame, stats: &mut SearchStats) -> (Verdict, Assignment) {
    let mut stack = vec![root];
    let mut last_failure = Assignment::new();

    while let Some(frame) = stack.pop() {
        match step(frame, stats) {
            Step::Done(assignment) => return (Verdict::Satisfiable, assignment),
            Step::Conflict(assignment) => last_failure = assignment,
            Step::Branch([on_true, on_false]) => {
                // LIFO, so true gets tried first
                stack.push(on_false);
                stack.push(on_true);
            }
        }
    }

    (Verdict::Unsatisfiable, last_failure)
}

fn recursive_search(frame: Frame, stats: &mut SearchStats) -> (Verdict, Assignment) {
    match step(frame, stats) {
        Step::Done(assignment) => (Verdict::Satisfiable, assignment),
        Step::Conflict(assignment) => (Verdict::Unsatisfiable, assignment),
        Step::Branch([on_true, on_false]) => match recursive_search(on_true, stats) {
            sat @ (Verdict::Satisfiable, _) => sat,
            (Verdict::Unsatisfiable, _) => recursive_search(on_false, stats),
        },
    }
}

/// Check every clause has a literal made true by `assignment`
pub fn satisfies(formula: &[Clause], assignment: &Assignment) -> bool {
    formula.iter().all(|clause| {
        clause
            .iter()
            .any(|lit| assignment.get(&lit.var_id()) == Some(&lit.polarity()))
    })
}
