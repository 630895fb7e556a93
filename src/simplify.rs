//! # Simplification
//!
//! The operations the DPLL loop is built out of:
//!
//!  - [x] Assignment: fixing a variable drops every clause it satisfies and
//!    deletes the now-false literal from the rest.  This always builds a new
//!    formula, since sibling branches of the search start from the same one.
//!
//!  - [x] Unit propagation: if there is a clause with just one literal, it
//!    must be true.  Done to a fixpoint.
//!
//!  - [x] Pure literals: if the problem contains a literal but not its
//!    negation, it can be assumed to be true.  Only one pass per call -- the
//!    search loop calls it again on the next step anyway.

use crate::data::*;
use crate::vec_map::VecMap;

/// Rewrite `formula` under `var := value`
///
/// Clauses containing the literal that's now true are dropped, the literal
/// that's now false is deleted from the others.
pub fn assign(formula: &[Clause], var: VarId, value: bool) -> Formula {
    let lit = Literal::with_value(var, value);
    formula
        .iter()
        .filter(|clause| !clause.contains(&lit))
        .map(|clause| {
            if clause.contains(&!lit) {
                clause.iter().copied().filter(|&l| l != !lit).collect()
            } else {
                clause.clone()
            }
        })
        .collect()
}

fn has_empty_clause(formula: &[Clause]) -> bool {
    formula.iter().any(|clause| clause.is_empty())
}

/// Record `var := value`.  Nothing should ever get assigned twice.
fn record(assignment: &mut Assignment, var: VarId, value: bool) {
    let old = assignment.insert(var, value);
    debug_assert!(
        old.is_none() || old == Some(value),
        "{:?} reassigned from {:?} to {}",
        var,
        old,
        value
    );
}

/// Process all unit clauses, until there aren't any left
///
/// Each unit clause's literal gets recorded in `assignment`.  Fails as soon
/// as some clause becomes empty.
pub fn unit_propagate(
    mut formula: Formula,
    assignment: &mut Assignment,
) -> Result<Formula, Conflict> {
    if has_empty_clause(&formula) {
        return Err(Conflict);
    }

    while let Some(unit) = formula.iter().find(|c| c.len() == 1).map(|c| c[0]) {
        log::trace!("Processing unit clause {:?}", unit);
        record(assignment, unit.var_id(), unit.polarity());
        formula = assign(&formula, unit.var_id(), unit.polarity());

        if has_empty_clause(&formula) {
            log::trace!("Conflict after {:?}", unit);
            return Err(Conflict);
        }
    }

    Ok(formula)
}

/// Process all pure literals, as counted at the start of the call
///
/// Pure variables are fixed in ascending id order, so the result doesn't
/// depend on anything but the formula.
pub fn pure_literal_eliminate(mut formula: Formula, assignment: &mut Assignment) -> Formula {
    let nvars = formula
        .iter()
        .flat_map(|c| c.iter())
        .map(|l| l.var_id().0)
        .max()
        .unwrap_or(0);

    let mut counts: VecMap<Literal, u32> = VecMap::filled(nvars as usize * 2, 0);
    for clause in &formula {
        for &lit in clause.iter() {
            counts[lit] += 1;
        }
    }

    for var in (1..=nvars).map(VarId::new) {
        let pos = Literal::new(var);
        let pure_lit = match (counts[pos], counts[!pos]) {
            (0, 0) => continue,
            (_, 0) => pos,
            (0, _) => !pos,
            _ => continue,
        };

        log::trace!("Processing pure {:?}", pure_lit);
        record(assignment, var, pure_lit.polarity());
        formula = assign(&formula, var, pure_lit.polarity());
    }

    formula
}
