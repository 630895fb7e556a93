//! Putting it all together: text in, verdict and named assignment out

use crate::config::SolverConfig;
use crate::data::*;
use crate::error::{Result, UnknownVariable};
use crate::expand::{expand, Expansion};
use crate::registry::Registry;
use crate::repository::{FormulaRecord, FormulaRepository};
use crate::search::{satisfies, search, SearchStats, Verdict};
use crate::simplify::assign;
use indexmap::IndexMap;

/// A formula to check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Problem {
    /// What the formula will be stored as.  References back to this name are
    /// cycles.
    pub name: Option<String>,
    pub text: String,
    /// Values fixed before the search starts
    pub pre_assignments: Vec<(String, bool)>,
}

impl Problem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_assignment(mut self, name: impl Into<String>, value: bool) -> Self {
        self.pre_assignments.push((name.into(), value));
        self
    }

    pub fn with_assignments(
        mut self,
        assignments: impl IntoIterator<Item = (String, bool)>,
    ) -> Self {
        self.pre_assignments.extend(assignments);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub verdict: Verdict,
    /// The fully expanded formula, before pre-assignments
    pub formula: Formula,
    pub registry: Registry,
    /// When satisfiable, every variable of the registry has a value
    pub assignment: Assignment,
    /// Pre-assignments that were skipped
    pub warnings: Vec<UnknownVariable>,
    pub stats: SearchStats,
}

impl Solution {
    pub fn is_satisfiable(&self) -> bool {
        self.verdict == Verdict::Satisfiable
    }

    /// The assignment by variable name, in id order.  Auxiliary variables
    /// are left out.
    pub fn named_assignment(&self) -> IndexMap<String, bool> {
        self.registry
            .iter()
            .filter_map(|(id, name)| Some((name.to_owned(), *self.assignment.get(&id)?)))
            .collect()
    }

    /// What the caller should store, if anything
    pub fn to_record(
        &self,
        name: &str,
        text: &str,
        comment: Option<&str>,
    ) -> Option<FormulaRecord> {
        if !self.is_satisfiable() {
            return None;
        }
        Some(FormulaRecord {
            name: name.to_owned(),
            text: text.to_owned(),
            assignment: self.named_assignment(),
            comment: comment.map(str::to_owned),
        })
    }
}

/// Check `problem`, resolving references through `repo`
pub fn solve<R: FormulaRepository + ?Sized>(
    problem: &Problem,
    repo: &R,
    config: &SolverConfig,
) -> Result<Solution> {
    let Expansion { formula, registry } =
        expand(&problem.text, problem.name.as_deref(), repo, config.negation)?;
    log::info!(
        "Solving {} with {} vars and {} clauses",
        problem.name.as_deref().unwrap_or("formula"),
        registry.len(),
        formula.len()
    );

    let mut warnings = Vec::new();
    let mut assignment = Assignment::new();
    for (name, value) in &problem.pre_assignments {
        match registry.id_of(name) {
            Some(id) => {
                if let Some(old) = assignment.insert(id, *value) {
                    if old != *value {
                        log::warn!("{:?} pre-assigned twice, using {}", name, value);
                    }
                }
            }
            None => {
                let warning = UnknownVariable(name.clone());
                log::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    let mut simplified = formula.clone();
    for (&var, &value) in &assignment {
        simplified = assign(&simplified, var, value);
    }

    let mut outcome = search(simplified, assignment, config.strategy);

    if outcome.is_satisfiable() {
        // whatever got dropped without being decided can be anything
        for var in registry.vars() {
            outcome.assignment.entry(var).or_insert(false);
        }
        debug_assert!(satisfies(&formula, &outcome.assignment));
    }

    Ok(Solution {
        verdict: outcome.verdict,
        formula,
        registry,
        assignment: outcome.assignment,
        warnings,
        stats: outcome.stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NegationPolicy;
    use crate::error::Error;
    use crate::repository::MemoryRepository;

    fn check(problem: Problem, repo: &MemoryRepository) -> Solution {
        solve(&problem, repo, &SolverConfig::default()).unwrap()
    }

    #[test]
    fn every_variable_gets_a_value() {
        let repo = MemoryRepository::new();
        // the unit clause satisfies everything, so b and c are never decided
        let sol = check(Problem::new(r#"("a") AND ("a" OR "b" OR NOT "c")"#), &repo);
        assert!(sol.is_satisfiable());
        let named = sol.named_assignment();
        assert_eq!(named.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert!(named["a"]);
        assert!(!named["b"]);
        assert!(satisfies(&sol.formula, &sol.assignment));
    }

    #[test]
    fn pre_assignment_is_respected() {
        let repo = MemoryRepository::new();
        let sol = check(
            Problem::new(r#"("a" OR "b")"#).with_assignment("a", false),
            &repo,
        );
        assert!(sol.is_satisfiable());
        assert!(!sol.named_assignment()["a"]);
        assert!(sol.named_assignment()["b"]);
        assert!(sol.warnings.is_empty());
    }

    #[test]
    fn pre_assignment_can_make_it_unsat() {
        let repo = MemoryRepository::new();
        let sol = check(
            Problem::new(r#"("a" OR "b") AND (NOT "b")"#).with_assignment("a", false),
            &repo,
        );
        assert!(!sol.is_satisfiable());
        assert_eq!(sol.to_record("F", "", None), None);
    }

    #[test]
    fn unknown_pre_assignment_is_a_warning() {
        let repo = MemoryRepository::new();
        let sol = check(
            Problem::new(r#"("a")"#)
                .with_assignment("zzz", true)
                .with_assignment("a", true),
            &repo,
        );
        assert!(sol.is_satisfiable());
        assert_eq!(sol.warnings, vec![UnknownVariable("zzz".to_owned())]);
        assert!(!sol.named_assignment().contains_key("zzz"));
    }

    #[test]
    fn pre_assignment_reaches_into_references() {
        let mut repo = MemoryRepository::new();
        repo.insert("R", r#"("x" OR "y")"#);
        let sol = check(
            Problem::new(r#"("R") AND ("z")"#).with_assignment("x", false),
            &repo,
        );
        assert!(sol.warnings.is_empty());
        assert!(sol.named_assignment()["y"]);
    }

    #[test]
    fn pre_assignment_last_value_wins() {
        let repo = MemoryRepository::new();
        let sol = check(
            Problem::new(r#"("a" OR "b")"#)
                .with_assignment("a", true)
                .with_assignment("a", false),
            &repo,
        );
        assert!(!sol.named_assignment()["a"]);
    }

    #[test]
    fn tseitin_hides_auxiliaries() {
        let mut repo = MemoryRepository::new();
        repo.insert("P", r#"("a") AND ("b")"#);
        let config = SolverConfig {
            negation: NegationPolicy::Tseitin,
            ..SolverConfig::default()
        };
        // not (a and b), with a forced: b has to be false
        let problem = Problem::new(r#"(NOT "P") AND ("a")"#);
        let sol = solve(&problem, &repo, &config).unwrap();
        assert!(sol.is_satisfiable());
        let named = sol.named_assignment();
        assert_eq!(named.len(), 2);
        assert!(named["a"]);
        assert!(!named["b"]);
    }

    #[test]
    fn literal_flip_is_not_negation() {
        let mut repo = MemoryRepository::new();
        repo.insert("P", r#"("a") AND ("b")"#);
        // flipping gives (not a) and (not b), which clashes with a
        let sol = check(Problem::new(r#"(NOT "P") AND ("a")"#), &repo);
        assert!(!sol.is_satisfiable());
    }

    #[test]
    fn record_for_storing() {
        let repo = MemoryRepository::new();
        let sol = check(Problem::new(r#"(NOT "a")"#), &repo);
        let record = sol.to_record("F", r#"(NOT "a")"#, Some("note")).unwrap();
        assert_eq!(record.name, "F");
        assert!(!record.assignment["a"]);
        assert_eq!(record.comment.as_deref(), Some("note"));
    }

    #[test]
    fn errors_propagate() {
        let repo = MemoryRepository::new();
        let err = solve(&Problem::new("(\"a\""), &repo, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
