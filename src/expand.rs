//! # Substitution
//!
//! A quoted name is either a plain variable or the name of a formula in the
//! repository.  References get inlined: the stored text is parsed and
//! expanded recursively (sharing the one registry), and the resulting clauses
//! are disjoined with the rest of the clause they appear in.
//!
//! Disjoining a clause with a whole formula distributes:
//! `(A or (B1 and B2))` becomes `(A or B1) and (A or B2)`.  For the common
//! case of a single-clause formula that's just concatenation.
//!
//! Negated references are handled according to [`NegationPolicy`].

use crate::config::NegationPolicy;
use crate::data::*;
use crate::error::{Error, Result};
use crate::parser::{self, Atom};
use crate::registry::Registry;
use crate::repository::FormulaRepository;

/// The result of expanding a formula
#[derive(Debug, Clone)]
pub struct Expansion {
    pub formula: Formula,
    /// Doubles as the id -> name map
    pub registry: Registry,
}

/// Parse and fully expand `text` with a fresh registry.
///
/// `name` is the name the formula is going to be stored under, if any; a
/// reference back to it is reported as a cycle.
pub fn expand<R: FormulaRepository + ?Sized>(
    text: &str,
    name: Option<&str>,
    repo: &R,
    negation: NegationPolicy,
) -> Result<Expansion> {
    let mut registry = Registry::new();
    let formula = {
        let mut expander = Expander {
            registry: &mut registry,
            repo,
            negation,
            chain: name.map(str::to_owned).into_iter().collect(),
            definitions: Vec::new(),
        };
        let mut formula = expander.formula(text, "input")?;
        formula.append(&mut expander.definitions);
        formula
    };
    log::debug!(
        "Expanded to {} clauses over {} vars: {:?}",
        formula.len(),
        registry.len(),
        formula_to_ints(&formula)
    );
    Ok(Expansion { formula, registry })
}

struct Expander<'a, R: ?Sized> {
    registry: &'a mut Registry,
    repo: &'a R,
    negation: NegationPolicy,
    /// The stored formulas currently being expanded, outermost first
    chain: Vec<String>,
    /// Tseitin definitions, which go at the top level
    definitions: Formula,
}

impl<R: FormulaRepository + ?Sized> Expander<'_, R> {
    fn formula(&mut self, text: &str, context: &str) -> Result<Formula> {
        let syntax = parser::parse(text).map_err(|source| Error::Parse {
            context: context.to_owned(),
            source,
        })?;

        let mut formula = Formula::new();
        for atoms in &syntax {
            formula.extend(self.clause(atoms)?);
        }
        Ok(formula)
    }

    /// One syntactic clause can turn into several once references are
    /// distributed
    fn clause(&mut self, atoms: &[Atom]) -> Result<Formula> {
        let mut partials = vec![Clause::new()];

        for atom in atoms {
            match self.repo.lookup(&atom.name)? {
                Some(text) => {
                    let sub = self.reference(&atom.name, &text)?;
                    let disjunct = if atom.negated {
                        self.negate(&atom.name, sub)
                    } else {
                        sub
                    };
                    let before = partials.len();
                    partials = distribute(&partials, &disjunct);
                    if crosses_blowup_limit(before, partials.len()) {
                        log::warn!(
                            "A clause referencing {:?} expands to {} clauses",
                            atom.name,
                            partials.len()
                        );
                    }
                }
                None => {
                    let lit = Literal::new(self.registry.intern(&atom.name));
                    let lit = if atom.negated { !lit } else { lit };
                    for partial in &mut partials {
                        partial.push(lit);
                    }
                }
            }
        }

        Ok(partials)
    }

    fn reference(&mut self, name: &str, text: &str) -> Result<Formula> {
        if self.chain.iter().any(|n| n == name) {
            let mut chain = self.chain.clone();
            chain.push(name.to_owned());
            return Err(Error::CyclicReference { chain });
        }

        log::debug!("Expanding stored formula {:?}", name);
        self.chain.push(name.to_owned());
        let result = self.formula(text, &format!("stored formula {:?}", name));
        self.chain.pop();
        result
    }

    /// The clauses to disjoin in place of `NOT name`
    fn negate(&mut self, name: &str, formula: Formula) -> Formula {
        match self.negation {
            NegationPolicy::LiteralFlip => formula
                .into_iter()
                .map(|clause| clause.into_iter().map(|l| !l).collect())
                .collect(),
            NegationPolicy::Tseitin => {
                // t_i <-> not C_i, then the negation is (t_1 or ... or t_n)
                let mut disjunction = Clause::new();
                for clause in formula {
                    let t = Literal::new(self.registry.intern_auxiliary(name));
                    let mut back = Clause::new();
                    back.push(t);
                    for &l in clause.iter() {
                        let mut forth = Clause::new();
                        forth.push(!t);
                        forth.push(!l);
                        self.definitions.push(forth);
                        back.push(l);
                    }
                    self.definitions.push(back);
                    disjunction.push(t);
                }
                vec![disjunction]
            }
        }
    }
}

/// Expanding a single clause past this many clauses gets a warning
const BLOWUP_LIMIT: usize = 1 << 12;

/// Warn once per clause, when it first goes over the limit
fn crosses_blowup_limit(before: usize, after: usize) -> bool {
    before <= BLOWUP_LIMIT && after > BLOWUP_LIMIT
}

/// `(partial_1 and ... and partial_n) or (disjunct_1 and ... and disjunct_m)`
/// as n * m clauses
fn distribute(partials: &[Clause], disjunct: &[Clause]) -> Formula {
    let mut result = Formula::with_capacity(partials.len() * disjunct.len());
    for partial in partials {
        for clause in disjunct {
            let mut combined = partial.clone();
            combined.extend(clause.iter().copied());
            result.push(combined);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;

    fn ints(expansion: &Expansion) -> Vec<Vec<i32>> {
        formula_to_ints(&expansion.formula)
    }

    fn flip(text: &str, repo: &MemoryRepository) -> Result<Expansion> {
        expand(text, None, repo, NegationPolicy::LiteralFlip)
    }

    #[test]
    fn plain_variables() {
        let repo = MemoryRepository::new();
        let e = flip(r#"("a" OR NOT "b") AND ("b" OR "c")"#, &repo).unwrap();
        assert_eq!(ints(&e), vec![vec![1, -2], vec![2, 3]]);
        assert_eq!(e.registry.name_of(VarId(3)), Some("c"));
    }

    #[test]
    fn single_clause_reference_is_concatenated() {
        let mut repo = MemoryRepository::new();
        repo.insert("R", r#"(NOT "j" OR NOT "y")"#);
        let e = flip(r#"("R" OR "j") AND ("j" OR "y")"#, &repo).unwrap();
        assert_eq!(ints(&e), vec![vec![-1, -2, 1], vec![1, 2]]);
        assert_eq!(e.registry.name_of(VarId(1)), Some("j"));
        assert_eq!(e.registry.name_of(VarId(2)), Some("y"));
    }

    #[test]
    fn multi_clause_reference_is_distributed() {
        let mut repo = MemoryRepository::new();
        repo.insert("P", r#"("a") AND ("b")"#);
        let e = flip(r#"("c" OR "P" OR "d")"#, &repo).unwrap();
        assert_eq!(ints(&e), vec![vec![1, 2, 4], vec![1, 3, 4]]);
    }

    #[test]
    fn repeated_references_multiply_out() {
        let mut repo = MemoryRepository::new();
        repo.insert("P", r#"("a") AND ("b")"#);
        let text = format!("({})", vec![r#""P""#; 13].join(" OR "));
        let e = flip(&text, &repo).unwrap();
        assert_eq!(e.formula.len(), 1 << 13);
        assert!(e.formula.iter().all(|c| c.len() == 13));

        assert!(crosses_blowup_limit(BLOWUP_LIMIT, BLOWUP_LIMIT + 1));
        assert!(!crosses_blowup_limit(BLOWUP_LIMIT + 1, 2 * BLOWUP_LIMIT));
        assert!(!crosses_blowup_limit(1, BLOWUP_LIMIT));
    }

    #[test]
    fn reference_alone_appends_its_clauses() {
        let mut repo = MemoryRepository::new();
        repo.insert("P", r#"("a" OR "b") AND ("c")"#);
        let e = flip(r#"("P") AND ("a")"#, &repo).unwrap();
        assert_eq!(ints(&e), vec![vec![1, 2], vec![3], vec![1]]);
    }

    #[test]
    fn negated_reference_flips_literals() {
        let mut repo = MemoryRepository::new();
        repo.insert("P", r#"("a" OR NOT "b") AND ("c")"#);
        let e = flip(r#"(NOT "P")"#, &repo).unwrap();
        assert_eq!(ints(&e), vec![vec![-1, 2], vec![-3]]);
    }

    #[test]
    fn nested_references_share_the_registry() {
        let mut repo = MemoryRepository::new();
        repo.insert("Inner", r#"("x" OR "y")"#);
        repo.insert("Outer", r#"("Inner") AND (NOT "x")"#);
        let e = flip(r#"("Outer") AND ("y" OR "z")"#, &repo).unwrap();
        assert_eq!(ints(&e), vec![vec![1, 2], vec![-1], vec![2, 3]]);
        assert_eq!(e.registry.len(), 3);
    }

    #[test]
    fn tseitin_negation() {
        let mut repo = MemoryRepository::new();
        repo.insert("P", r#"("a") AND ("b")"#);
        let e = expand(r#"(NOT "P" OR "c")"#, None, &repo, NegationPolicy::Tseitin).unwrap();
        // a=1, b=2, t1=3, t2=4, c=5
        assert_eq!(
            ints(&e),
            vec![
                vec![3, 4, 5],
                vec![-3, -1],
                vec![3, 1],
                vec![-4, -2],
                vec![4, 2],
            ]
        );
        assert!(e.registry.is_auxiliary(VarId(3)));
        assert!(e.registry.is_auxiliary(VarId(4)));
        assert_eq!(e.registry.id_of("c"), Some(VarId(5)));
    }

    #[test]
    fn direct_cycle() {
        let mut repo = MemoryRepository::new();
        repo.insert("X", r#"("X" OR "a")"#);
        match flip(r#"("X")"#, &repo) {
            Err(Error::CyclicReference { chain }) => assert_eq!(chain, ["X", "X"]),
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn mutual_cycle() {
        let mut repo = MemoryRepository::new();
        repo.insert("A", r#"("B")"#);
        repo.insert("B", r#"(NOT "A" OR "c")"#);
        match flip(r#"("c") AND ("A")"#, &repo) {
            Err(Error::CyclicReference { chain }) => assert_eq!(chain, ["A", "B", "A"]),
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn self_reference_by_target_name() {
        let mut repo = MemoryRepository::new();
        repo.insert("X", r#"("a")"#);
        let err = expand(r#"("X" OR "b")"#, Some("X"), &repo, NegationPolicy::LiteralFlip);
        assert!(matches!(err, Err(Error::CyclicReference { .. })));
    }

    #[test]
    fn repeated_reference_is_not_a_cycle() {
        let mut repo = MemoryRepository::new();
        repo.insert("R", r#"("a")"#);
        let e = flip(r#"("R" OR "b") AND (NOT "R")"#, &repo).unwrap();
        assert_eq!(ints(&e), vec![vec![1, 2], vec![-1]]);
    }

    #[test]
    fn errors_name_the_stored_formula() {
        let mut repo = MemoryRepository::new();
        repo.insert("Bad", r#"("a" OR)"#);
        match flip(r#"("Bad")"#, &repo) {
            Err(Error::Parse { context, .. }) => assert_eq!(context, "stored formula \"Bad\""),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}
