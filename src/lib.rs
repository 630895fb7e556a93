//! Satisfiability of CNF formulas that can reference other, stored, formulas
//!
//! ```
//! use satisfier::{solve, MemoryRepository, Problem, SolverConfig};
//!
//! let mut repo = MemoryRepository::new();
//! repo.insert("R", r#"(NOT "j" OR NOT "y")"#);
//!
//! let problem = Problem::new(r#"("R" OR "j") AND ("j" OR "y")"#);
//! let solution = solve(&problem, &repo, &SolverConfig::default()).unwrap();
//! assert!(solution.is_satisfiable());
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod expand;
pub mod parser;
pub mod registry;
pub mod repository;
pub mod search;
pub mod simplify;
pub mod solve;
pub mod vec_map;

pub use self::config::{Config, NegationPolicy, SolverConfig, Strategy};
pub use self::data::{Assignment, Clause, Conflict, Formula, Literal, VarId};
pub use self::error::{Error, ParseError, RepositoryError, UnknownVariable};
pub use self::parser::parse_assignments;
pub use self::registry::Registry;
pub use self::repository::{FormulaRecord, FormulaRepository, JsonFileRepository, MemoryRepository};
pub use self::search::{Outcome, SearchStats, Verdict};
pub use self::solve::{solve, Problem, Solution};
