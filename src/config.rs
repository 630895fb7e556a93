//! Knobs for the solver, and reading them from the environment

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// How `NOT "name"` is expanded when `name` is a stored formula
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum NegationPolicy {
    /// Flip the sign of every literal of every clause.
    ///
    /// This is only the real negation when the stored formula is a single
    /// clause: `not ((a or b) and c)` becomes `(not a or not b) and not c`.
    #[default]
    LiteralFlip,
    /// Introduce an auxiliary variable per clause, equivalent to that
    /// clause being false.  Always sound.
    Tseitin,
}

/// How the search tree is walked.  Both give the same answers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Strategy {
    /// An explicit stack of frames
    #[default]
    Stack,
    /// Plain recursion
    Recursive,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("invalid value {value:?} for {key}, expected one of: {expected}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl FromStr for NegationPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flip" | "literal-flip" => Ok(Self::LiteralFlip),
            "tseitin" => Ok(Self::Tseitin),
            _ => Err(ConfigError {
                key: NEGATION_VAR,
                value: s.to_owned(),
                expected: "flip, tseitin",
            }),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stack" => Ok(Self::Stack),
            "recursive" => Ok(Self::Recursive),
            _ => Err(ConfigError {
                key: STRATEGY_VAR,
                value: s.to_owned(),
                expected: "stack, recursive",
            }),
        }
    }
}

/// Everything that changes how a single solve behaves
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct SolverConfig {
    pub negation: NegationPolicy,
    pub strategy: Strategy,
}

pub const STORE_VAR: &str = "SATISFIER_STORE";
pub const NEGATION_VAR: &str = "SATISFIER_NEGATION";
pub const STRATEGY_VAR: &str = "SATISFIER_STRATEGY";

pub const DEFAULT_STORE: &str = "formulas.json";

/// Configuration of the command line front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
    pub solver: SolverConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like `from_env`, with a custom source of variables
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut solver = SolverConfig::default();
        if let Some(value) = lookup(NEGATION_VAR) {
            solver.negation = value.parse()?;
        }
        if let Some(value) = lookup(STRATEGY_VAR) {
            solver.strategy = value.parse()?;
        }
        let store_path = lookup(STORE_VAR)
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORE.to_owned())
            .into();
        Ok(Self { store_path, solver })
    }
}
