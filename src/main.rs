use satisfier::{
    parse_assignments, solve, Config, FormulaRepository, JsonFileRepository, Problem,
};
use std::error::Error;
use std::{env, process};

const USAGE: &str = "\
Usage:
  satisfier check NAME FORMULA [ASSIGNMENTS] [COMMENT]
  satisfier list

FORMULA looks like (\"R\" OR \"S\") AND (\"C\" OR NOT \"H\")
ASSIGNMENTS looks like R := true, S := false

Environment:
  SATISFIER_STORE     formula store (default formulas.json)
  SATISFIER_NEGATION  flip | tseitin
  SATISFIER_STRATEGY  stack | recursive
  RUST_LOG            log level";

fn check(config: &Config, args: &[String]) -> Result<(), Box<dyn Error>> {
    let (name, text) = match args {
        [name, text, ..] => (name, text),
        _ => return Err(USAGE.into()),
    };
    let assignments = parse_assignments(args.get(2).map_or("", String::as_str))?;
    let comment = args.get(3).map(String::as_str).filter(|c| !c.is_empty());

    let mut repo = JsonFileRepository::open(&config.store_path)?;
    let problem = Problem::new(text.as_str())
        .named(name.as_str())
        .with_assignments(assignments);
    let solution = solve(&problem, &repo, &config.solver)?;

    for warning in &solution.warnings {
        println!("Warning: {}", warning);
    }

    match solution.to_record(name, text, comment) {
        Some(record) => {
            println!("{} is SATISFIABLE", name);
            for (var, value) in &record.assignment {
                println!("{:>8} : {}", var, value);
            }
            repo.store(record)?;
        }
        None => println!("{} is UNSATISFIABLE", name),
    }

    Ok(())
}

fn list(config: &Config) -> Result<(), Box<dyn Error>> {
    let repo = JsonFileRepository::open(&config.store_path)?;
    let records = repo.enumerate()?;
    if records.is_empty() {
        println!("No formula stored.");
    }
    for record in records {
        println!("{} := {}", record.name, record.text);
        if let Some(comment) = &record.comment {
            println!("  # {}", comment);
        }
        for (var, value) in &record.assignment {
            println!("  {} := {}", var, value);
        }
    }
    Ok(())
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    match args.first().map(String::as_str) {
        Some("check") => check(&config, &args[1..]),
        Some("list") => list(&config),
        _ => Err(USAGE.into()),
    }
}

fn main() {
    pretty_env_logger::init();

    let args: Vec<_> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
