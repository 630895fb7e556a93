//! Where named formulas live
//!
//! The solver only ever looks formulas up; storing results is up to the
//! caller.  [`MemoryRepository`] is for tests and embedding,
//! [`JsonFileRepository`] keeps everything in a JSON file:
//!
//! ```json
//! {
//!   "formulas": { "R": "(NOT \"j\" OR NOT \"y\")" },
//!   "assignments": { "R": { "j": false, "y": false } },
//!   "comments": { "R": "at most one of them" }
//! }
//! ```

use crate::error::RepositoryError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A formula that was found satisfiable, with the assignment that did it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormulaRecord {
    pub name: String,
    pub text: String,
    pub assignment: IndexMap<String, bool>,
    pub comment: Option<String>,
}

/// Named formula lookup and storage
pub trait FormulaRepository {
    /// The raw text of the formula called `name`, if there is one
    fn lookup(&self, name: &str) -> Result<Option<String>, RepositoryError>;

    /// Create or overwrite the record called `record.name`
    fn store(&mut self, record: FormulaRecord) -> Result<(), RepositoryError>;

    /// Every record, in the order they were first stored
    fn enumerate(&self) -> Result<Vec<FormulaRecord>, RepositoryError>;
}

/// Keeps everything in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    records: IndexMap<String, FormulaRecord>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a bare formula, with no assignment or comment
    pub fn insert(&mut self, name: &str, text: &str) {
        self.records.insert(
            name.to_owned(),
            FormulaRecord {
                name: name.to_owned(),
                text: text.to_owned(),
                ..FormulaRecord::default()
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&FormulaRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FormulaRepository for MemoryRepository {
    fn lookup(&self, name: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.records.get(name).map(|r| r.text.clone()))
    }

    fn store(&mut self, record: FormulaRecord) -> Result<(), RepositoryError> {
        self.records.insert(record.name.clone(), record);
        Ok(())
    }

    fn enumerate(&self) -> Result<Vec<FormulaRecord>, RepositoryError> {
        Ok(self.records.values().cloned().collect())
    }
}

/// The on-disk layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    formulas: IndexMap<String, String>,
    #[serde(default)]
    assignments: IndexMap<String, IndexMap<String, bool>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    comments: IndexMap<String, String>,
}

impl StoreFile {
    fn record(&self, name: &str, text: &str) -> FormulaRecord {
        FormulaRecord {
            name: name.to_owned(),
            text: text.to_owned(),
            assignment: self.assignments.get(name).cloned().unwrap_or_default(),
            comment: self.comments.get(name).cloned(),
        }
    }
}

/// A repository backed by a JSON file
///
/// The file is read once when opened and rewritten after every `store`.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    contents: StoreFile,
}

impl JsonFileRepository {
    /// Open the store at `path`.  A file that doesn't exist yet is an empty
    /// store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_owned();
        let contents = match File::open(&path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoreFile::default(),
            Err(e) => return Err(e.into()),
        };
        log::debug!(
            "Opened {} with {} formulas",
            path.display(),
            contents.formulas.len()
        );
        Ok(Self { path, contents })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, contents: &StoreFile) -> Result<(), RepositoryError> {
        // write to a sibling file first, so a failed write doesn't clobber
        // the old store
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, contents)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl FormulaRepository for JsonFileRepository {
    fn lookup(&self, name: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.contents.formulas.get(name).cloned())
    }

    fn store(&mut self, record: FormulaRecord) -> Result<(), RepositoryError> {
        let FormulaRecord {
            name,
            text,
            assignment,
            comment,
        } = record;
        // only what made it to disk becomes visible
        let mut contents = self.contents.clone();
        match comment {
            Some(comment) => {
                contents.comments.insert(name.clone(), comment);
            }
            None => {
                contents.comments.remove(&name);
            }
        }
        contents.assignments.insert(name.clone(), assignment);
        contents.formulas.insert(name, text);
        self.save(&contents)?;
        self.contents = contents;
        Ok(())
    }

    fn enumerate(&self) -> Result<Vec<FormulaRecord>, RepositoryError> {
        Ok(self
            .contents
            .formulas
            .iter()
            .map(|(name, text)| self.contents.record(name, text))
            .collect())
    }
}
