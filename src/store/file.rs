use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::roster::parse_roster;
use super::{AnswerKeyStore, CoefficientStore, RosterStore, SubmissionStore};
use crate::config::Config;
use crate::scoring::{AnswerKeys, CoefficientTable, Roster, SubmissionBook};

/// Data files in one directory, read fresh on every call.
#[derive(Debug, Clone)]
pub struct FileStore {
    pub answer_keys: PathBuf,
    pub coefficients: PathBuf,
    pub roster: PathBuf,
    pub submissions: PathBuf,
}

impl FileStore {
    pub fn from_config(config: &Config) -> Self {
        let dir = config.data_dir();
        Self {
            answer_keys: dir.join(&config.files.answer_keys),
            coefficients: dir.join(&config.files.coefficients),
            roster: dir.join(&config.files.roster),
            submissions: dir.join(&config.files.submissions),
        }
    }
}

/// Load a JSON file; a missing file loads as the default (empty) value.
pub fn load_json<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        debug!(path = %path.display(), "data file missing, using empty value");
        return Ok(T::default());
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Save a value as pretty JSON atomically
///
/// The file is never left half-written: the content goes to a temporary file
/// that replaces the target on commit. Parent directories are created as needed.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;

    Ok(())
}

impl AnswerKeyStore for FileStore {
    fn load_answer_keys(&self) -> Result<AnswerKeys> {
        let keys: AnswerKeys = load_json(&self.answer_keys)?;
        debug!(exams = keys.exams.len(), "loaded answer keys");
        Ok(keys)
    }
}

impl CoefficientStore for FileStore {
    fn load_coefficients(&self) -> Result<CoefficientTable> {
        load_json(&self.coefficients)
    }
}

impl RosterStore for FileStore {
    fn load_roster(&self) -> Result<Roster> {
        if !self.roster.exists() {
            debug!(path = %self.roster.display(), "roster file missing, using empty roster");
            return Ok(Roster::new());
        }
        let text = fs::read_to_string(&self.roster)
            .with_context(|| format!("Failed to read roster at {}", self.roster.display()))?;
        let roster = parse_roster(&text);
        debug!(students = roster.len(), "loaded roster");
        Ok(roster)
    }
}

impl SubmissionStore for FileStore {
    fn load_submissions(&self) -> Result<SubmissionBook> {
        load_json(&self.submissions)
    }

    fn save_submissions(&mut self, book: &SubmissionBook) -> Result<()> {
        save_json(&self.submissions, book)?;
        info!(path = %self.submissions.display(), "saved submissions");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Submission;
    use std::env;

    fn temp_store(name: &str) -> (PathBuf, FileStore) {
        let dir = env::temp_dir().join(format!("exam_net_test_{}", name));
        let _ = fs::remove_dir_all(&dir);
        let config = Config {
            data_dir: Some(dir.clone()),
            ..Config::default()
        };
        (dir, FileStore::from_config(&config))
    }

    #[test]
    fn test_missing_files_load_empty() {
        let (dir, store) = temp_store("missing");

        assert!(store.load_answer_keys().unwrap().exams.is_empty());
        assert!(store.load_coefficients().unwrap().weights.is_empty());
        assert!(store.load_roster().unwrap().is_empty());
        assert!(store.load_submissions().unwrap().exams.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_and_load_submissions_roundtrip() {
        let (dir, mut store) = temp_store("roundtrip");

        let mut book = SubmissionBook::default();
        book.record(
            "D1",
            "1001",
            Submission::default().with_subject("Türkçe", &["A", "", "Ç"]),
        );
        store.save_submissions(&book).unwrap();

        let loaded = store.load_submissions().unwrap();
        assert_eq!(loaded, book);

        // Non-ASCII stays readable on disk
        let raw = fs::read_to_string(&store.submissions).unwrap();
        assert!(raw.contains("Türkçe"));
        assert!(raw.contains("\n  \"D1\""));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_all_files() {
        let (dir, store) = temp_store("all_files");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&store.answer_keys, r#"{"D1": {"Matematik": ["A", "B"]}}"#).unwrap();
        fs::write(&store.coefficients, r#"{"Matematik": 4, "temel_puan": 100}"#).unwrap();
        fs::write(&store.roster, "ogrenci_kodu,ogrenci_adi\n1001,Ayşe Yılmaz\n").unwrap();
        fs::write(&store.submissions, r#"{"D1": {"1001": {"Matematik": ["A", null]}}}"#).unwrap();

        let keys = store.load_answer_keys().unwrap();
        assert_eq!(keys.exam("D1").unwrap().answers("Matematik").unwrap().len(), 2);
        assert_eq!(store.load_coefficients().unwrap().base_score(), 100.0);
        assert_eq!(store.load_roster().unwrap().display_name("1001"), "Ayşe Yılmaz");
        let book = store.load_submissions().unwrap();
        assert_eq!(book.get("D1", "1001").unwrap().answers("Matematik"), ["A", ""]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_coefficients_fail() {
        let (dir, store) = temp_store("bad_coefficients");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&store.coefficients, r#"{"Matematik": "four"}"#).unwrap();

        let err = store.load_coefficients().unwrap_err();
        assert!(format!("{:#}", err).contains("katsayilar.json"));

        let _ = fs::remove_dir_all(&dir);
    }
}
