use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::LengthPolicy;

/// Subjects in evaluation order, as printed on the exam booklet.
pub const DEFAULT_SUBJECT_ORDER: [&str; 7] = [
    "Türkçe",
    "inkılap Tarihi",
    "Sosyal Bilgiler",
    "Din Kültürü ve Ahlak Bilgisi",
    "Yabancı Dil",
    "Matematik",
    "Fen Bilimleri",
];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the data files (default: current directory)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub files: DataFiles,

    #[serde(default = "default_subject_order")]
    pub subject_order: Vec<String>,

    #[serde(default)]
    pub length_policy: LengthPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            files: DataFiles::default(),
            subject_order: default_subject_order(),
            length_policy: LengthPolicy::default(),
        }
    }
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// File names inside the data directory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DataFiles {
    #[serde(default = "default_answer_keys")]
    pub answer_keys: String,
    #[serde(default = "default_coefficients")]
    pub coefficients: String,
    #[serde(default = "default_roster")]
    pub roster: String,
    #[serde(default = "default_submissions")]
    pub submissions: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            answer_keys: default_answer_keys(),
            coefficients: default_coefficients(),
            roster: default_roster(),
            submissions: default_submissions(),
        }
    }
}

fn default_subject_order() -> Vec<String> {
    DEFAULT_SUBJECT_ORDER.iter().map(|s| s.to_string()).collect()
}

fn default_answer_keys() -> String {
    "answer_keys.json".to_string()
}

fn default_coefficients() -> String {
    "katsayilar.json".to_string()
}

fn default_roster() -> String {
    "student_codes.csv".to_string()
}

fn default_submissions() -> String {
    "student_answers.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.subject_order.len(), 7);
        assert_eq!(config.subject_order[0], "Türkçe");
        assert_eq!(config.files.coefficients, "katsayilar.json");
        assert_eq!(config.length_policy, LengthPolicy::Pad);
        assert_eq!(config.data_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
data_dir: /srv/exams
files:
  roster: ogrenciler.tsv
subject_order:
  - Matematik
  - Fen Bilimleri
length_policy: strict
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.data_dir(), PathBuf::from("/srv/exams"));
        assert_eq!(config.files.roster, "ogrenciler.tsv");
        assert_eq!(config.files.answer_keys, "answer_keys.json");
        assert_eq!(config.subject_order, vec!["Matematik", "Fen Bilimleri"]);
        assert_eq!(config.length_policy, LengthPolicy::Strict);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "subjects: [Matematik]";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
