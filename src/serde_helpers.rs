use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Answer lists keyed by subject, where a `null` entry stands for a blank answer.
pub mod answer_lists {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Vec<Option<String>>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(subject, answers)| {
                let answers = answers.into_iter().map(Option::unwrap_or_default).collect();
                (subject, answers)
            })
            .collect())
    }
}
