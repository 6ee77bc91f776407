use serde::{Deserialize, Deserializer, Serialize};

/// One knowledge entry from the corpus.
///
/// Both fields are optional in the source JSON. Missing, `null` or
/// non-string values load as empty strings so matching never sees a hole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

impl Record {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Lower-cased `title + " " + description`.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// Records selected for one query, in corpus order. Never more than
/// [`crate::services::matcher::MAX_MATCHES`] entries.
pub type MatchSet = Vec<Record>;

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let record: Record = serde_json::from_str(r#"{"title": "Heat islands"}"#).unwrap();
        assert_eq!(record.title, "Heat islands");
        assert_eq!(record.description, "");
    }

    #[test]
    fn null_and_non_string_fields_become_empty() {
        let record: Record =
            serde_json::from_str(r#"{"title": null, "description": 42}"#).unwrap();
        assert_eq!(record, Record::default());
    }

    #[test]
    fn searchable_text_joins_with_single_space() {
        let record = Record::new("Flood Risk", "Urban DRAINAGE");
        assert_eq!(record.searchable_text(), "flood risk urban drainage");
    }
}
