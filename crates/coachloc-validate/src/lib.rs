use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use color_eyre::eyre::Result;
use regex::Regex;

use coachloc_core::TransUnit;

/// Result of one check.
#[derive(Debug)]
pub struct ValidationMessage {
    pub id: String,
    /// Machine-readable kind: "duplicate" | "empty" | "placeholder-check"
    pub kind: String,
    /// Free text is not meant for end-user output from the library; the CLI
    /// renders its own wording.
    pub message: String,
    /// For duplicate: how many times the id was seen before this occurrence
    pub duplicate_count: Option<usize>,
    /// For placeholder-check: placeholders found in the source text
    pub placeholders: Option<BTreeSet<String>>,
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\{\w+\}|\{\d+\}|%s|%d)").unwrap())
}

/// Run all checks over the scanned units of one coach.
///
/// Duplicate identifier tokens point at duplicate question or option ids in
/// the source document; such a coach would silently overwrite translations
/// during a merge, so it is worth flagging before sending the file out.
pub fn validate(units: &[TransUnit]) -> Result<Vec<ValidationMessage>> {
    let mut messages = Vec::new();

    // duplicates
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for u in units {
        if let Some(count) = seen.get(u.id.as_str()) {
            messages.push(ValidationMessage {
                id: u.id.clone(),
                kind: "duplicate".into(),
                message: String::new(),
                duplicate_count: Some(*count),
                placeholders: None,
            });
        }
        *seen.entry(&u.id).or_insert(0) += 1;
    }

    // empty sources (only always-emitted fields can be blank in a scan)
    for u in units {
        if u.source.trim().is_empty() {
            messages.push(ValidationMessage {
                id: u.id.clone(),
                kind: "empty".into(),
                message: String::new(),
                duplicate_count: None,
                placeholders: None,
            });
        }
    }

    // placeholder inventory, as a hint for translators
    for u in units {
        let placeholders: BTreeSet<String> = placeholder_pattern()
            .find_iter(&u.source)
            .map(|m| m.as_str().to_string())
            .collect();
        if !placeholders.is_empty() {
            messages.push(ValidationMessage {
                id: u.id.clone(),
                kind: "placeholder-check".into(),
                message: String::new(),
                duplicate_count: None,
                placeholders: Some(placeholders),
            });
        }
    }

    Ok(messages)
}
