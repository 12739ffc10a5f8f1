//! Coach document model and its XML binding.
//!
//! A coach is a hierarchical questionnaire: root attributes, questions with
//! options, and an optional dictionary of key/value strings. The pipeline
//! never changes the structure of a loaded coach, only leaf string fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use coachloc_core::{CoachLocError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "coach")]
pub struct Coach {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@readableName", default)]
    pub readable_name: String,
    #[serde(rename = "@language", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Questions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<Dictionary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Questions {
    #[serde(rename = "question", default)]
    pub question: Vec<Question>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infotext: Option<String>,
    #[serde(rename = "readMore", default, skip_serializing_if = "Option::is_none")]
    pub read_more: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<Instruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(rename = "option", default)]
    pub option: Vec<AnswerOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dictionary {
    #[serde(rename = "entry", default)]
    pub entry: Vec<DictionaryEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    #[serde(rename = "@key", default)]
    pub key: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// Load a coach from an XML file.
pub fn load_coach(path: &Path) -> Result<Coach> {
    let content = std::fs::read_to_string(path)?;
    let coach = quick_xml::de::from_str(&content)
        .map_err(|e| CoachLocError::Xml(format!("{}: {e}", path.display())))?;
    Ok(coach)
}

/// Write a coach to an XML file, pretty-printed, with an XML declaration.
pub fn save_coach(path: &Path, coach: &Coach) -> Result<()> {
    let mut body = String::new();
    let mut ser = quick_xml::se::Serializer::new(&mut body);
    ser.indent(' ', 2);
    coach
        .serialize(ser)
        .map_err(|e| CoachLocError::Xml(format!("{}: {e}", path.display())))?;
    let mut out = String::with_capacity(body.len() + 64);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&body);
    out.push('\n');
    std::fs::write(path, out)?;
    Ok(())
}
