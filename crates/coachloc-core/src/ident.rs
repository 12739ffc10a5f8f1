//! Identifier codec for translatable coach content.
//!
//! The encoded token is the `trans-unit` id written to and read back from
//! XLIFF files. It is a wire contract: any change breaks round-tripping with
//! previously produced files.

use std::sync::OnceLock;

use regex::Regex;

use crate::CoachLocError;

/// Wire names of the translatable attributes.
pub mod attrs {
    pub const COACH_READABLE_NAME: &str = "coach-readable-name";
    pub const COACH_DESCRIPTION: &str = "coach-description";
    pub const QST_TEXT: &str = "text";
    pub const QST_INTRODUCTION: &str = "introduction";
    pub const QST_INFOTEXT: &str = "infotext";
    pub const QST_READ_MORE: &str = "read-more";
    pub const QST_INSTRUCTION: &str = "instruction";
    pub const OPT_TEXT: &str = "text";
    pub const OPT_SHORT: &str = "short";
    pub const OPT_COMMENT: &str = "comment";
    pub const DK_TEXT: &str = "text";
}

const RESERVED_PREFIXES: [&str; 3] = ["QST:", "OPT:", "DK:"];

/// Identity of one translatable string in a coach.
///
/// Equality and hashing are structural over all four fields; the encoded
/// token is only a transport representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitId {
    attribute: String,
    question_id: Option<String>,
    option_id: Option<String>,
    dictionary_key: Option<String>,
}

impl UnitId {
    /// Root-level attribute without an owner.
    pub fn attr(attribute: &str) -> Self {
        UnitId {
            attribute: attribute.to_string(),
            question_id: None,
            option_id: None,
            dictionary_key: None,
        }
    }

    /// Attribute owned by a question.
    pub fn question(attribute: &str, question_id: &str) -> Self {
        UnitId {
            question_id: Some(question_id.to_string()),
            ..UnitId::attr(attribute)
        }
    }

    /// Attribute owned by an option of a question.
    pub fn option(attribute: &str, question_id: &str, option_id: &str) -> Self {
        UnitId {
            question_id: Some(question_id.to_string()),
            option_id: Some(option_id.to_string()),
            ..UnitId::attr(attribute)
        }
    }

    /// Attribute owned by a dictionary entry.
    pub fn dictionary(attribute: &str, dictionary_key: &str) -> Self {
        UnitId {
            dictionary_key: Some(dictionary_key.to_string()),
            ..UnitId::attr(attribute)
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn question_id(&self) -> Option<&str> {
        self.question_id.as_deref()
    }

    pub fn option_id(&self) -> Option<&str> {
        self.option_id.as_deref()
    }

    pub fn dictionary_key(&self) -> Option<&str> {
        self.dictionary_key.as_deref()
    }
}

fn full_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:QST:(?P<qid>.*?)\|\|(?:OPT:(?P<oid>.*?)\|\|)?)?(?:DK:(?P<dkey>.*?)\|\|)?(?P<attr>.*)$",
        )
        .unwrap()
    })
}

fn legacy_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:QST:(?P<qid>.*?)\|\|(?:OPT:(?P<oid>.*?)\|\|)?)?(?P<attr>.*)$").unwrap()
    })
}

/// The identifier grammar, versioned by a single capability flag.
///
/// Two variants of the grammar exist in the wild: the current one with a
/// `DK:` branch for dictionary entries and an older one without it. Both are
/// served by this one codec; the legacy scheme also makes the traversal skip
/// the dictionary, so legacy runs never emit or consume dictionary ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdScheme {
    pub supports_dictionary: bool,
}

impl Default for IdScheme {
    fn default() -> Self {
        IdScheme {
            supports_dictionary: true,
        }
    }
}

impl IdScheme {
    /// The older grammar without the dictionary branch.
    pub fn legacy() -> Self {
        IdScheme {
            supports_dictionary: false,
        }
    }

    /// Render the token for `id`. Deterministic, no failure modes.
    pub fn encode(&self, id: &UnitId) -> String {
        let mut out = String::new();
        if let Some(qid) = id.question_id.as_deref() {
            out.push_str("QST:");
            out.push_str(qid);
            out.push_str("||");
            if let Some(oid) = id.option_id.as_deref() {
                out.push_str("OPT:");
                out.push_str(oid);
                out.push_str("||");
            }
        } else if let Some(dkey) = id.dictionary_key.as_deref() {
            if self.supports_dictionary {
                out.push_str("DK:");
                out.push_str(dkey);
                out.push_str("||");
            }
        }
        out.push_str(&id.attribute);
        out
    }

    /// Parse a token back into a [`UnitId`].
    ///
    /// The pattern is anchored start-to-end; a token that does not match in
    /// full, leaves the attribute empty, or leaves a reserved prefix
    /// (`QST:`/`OPT:`/`DK:`) dangling in the attribute is rejected. Empty
    /// captured groups map to unset fields.
    pub fn parse(&self, input: &str) -> std::result::Result<UnitId, CoachLocError> {
        let pattern = if self.supports_dictionary {
            full_pattern()
        } else {
            legacy_pattern()
        };
        let caps = pattern
            .captures(input)
            .ok_or_else(|| CoachLocError::MalformedIdentifier(input.to_string()))?;
        let attr = caps.name("attr").map(|m| m.as_str()).unwrap_or("");
        if attr.is_empty() || RESERVED_PREFIXES.iter().any(|p| attr.starts_with(p)) {
            return Err(CoachLocError::MalformedIdentifier(input.to_string()));
        }
        let group = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().to_string())
                .filter(|s| !s.is_empty())
        };
        Ok(UnitId {
            attribute: attr.to_string(),
            question_id: group("qid"),
            option_id: group("oid"),
            dictionary_key: group("dkey"),
        })
    }
}
