use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod ident;

pub use ident::{attrs, IdScheme, UnitId};

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Stamped into generated XLIFF files so tooling can detect incompatible output.
pub const COACHLOC_SCHEMA_VERSION: u32 = 1;

/// Source language assumed when a coach declares none.
pub const DEFAULT_SOURCE_LANG: &str = "en";

/// Minimal unit used across crates to represent a single translatable string
/// pulled out of a coach (extraction direction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransUnit {
    /// Encoded identifier token, used as the `trans-unit` id in XLIFF.
    pub id: String,
    pub source: String,
}

/// One translation unit as read back from an XLIFF file (merge direction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XliffEntry {
    pub id: String,
    pub source: Option<String>,
    /// (locale, text) pairs; a well-formed file carries at most one.
    pub targets: Vec<(String, String)>,
}

/// Fatal conditions of the extract/merge pipeline. Missing translations are
/// not an error: they are counted and surfaced through the merge summary.
#[derive(Debug, Error)]
pub enum CoachLocError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("could not parse id '{0}'")]
    MalformedIdentifier(String),
    #[error("more than one target language in XLIFF file for id={0}")]
    AmbiguousTarget(String),
    #[error("requested target language '{requested}' does not match translation '{found}' (id={id})")]
    LocaleMismatch {
        id: String,
        requested: String,
        found: String,
    },
    #[error("xml: {0}")]
    Xml(String),
    #[error("{0}")]
    Other(String),
}
