use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScanUnit {
    pub schema_version: u32,
    pub id: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidationMsg {
    pub schema_version: u32,
    pub kind: String,
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractSummary {
    pub schema_version: u32,
    /// Number of translation units written to the XLIFF file.
    pub units: usize,
    pub source_lang: String,
    pub out_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MergeSummary {
    pub schema_version: u32,
    /// Translation entries loaded from the XLIFF file.
    pub loaded: usize,
    pub applied: usize,
    pub missed: usize,
    /// True iff every traversed field had a non-empty translation.
    pub complete: bool,
    pub out_file: String,
}
