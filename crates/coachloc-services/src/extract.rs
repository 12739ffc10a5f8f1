use std::path::Path;

use tracing::info;

use coachloc_coach_xml::Coach;
use coachloc_core::{CoachLocError, IdScheme, Result, DEFAULT_SOURCE_LANG};
use coachloc_domain::{ExtractSummary, SCHEMA_VERSION};

use crate::scan::units_of;

/// Extract all translatable content of a coach into an XLIFF file.
///
/// The source document is never mutated; the generated file carries one
/// translation unit per traversed field, in traversal order, with the
/// encoded identifier as the unit id.
pub fn extract_coach(input: &Path, output: &Path, scheme: &IdScheme) -> Result<ExtractSummary> {
    if input.as_os_str().is_empty() {
        return Err(CoachLocError::InvalidArgument("invalid input file".into()).into());
    }
    if output.as_os_str().is_empty() {
        return Err(CoachLocError::InvalidArgument("invalid output file".into()).into());
    }

    let coach = coachloc_coach_xml::load_coach(input)?;

    info!(
        "Starting extraction of translatable content from '{}'",
        input.display()
    );

    let source_lang = source_lang_of(&coach);
    let units = units_of(&coach, scheme);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let original = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("coach.xml");
    coachloc_export_xliff::write_xliff(output, &units, &source_lang, original)?;

    info!("Translatable content extracted to '{}'", output.display());

    Ok(ExtractSummary {
        schema_version: SCHEMA_VERSION,
        units: units.len(),
        source_lang,
        out_file: output.display().to_string(),
    })
}

/// Declared source language of the coach, or the fixed fallback.
pub(crate) fn source_lang_of(coach: &Coach) -> String {
    match coach
        .language
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(lang) => {
            info!("Detected source language is '{lang}'");
            lang.to_string()
        }
        None => {
            info!("No source language set, falling back to '{DEFAULT_SOURCE_LANG}'");
            DEFAULT_SOURCE_LANG.to_string()
        }
    }
}
