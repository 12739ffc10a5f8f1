use std::path::Path;

use coachloc_coach_xml::Coach;
use coachloc_core::{IdScheme, Result, TransUnit};

use crate::walk::translatable_fields;

/// Load a coach and return its translatable units, in traversal order.
pub fn scan_units(coach_path: &Path, scheme: &IdScheme) -> Result<Vec<TransUnit>> {
    let coach = coachloc_coach_xml::load_coach(coach_path)?;
    Ok(units_of(&coach, scheme))
}

pub(crate) fn units_of(coach: &Coach, scheme: &IdScheme) -> Vec<TransUnit> {
    translatable_fields(coach, scheme)
        .iter()
        .map(|(id, field)| TransUnit {
            id: scheme.encode(id),
            source: field.get(coach).unwrap_or_default().to_string(),
        })
        .collect()
}
