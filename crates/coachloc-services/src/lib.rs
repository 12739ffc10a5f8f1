//! High-level orchestration layer over the lower coachloc crates.
//! Intentionally thin: exposes stable functions used by the CLI.

mod extract;
mod merge;
mod scan;
pub mod walk;

pub use coachloc_core::{IdScheme, Result, TransUnit, UnitId};
pub use extract::extract_coach;
pub use merge::{merge_coach, TranslationMemory};
pub use scan::scan_units;
pub use walk::{translatable_fields, FieldRef};
