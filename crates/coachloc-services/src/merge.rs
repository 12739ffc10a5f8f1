use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use coachloc_core::{CoachLocError, IdScheme, Result, UnitId, XliffEntry};
use coachloc_domain::{MergeSummary, SCHEMA_VERSION};

use crate::extract::source_lang_of;
use crate::walk::translatable_fields;

/// Translations for one target locale, keyed by decoded identifier.
///
/// Built once from the XLIFF source, read-only afterwards: the whole scan
/// phase completes before the first field is touched.
pub struct TranslationMemory {
    target_lang: String,
    by_id: HashMap<UnitId, Option<String>>,
}

impl TranslationMemory {
    pub fn new(target_lang: &str) -> Self {
        TranslationMemory {
            target_lang: target_lang.to_string(),
            by_id: HashMap::new(),
        }
    }

    /// Record one translation unit read from the interchange source.
    ///
    /// Fatal when the id does not parse, when the unit carries more than one
    /// target locale, or when its sole target locale is not the requested
    /// one. A unit without a target is remembered as untranslated. A later
    /// unit with the same id overwrites an earlier one.
    pub fn learn(
        &mut self,
        entry: &XliffEntry,
        scheme: &IdScheme,
    ) -> std::result::Result<(), CoachLocError> {
        let id = scheme.parse(&entry.id)?;
        let text = match entry.targets.as_slice() {
            [] => {
                debug!("Translation entry contains no target element -> {}", entry.id);
                None
            }
            [(lang, text)] => {
                if !locale_eq(lang, &self.target_lang) {
                    return Err(CoachLocError::LocaleMismatch {
                        id: entry.id.clone(),
                        requested: self.target_lang.clone(),
                        found: lang.clone(),
                    });
                }
                Some(text.clone())
            }
            _ => return Err(CoachLocError::AmbiguousTarget(entry.id.clone())),
        };
        self.by_id.insert(id, text);
        Ok(())
    }

    /// Non-empty translation for `id`, if the memory holds one.
    pub fn lookup(&self, id: &UnitId) -> Option<&str> {
        self.by_id
            .get(id)
            .and_then(|t| t.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn locale_eq(a: &str, b: &str) -> bool {
    normalize_locale(a) == normalize_locale(b)
}

fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}

/// Merge translations from an XLIFF file into a fresh copy of a coach.
///
/// Walks the coach in the same fixed order as extraction, overwrites every
/// field with a non-empty translation and counts the rest as misses. The
/// translated document is written in full even when translations are
/// missing; `complete` in the summary tells the two outcomes apart.
pub fn merge_coach(
    input: &Path,
    xlf: &Path,
    target_lang: &str,
    output: &Path,
    scheme: &IdScheme,
) -> Result<MergeSummary> {
    if input.as_os_str().is_empty() {
        return Err(CoachLocError::InvalidArgument("invalid input file".into()).into());
    }
    if xlf.as_os_str().is_empty() {
        return Err(CoachLocError::InvalidArgument("invalid XLF file".into()).into());
    }
    if output.as_os_str().is_empty() {
        return Err(CoachLocError::InvalidArgument("invalid output file".into()).into());
    }
    if target_lang.trim().is_empty() {
        return Err(CoachLocError::InvalidArgument("invalid target language".into()).into());
    }

    info!("Base coach for translations is '{}'", input.display());
    let mut coach = coachloc_coach_xml::load_coach(input)?;
    let _source_lang = source_lang_of(&coach);

    // scan phase: the memory is complete before the first field is touched
    info!("Reading translation entries from '{}'", xlf.display());
    let entries = coachloc_import_xliff::read_xliff_entries(xlf)?;
    let mut memory = TranslationMemory::new(target_lang);
    for entry in &entries {
        memory.learn(entry, scheme)?;
    }
    info!("Loaded {} translation entries", memory.len());

    // apply phase
    let fields = translatable_fields(&coach, scheme);
    let mut applied = 0usize;
    let mut missed = 0usize;
    for (id, field) in &fields {
        if let Some(text) = memory.lookup(id) {
            let text = text.to_string();
            field.set(&mut coach, text);
            debug!("Translation applied -> {}", scheme.encode(id));
            applied += 1;
        } else {
            warn!("Translation not found -> {}", scheme.encode(id));
            missed += 1;
        }
    }

    info!("Applied {applied} translations");
    if missed > 0 {
        warn!("Could not find {missed} translations");
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    coachloc_coach_xml::save_coach(output, &coach)?;
    info!("Translated coach written to '{}'", output.display());

    Ok(MergeSummary {
        schema_version: SCHEMA_VERSION,
        loaded: memory.len(),
        applied,
        missed,
        complete: missed == 0,
        out_file: output.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::units_of;
    use coachloc_coach_xml::{load_coach, save_coach, Coach};
    use std::fmt::Write as _;

    fn sample_coach() -> Coach {
        quick_xml::de::from_str(
            r#"<coach readableName="Demo Coach" language="en">
  <description>A small demo.</description>
  <questions>
    <question id="q1">
      <text>Do you back up your data?</text>
      <introduction>Backups protect against data loss.</introduction>
      <options>
        <option id="o1"><text>Yes</text><short>Y</short></option>
        <option id="o2"><text>No</text><comment>Consider backups.</comment></option>
      </options>
      <readMore>See the guide.</readMore>
      <instruction><text>Pick one.</text></instruction>
    </question>
  </questions>
  <dictionary>
    <entry key="backup">A copy of data.</entry>
  </dictionary>
</coach>"#,
        )
        .unwrap()
    }

    /// Hand-build an XLIFF file with one target per unit.
    fn write_translated_xliff(
        path: &Path,
        units: &[(String, Option<String>)],
        target_lang: &str,
    ) {
        let mut s = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <xliff version=\"1.2\" xmlns=\"urn:oasis:names:tc:xliff:document:1.2\">\n\
             <file original=\"coach.xml\" source-language=\"en\" \
             target-language=\"TL\" datatype=\"xml\">\n<body>\n"
                .replace("TL", target_lang),
        );
        for (id, target) in units {
            write!(s, "<trans-unit id=\"{id}\"><source>x</source>").unwrap();
            if let Some(t) = target {
                write!(s, "<target xml:lang=\"{target_lang}\">{t}</target>").unwrap();
            }
            s.push_str("</trans-unit>\n");
        }
        s.push_str("</body>\n</file>\n</xliff>\n");
        std::fs::write(path, s).unwrap();
    }

    fn translated(text: &str) -> String {
        format!("{text} [de]")
    }

    #[test]
    fn merge_with_full_memory_is_complete() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("coach.xml");
        let xlf = dir.path().join("de.xlf");
        let output = dir.path().join("coach-de.xml");

        let coach = sample_coach();
        save_coach(&input, &coach).unwrap();

        let scheme = IdScheme::default();
        let units: Vec<(String, Option<String>)> = units_of(&coach, &scheme)
            .into_iter()
            .map(|u| (u.id, Some(translated(&u.source))))
            .collect();
        write_translated_xliff(&xlf, &units, "de");

        let summary = merge_coach(&input, &xlf, "de", &output, &scheme).unwrap();
        assert!(summary.complete);
        assert_eq!(summary.applied, units.len());
        assert_eq!(summary.missed, 0);

        let merged = load_coach(&output).unwrap();
        assert_eq!(merged.readable_name, translated("Demo Coach"));
        assert_eq!(merged.description, translated("A small demo."));
        let q = &merged.questions.as_ref().unwrap().question[0];
        assert_eq!(q.text, translated("Do you back up your data?"));
        assert_eq!(
            q.introduction.as_deref(),
            Some(translated("Backups protect against data loss.").as_str())
        );
        assert_eq!(
            q.options.as_ref().unwrap().option[0].short.as_deref(),
            Some(translated("Y").as_str())
        );
        assert_eq!(
            merged.dictionary.as_ref().unwrap().entry[0].value,
            translated("A copy of data.")
        );
    }

    #[test]
    fn merge_with_empty_memory_keeps_original_text() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("coach.xml");
        let xlf = dir.path().join("de.xlf");
        let output = dir.path().join("coach-de.xml");

        let coach = sample_coach();
        save_coach(&input, &coach).unwrap();
        write_translated_xliff(&xlf, &[], "de");

        let scheme = IdScheme::default();
        let field_count = translatable_fields(&coach, &scheme).len();

        let summary = merge_coach(&input, &xlf, "de", &output, &scheme).unwrap();
        assert!(!summary.complete);
        assert_eq!(summary.applied, 0);
        assert_eq!(summary.missed, field_count);

        // the document is still written, textually unchanged
        let merged = load_coach(&output).unwrap();
        assert_eq!(merged, coach);
    }

    #[test]
    fn units_without_target_count_as_misses() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("coach.xml");
        let xlf = dir.path().join("de.xlf");
        let output = dir.path().join("coach-de.xml");

        let coach = sample_coach();
        save_coach(&input, &coach).unwrap();

        let scheme = IdScheme::default();
        let mut units: Vec<(String, Option<String>)> = units_of(&coach, &scheme)
            .into_iter()
            .map(|u| (u.id, Some(translated(&u.source))))
            .collect();
        units[0].1 = None; // no target element
        units[1].1 = Some(String::new()); // empty target
        write_translated_xliff(&xlf, &units, "de");

        let summary = merge_coach(&input, &xlf, "de", &output, &scheme).unwrap();
        assert!(!summary.complete);
        assert_eq!(summary.missed, 2);
        assert_eq!(summary.applied, units.len() - 2);

        let merged = load_coach(&output).unwrap();
        assert_eq!(merged.readable_name, "Demo Coach");
        assert_eq!(merged.description, "A small demo.");
    }

    #[test]
    fn locale_mismatch_aborts_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("coach.xml");
        let xlf = dir.path().join("fr.xlf");
        let output = dir.path().join("coach-de.xml");

        save_coach(&input, &sample_coach()).unwrap();
        write_translated_xliff(
            &xlf,
            &[("coach-description".into(), Some("Bonjour".into()))],
            "fr",
        );

        let err = merge_coach(&input, &xlf, "de", &output, &IdScheme::default()).unwrap_err();
        assert!(err.to_string().contains("does not match"));
        assert!(!output.exists());
    }

    #[test]
    fn ambiguous_target_is_fatal() {
        let mut memory = TranslationMemory::new("de");
        let entry = XliffEntry {
            id: "coach-description".into(),
            source: Some("x".into()),
            targets: vec![
                ("de".into(), "a".into()),
                ("fr".into(), "b".into()),
            ],
        };
        let err = memory.learn(&entry, &IdScheme::default()).unwrap_err();
        assert!(matches!(err, CoachLocError::AmbiguousTarget(_)));
    }

    #[test]
    fn malformed_identifier_aborts_the_merge() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("coach.xml");
        let xlf = dir.path().join("de.xlf");
        let output = dir.path().join("coach-de.xml");

        save_coach(&input, &sample_coach()).unwrap();
        write_translated_xliff(&xlf, &[("QST:foo".into(), Some("x".into()))], "de");

        let err = merge_coach(&input, &xlf, "de", &output, &IdScheme::default()).unwrap_err();
        assert!(err.to_string().contains("could not parse id"));
        assert!(!output.exists());
    }

    #[test]
    fn locale_comparison_is_normalized() {
        assert!(locale_eq("de", "DE"));
        assert!(locale_eq("de_CH", "de-ch"));
        assert!(!locale_eq("de", "de-ch"));
    }

    #[test]
    fn later_entries_overwrite_earlier_ones() {
        let mut memory = TranslationMemory::new("de");
        let scheme = IdScheme::default();
        for text in ["first", "second"] {
            memory
                .learn(
                    &XliffEntry {
                        id: "coach-description".into(),
                        source: None,
                        targets: vec![("de".into(), text.into())],
                    },
                    &scheme,
                )
                .unwrap();
        }
        assert_eq!(memory.len(), 1);
        assert_eq!(
            memory.lookup(&UnitId::attr("coach-description")),
            Some("second")
        );
    }
}
