use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use coachloc_core::{CoachLocError, Result, XliffEntry};

/// Read all `<trans-unit>` elements of an XLIFF 1.2 file, in file order.
///
/// A `<target>` without `xml:lang` inherits the `target-language` of the
/// enclosing `<file>`. Inline markup inside `<source>`/`<target>` is dropped;
/// only the text content is kept. The file is fully consumed before this
/// returns, so the caller never holds the source open during the apply phase.
pub fn read_xliff_entries(path: &Path) -> Result<Vec<XliffEntry>> {
    let content = std::fs::read_to_string(path)?;
    let mut reader = Reader::from_str(&content);
    reader.trim_text(true);

    let mut out: Vec<XliffEntry> = Vec::new();
    let mut file_target: Option<String> = None;
    let mut cur: Option<XliffEntry> = None;
    // (lang, accumulated text) of the segment currently being read
    let mut seg: Option<(Option<String>, String)> = None;
    // <alt-trans> carries its own <source>/<target>, which are not the unit's
    let mut in_alt_trans = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"file" => {
                    file_target = attr_value(&e, b"target-language");
                }
                b"trans-unit" => {
                    cur = Some(new_entry(&e)?);
                }
                b"alt-trans" => {
                    in_alt_trans = true;
                }
                b"source" if cur.is_some() && !in_alt_trans => {
                    seg = Some((None, String::new()));
                }
                b"target" if cur.is_some() && !in_alt_trans => {
                    seg = Some((attr_value(&e, b"xml:lang"), String::new()));
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"file" => {
                    file_target = attr_value(&e, b"target-language");
                }
                b"trans-unit" => {
                    out.push(new_entry(&e)?);
                }
                b"target" if !in_alt_trans => {
                    if let Some(unit) = cur.as_mut() {
                        let lang = attr_value(&e, b"xml:lang")
                            .or_else(|| file_target.clone())
                            .unwrap_or_default();
                        unit.targets.push((lang, String::new()));
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"alt-trans" => {
                    in_alt_trans = false;
                }
                b"source" => {
                    if let (Some(unit), Some((_, text))) = (cur.as_mut(), seg.take()) {
                        unit.source = Some(text);
                    }
                }
                b"target" => {
                    if let (Some(unit), Some((lang, text))) = (cur.as_mut(), seg.take()) {
                        let lang = lang.or_else(|| file_target.clone()).unwrap_or_default();
                        unit.targets.push((lang, text));
                    }
                }
                b"trans-unit" => {
                    if let Some(unit) = cur.take() {
                        out.push(unit);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let Some((_, text)) = seg.as_mut() {
                    let v = t.unescape().unwrap_or_else(|_| {
                        std::borrow::Cow::Owned(String::from_utf8_lossy(t.as_ref()).into_owned())
                    });
                    text.push_str(&v);
                }
            }
            Ok(Event::CData(t)) => {
                if let Some((_, text)) = seg.as_mut() {
                    text.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CoachLocError::Xml(format!("{}: {e}", path.display())).into());
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn new_entry(e: &BytesStart) -> Result<XliffEntry> {
    let id = attr_value(e, b"id")
        .ok_or_else(|| CoachLocError::Xml("trans-unit without id".to_string()))?;
    Ok(XliffEntry {
        id,
        source: None,
        targets: Vec::new(),
    })
}

fn attr_value(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn read(content: &str) -> Vec<XliffEntry> {
        let tmp = NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        read_xliff_entries(tmp.path()).unwrap()
    }

    #[test]
    fn reads_units_with_and_without_targets() {
        let entries = read(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file original="coach.xml" source-language="en" target-language="de" datatype="xml">
    <body>
      <trans-unit id="coach-description">
        <source>Hello &amp; welcome</source>
        <target xml:lang="de">Hallo &amp; willkommen</target>
      </trans-unit>
      <trans-unit id="QST:q1||text">
        <source>Question</source>
      </trans-unit>
    </body>
  </file>
</xliff>
"#,
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "coach-description");
        assert_eq!(entries[0].source.as_deref(), Some("Hello & welcome"));
        assert_eq!(
            entries[0].targets,
            vec![("de".to_string(), "Hallo & willkommen".to_string())]
        );
        assert_eq!(entries[1].id, "QST:q1||text");
        assert!(entries[1].targets.is_empty());
    }

    #[test]
    fn target_without_lang_inherits_file_target_language() {
        let entries = read(
            r#"<xliff version="1.2">
  <file original="c.xml" source-language="en" target-language="fr" datatype="xml">
    <body>
      <trans-unit id="text"><source>a</source><target>b</target></trans-unit>
    </body>
  </file>
</xliff>"#,
        );
        assert_eq!(entries[0].targets, vec![("fr".to_string(), "b".to_string())]);
    }

    #[test]
    fn keeps_every_target_of_a_unit() {
        let entries = read(
            r#"<xliff version="1.2">
  <file original="c.xml" source-language="en" datatype="xml">
    <body>
      <trans-unit id="text">
        <source>a</source>
        <target xml:lang="de">b</target>
        <target xml:lang="fr">c</target>
      </trans-unit>
    </body>
  </file>
</xliff>"#,
        );
        assert_eq!(entries[0].targets.len(), 2);
        assert_eq!(entries[0].targets[1], ("fr".to_string(), "c".to_string()));
    }

    #[test]
    fn empty_target_element_counts_as_empty_text() {
        let entries = read(
            r#"<xliff version="1.2">
  <file original="c.xml" source-language="en" target-language="de" datatype="xml">
    <body>
      <trans-unit id="text"><source>a</source><target/></trans-unit>
    </body>
  </file>
</xliff>"#,
        );
        assert_eq!(entries[0].targets, vec![("de".to_string(), String::new())]);
    }

    #[test]
    fn alt_trans_segments_are_ignored() {
        let entries = read(
            r#"<xliff version="1.2">
  <file original="c.xml" source-language="en" target-language="de" datatype="xml">
    <body>
      <trans-unit id="text">
        <source>a</source>
        <target xml:lang="de">b</target>
        <alt-trans>
          <source>x</source>
          <target xml:lang="fr">y</target>
        </alt-trans>
      </trans-unit>
    </body>
  </file>
</xliff>"#,
        );
        assert_eq!(entries[0].source.as_deref(), Some("a"));
        assert_eq!(entries[0].targets, vec![("de".to_string(), "b".to_string())]);
    }

    #[test]
    fn rejects_unit_without_id() {
        let tmp = NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            r#"<xliff><file original="c.xml" source-language="en"><body>
               <trans-unit><source>a</source></trans-unit>
               </body></file></xliff>"#,
        )
        .unwrap();
        assert!(read_xliff_entries(tmp.path()).is_err());
    }
}
