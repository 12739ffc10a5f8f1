use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use coachloc_core::{Result, TransUnit, COACHLOC_SCHEMA_VERSION};

const XLIFF_NS: &str = "urn:oasis:names:tc:xliff:document:1.2";

/// Write a single-`<file>` XLIFF 1.2 document with all extracted units.
///
/// Each unit becomes `<trans-unit id="..."><source>...</source></trans-unit>`,
/// in submission order. No `<target>` elements are written; translators add
/// them. `original` names the coach file the units were pulled from.
pub fn write_xliff(
    path: &Path,
    units: &[TransUnit],
    source_lang: &str,
    original: &str,
) -> Result<()> {
    let file = File::create(path)?;
    let mut w = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut xliff = BytesStart::new("xliff");
    xliff.push_attribute(("version", "1.2"));
    xliff.push_attribute(("xmlns", XLIFF_NS));
    w.write_event(Event::Start(xliff))?;

    let mut file_el = BytesStart::new("file");
    file_el.push_attribute(("original", original));
    file_el.push_attribute(("source-language", source_lang));
    file_el.push_attribute(("datatype", "xml"));
    w.write_event(Event::Start(file_el))?;

    // Header with tool info so tooling can detect incompatible output.
    let version = COACHLOC_SCHEMA_VERSION.to_string();
    w.write_event(Event::Start(BytesStart::new("header")))?;
    let mut tool = BytesStart::new("tool");
    tool.push_attribute(("tool-id", "coachloc"));
    tool.push_attribute(("tool-name", "coachloc"));
    tool.push_attribute(("tool-version", version.as_str()));
    w.write_event(Event::Empty(tool))?;
    w.write_event(Event::End(BytesEnd::new("header")))?;

    w.write_event(Event::Start(BytesStart::new("body")))?;
    for u in units {
        let mut tu = BytesStart::new("trans-unit");
        tu.push_attribute(("id", u.id.as_str()));
        w.write_event(Event::Start(tu))?;
        w.write_event(Event::Start(BytesStart::new("source")))?;
        w.write_event(Event::Text(BytesText::new(&u.source)))?;
        w.write_event(Event::End(BytesEnd::new("source")))?;
        w.write_event(Event::End(BytesEnd::new("trans-unit")))?;
    }
    w.write_event(Event::End(BytesEnd::new("body")))?;

    w.write_event(Event::End(BytesEnd::new("file")))?;
    w.write_event(Event::End(BytesEnd::new("xliff")))?;

    w.into_inner().flush()?;
    Ok(())
}
