use std::io::Write;

use color_eyre::eyre::Result;

use coachloc_core::TransUnit;

/// Write scanned units as CSV, with a `lang` column when a language is given.
pub fn write_csv<W: Write>(writer: W, units: &[TransUnit], lang: Option<&str>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    match lang {
        Some(_) => wtr.write_record(["lang", "id", "source"])?,
        None => wtr.write_record(["id", "source"])?,
    }

    for u in units {
        match lang {
            Some(l) => wtr.write_record([l, &u.id, &u.source])?,
            None => wtr.write_record([&u.id, &u.source])?,
        }
    }

    wtr.flush()?;
    Ok(())
}
