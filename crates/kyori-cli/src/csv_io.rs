//! CSV input and output for the command line.
//!
//! Input cells arrive as text; blank cells become `Null` so a missing postal
//! code reads the same as one from a typed source. Output is UTF-8 with a BOM
//! so spreadsheet software opens Japanese headers correctly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use kyori_core::{AugmentedTable, CellValue, MemoryTable};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Reads a CSV file into a [`MemoryTable`]. The first record is the header.
///
/// # Errors
///
/// Returns an error when the file cannot be opened, is not valid CSV, or has
/// no header record.
pub fn read_table(path: &Path) -> anyhow::Result<MemoryTable> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        // A BOM from a previous export sticks to the first header.
        .map(|h| h.trim_start_matches('\u{feff}').to_owned())
        .collect();
    if columns.is_empty() {
        anyhow::bail!("{} has no header record", path.display());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(cell_from_field).collect());
    }
    Ok(MemoryTable::new(columns, rows))
}

fn cell_from_field(field: &str) -> CellValue {
    if field.is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(field.to_owned())
    }
}

/// Writes an [`AugmentedTable`] to `path` as UTF-8 CSV with a leading BOM.
///
/// # Errors
///
/// Returns an error when the file cannot be created or a record fails to
/// serialise.
pub fn write_table(path: &Path, table: &AugmentedTable) -> anyhow::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;
    write_csv(file, table)
}

fn write_csv<W: Write>(writer: W, table: &AugmentedTable) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.columns())?;
    for row in 0..table.row_count() {
        let record: Vec<String> = (0..table.columns().len())
            .map(|col| table.cell(row, col).to_string())
            .collect();
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}
