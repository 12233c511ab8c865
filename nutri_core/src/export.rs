//! CSV export of saved entries.
//!
//! Writes the newest-first listing as a flat CSV table, one row per entry,
//! with the inputs and results spread into columns.

use crate::{Entry, Result};
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    timestamp: String,
    height_cm: f64,
    weight_kg: f64,
    age_years: i64,
    gender: &'a str,
    activity_level: &'a str,
    calories: i64,
    protein_g: i64,
    fat_g: i64,
    carb_g: i64,
    bmr: i64,
    activity_multiplier: f64,
}

impl<'a> From<&'a Entry> for CsvRow<'a> {
    fn from(entry: &'a Entry) -> Self {
        CsvRow {
            name: &entry.name,
            timestamp: crate::timestamp::format(&entry.timestamp),
            height_cm: entry.inputs.height_cm,
            weight_kg: entry.inputs.weight_kg,
            age_years: entry.inputs.age_years,
            gender: &entry.inputs.gender,
            activity_level: &entry.inputs.activity_level,
            calories: entry.results.calories,
            protein_g: entry.results.protein_g,
            fat_g: entry.results.fat_g,
            carb_g: entry.results.carb_g,
            bmr: entry.results.bmr,
            activity_multiplier: entry.results.activity_multiplier,
        }
    }
}

/// Write entries as CSV (with a header row) to any writer
pub fn write_entries_csv<W: Write>(entries: &[Entry], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for entry in entries {
        writer.serialize(CsvRow::from(entry))?;
    }

    writer.flush()?;
    Ok(())
}

/// Export entries to a CSV file, replacing it if present.
///
/// Returns the number of rows written. An empty listing still produces a
/// file, containing only the header row.
pub fn entries_to_csv(entries: &[Entry], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(csv_path)?;
    let mut buffered = std::io::BufWriter::new(file);

    if entries.is_empty() {
        // csv only emits headers alongside the first record
        writeln!(buffered, "{}", HEADER.join(","))?;
    } else {
        write_entries_csv(entries, &mut buffered)?;
    }

    let file = buffered
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} entries to {:?}", entries.len(), csv_path);
    Ok(entries.len())
}

const HEADER: [&str; 13] = [
    "name",
    "timestamp",
    "height_cm",
    "weight_kg",
    "age_years",
    "gender",
    "activity_level",
    "calories",
    "protein_g",
    "fat_g",
    "carb_g",
    "bmr",
    "activity_multiplier",
];
