//! CSV ingestion for advisory tables.

use super::{ColumnMapping, CropDataset, VarietyRecord};
use crate::error::{Result, ResultExt};
use crate::utils::is_blank;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read a CSV file with every column as text.
///
/// Falls back to a pre-cleaned copy of the content (collapsed doubled quotes,
/// blank lines removed) when the file does not parse as-is.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    match CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard CSV loading failed for {}: {}", path.display(), e),
    }

    let content = std::fs::read_to_string(path)?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(clean_csv_content(&content)))
        .finish()
        .context(format!("Reading {}", path.display()))
}

/// Load one crop's advisory table from `path`.
pub fn load_dataset(crop: &str, path: impl AsRef<Path>) -> Result<CropDataset> {
    let path = path.as_ref();
    info!("Loading {} dataset from: {}", crop, path.display());

    let df = read_csv(path)?;
    let dataset = CropDataset::from_dataframe(crop, &df)?;

    info!("{} dataset loaded: {} records", crop, dataset.len());
    Ok(dataset)
}

impl CropDataset {
    /// Build a dataset from an already loaded frame.
    ///
    /// Rows without any recommendation text are kept for filtering but carry
    /// no training target.
    pub fn from_dataframe(crop: &str, df: &DataFrame) -> Result<Self> {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mapping = ColumnMapping::resolve(crop, &headers)?;

        let states = string_values(df, &mapping.state)?;
        let districts = string_values(df, &mapping.district)?;
        let irrigations = string_values(df, &mapping.irrigation)?;
        let seasons = string_values(df, &mapping.season)?;
        let recommendations = string_values(df, &mapping.recommendation)?;

        let records: Vec<VarietyRecord> = (0..df.height())
            .map(|row| {
                VarietyRecord::new(
                    states[row].as_str(),
                    districts[row].as_str(),
                    irrigations[row].as_str(),
                    seasons[row].as_str(),
                    recommendations[row].as_str(),
                )
            })
            .collect();

        let untrained = recommendations.iter().filter(|r| is_blank(r)).count();
        if untrained > 0 {
            warn!("{}: {} row(s) have no recommendation", crop, untrained);
        }

        CropDataset::new(crop, records)
    }
}

/// Column values as owned strings; nulls become empty strings.
fn string_values(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let series = df
        .column(column)
        .context(format!("Reading column '{}'", column))?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let values = series
        .str()?
        .into_iter()
        .map(|value| value.unwrap_or("").to_string())
        .collect();

    Ok(values)
}

fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_dataframe_maps_loose_headers() {
        let df = df! {
            "State Name" => ["Punjab", "Punjab"],
            "District" => ["Ludhiana", "Patiala"],
            "Irrigation Status" => ["Irrigated", "Rainfed"],
            "Sowing Time" => ["Rabi", "Rabi"],
            "Recommended Varieties" => ["HD-2967;PBW-550", "PBW-644"],
        }
        .unwrap();

        let dataset = CropDataset::from_dataframe("Wheat", &df).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].district, "Ludhiana");
        assert_eq!(dataset.records()[0].primary_variety, "HD-2967");
        assert_eq!(dataset.records()[1].season, "Rabi");
    }

    #[test]
    fn test_rows_without_recommendation_stay_filterable() {
        let df = df! {
            "state" => ["Punjab", "Bihar"],
            "district" => ["Ludhiana", "Patna"],
            "irrigation" => ["Irrigated", "Irrigated"],
            "season" => ["Rabi", "Rabi"],
            "recommended" => [Some("HD-2967;PBW-550"), None],
        }
        .unwrap();

        let dataset = CropDataset::from_dataframe("Wheat", &df).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].recommendation, "");
        assert_eq!(dataset.states(), vec!["Bihar", "Punjab"]);
        assert_eq!(dataset.training_rows().1.len(), 1);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let df = df! {
            "state" => ["Punjab"],
            "irrigation" => ["Irrigated"],
            "season" => ["Rabi"],
            "recommended" => ["HD-2967"],
        }
        .unwrap();

        let err = CropDataset::from_dataframe("Wheat", &df).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
        assert!(err.to_string().contains("district"));
    }

    #[test]
    fn test_clean_csv_content() {
        let raw = "state,district\n\n\"\"Punjab\"\",Ludhiana\n";
        assert_eq!(clean_csv_content(raw), "state,district\n\"Punjab\",Ludhiana");
    }
}
