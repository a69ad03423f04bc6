//! Column discovery for advisory tables.
//!
//! Input files name their columns loosely ("State Name", "Sowing Time",
//! "Recommended Varieties", ...). Headers are trimmed and lowercased, then each
//! logical column is located by substring; the first header that matches wins.

use crate::error::{AdvisorError, Result};
use crate::utils::normalize;
use tracing::debug;

/// The columns every advisory table must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalColumn {
    State,
    District,
    Irrigation,
    Season,
    Recommendation,
}

impl LogicalColumn {
    pub const ALL: [LogicalColumn; 5] = [
        LogicalColumn::State,
        LogicalColumn::District,
        LogicalColumn::Irrigation,
        LogicalColumn::Season,
        LogicalColumn::Recommendation,
    ];

    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            LogicalColumn::State => "state",
            LogicalColumn::District => "district",
            LogicalColumn::Irrigation => "irrigation",
            LogicalColumn::Season => "sowing/season",
            LogicalColumn::Recommendation => "recommendation",
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        match self {
            LogicalColumn::State => &["state"],
            LogicalColumn::District => &["district"],
            LogicalColumn::Irrigation => &["irrigation"],
            LogicalColumn::Season => &["sowing", "season"],
            LogicalColumn::Recommendation => &["recommend"],
        }
    }

    fn matches(&self, normalized_header: &str) -> bool {
        self.patterns()
            .iter()
            .any(|pattern| normalized_header.contains(pattern))
    }
}

/// Resolved header names (as they appear in the source file) for each logical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub state: String,
    pub district: String,
    pub irrigation: String,
    pub season: String,
    pub recommendation: String,
}

impl ColumnMapping {
    /// Locate every logical column among `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Schema`] listing all logical columns that could
    /// not be found.
    pub fn resolve<S: AsRef<str>>(crop: &str, headers: &[S]) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize(h.as_ref())).collect();

        let find = |column: LogicalColumn| -> Option<String> {
            normalized
                .iter()
                .position(|h| column.matches(h))
                .map(|idx| headers[idx].as_ref().to_string())
        };

        let found: Vec<(LogicalColumn, Option<String>)> = LogicalColumn::ALL
            .iter()
            .map(|&column| (column, find(column)))
            .collect();

        let missing: Vec<String> = found
            .iter()
            .filter(|(_, header)| header.is_none())
            .map(|(column, _)| column.name().to_string())
            .collect();

        if !missing.is_empty() {
            return Err(AdvisorError::Schema {
                crop: crop.to_string(),
                missing,
            });
        }

        let header_for = |column: LogicalColumn| -> String {
            found
                .iter()
                .find(|(c, _)| *c == column)
                .and_then(|(_, header)| header.clone())
                .unwrap_or_default()
        };

        let mapping = Self {
            state: header_for(LogicalColumn::State),
            district: header_for(LogicalColumn::District),
            irrigation: header_for(LogicalColumn::Irrigation),
            season: header_for(LogicalColumn::Season),
            recommendation: header_for(LogicalColumn::Recommendation),
        };
        debug!("Column mapping for {}: {:?}", crop, mapping);

        Ok(mapping)
    }
}
