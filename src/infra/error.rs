//! Error taxonomy for an analytics run

/// Which of the two input datasets an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Venues,
    Sessions,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Venues => "venues",
            Dataset::Sessions => "sessions",
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Failed to fetch {dataset} dataset: {source:#}")]
    FetchFailure {
        dataset: Dataset,
        #[source]
        source: anyhow::Error,
    },

    #[error("No {dataset} data available")]
    MissingDataset { dataset: Dataset },

    #[error("Venue not found: {name:?}")]
    VenueNotFound { name: String },
}

impl AnalysisError {
    pub fn venue_not_found(name: impl Into<String>) -> Self {
        Self::VenueNotFound { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::venue_not_found("Ducati");
        assert_eq!(err.to_string(), "Venue not found: \"Ducati\"");

        let err = AnalysisError::MissingDataset { dataset: Dataset::Sessions };
        assert_eq!(err.to_string(), "No sessions data available");

        let err = AnalysisError::FetchFailure {
            dataset: Dataset::Venues,
            source: anyhow::anyhow!("connection refused"),
        };
        assert_eq!(err.to_string(), "Failed to fetch venues dataset: connection refused");
    }
}
