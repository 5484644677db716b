//! Error types for feed loading and registry configuration.

use thiserror::Error;

/// Failure to load one brand's feed.
///
/// The orchestrator turns any of these into an error card for the affected
/// brand; they never abort a run.
#[derive(Error, Debug)]
pub enum FeedError {
    /// The server answered with a non-success status.
    #[error("Failed to load {location}: {status}")]
    Load { location: String, status: u16 },

    #[error("Failed to load {location}: {source}")]
    Transport {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The body was not a feed document.
    #[error("Failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// The feed loaded but its `generated_at` is not a timestamp.
    #[error("Invalid generated_at in {location}: {value}")]
    Timestamp { location: String, value: String },

    #[error("Invalid location {location}: {source}")]
    Location {
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported scheme in {location}")]
    UnsupportedScheme { location: String },
}

/// Invalid brand registry configuration.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse registry {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Registry defines no brands")]
    Empty,

    #[error("Brand #{index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },

    #[error("Duplicate brand key: {0}")]
    DuplicateKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_message_names_location_and_status() {
        let e = FeedError::Load {
            location: "./data/vodafone.json".to_string(),
            status: 404,
        };
        assert_eq!(e.to_string(), "Failed to load ./data/vodafone.json: 404");
    }

    #[test]
    fn test_timestamp_error_message() {
        let e = FeedError::Timestamp {
            location: "./data/ee.json".to_string(),
            value: "yesterday".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid generated_at in ./data/ee.json: yesterday");
    }

    #[test]
    fn test_parse_error_message() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = FeedError::Parse {
            location: "feed.json".to_string(),
            source,
        };
        assert!(e.to_string().starts_with("Failed to parse feed.json: "));
    }
}
