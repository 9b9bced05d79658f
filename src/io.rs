//! Loading graphs and engine configuration from disk
//!
//! The content layer normally hands the engine in-memory lists; files are
//! how the diagnostic CLI and the test fixtures play that role. The format
//! is picked from the file extension.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::EngineConfig;
use crate::error::{IoError, IoResult};
use crate::model::GraphData;

/// Serialized formats understood by the loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// File extensions mapped to this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
        }
    }

    /// Detect the format of a path from its extension (case-insensitive)
    pub fn from_path(path: &Path) -> IoResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| IoError::UnknownExtension(path.to_path_buf()))?;

        [Format::Json, Format::Yaml]
            .into_iter()
            .find(|format| {
                format
                    .extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .ok_or_else(|| IoError::UnsupportedFormat(ext.to_string()))
    }

    /// Deserialize a value from text in this format
    pub fn parse<T: DeserializeOwned>(&self, text: &str) -> IoResult<T> {
        match self {
            Format::Json => Ok(serde_json::from_str(text)?),
            Format::Yaml => Ok(serde_yaml::from_str(text)?),
        }
    }
}

/// Read and deserialize a file, picking the format from its extension
pub fn load<T: DeserializeOwned>(path: &Path) -> IoResult<T> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    format.parse(&text)
}

/// Load a graph (`nodes` + `relationships`) from a JSON or YAML file
pub fn load_graph(path: &Path) -> IoResult<GraphData> {
    let graph: GraphData = load(path)?;
    tracing::debug!(
        path = %path.display(),
        nodes = graph.nodes.len(),
        relationships = graph.relationships.len(),
        "loaded graph"
    );
    Ok(graph)
}

/// Load and validate an engine configuration from a JSON or YAML file
pub fn load_config(path: &Path) -> IoResult<EngineConfig> {
    let config: EngineConfig = load(path)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    use crate::model::SemanticType;
    use crate::quality::QualityTier;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn format_from_path_is_case_insensitive() {
        assert_eq!(
            Format::from_path(Path::new("graph.JSON")).unwrap(),
            Format::Json
        );
        assert_eq!(
            Format::from_path(Path::new("engine.yml")).unwrap(),
            Format::Yaml
        );
    }

    #[test]
    fn format_from_path_rejects_unknown() {
        assert!(matches!(
            Format::from_path(Path::new("graph.ttl")),
            Err(IoError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Format::from_path(&PathBuf::from("noextension")),
            Err(IoError::UnknownExtension(_))
        ));
    }

    #[test]
    fn load_graph_from_json() {
        let file = write_temp(
            ".json",
            r#"{
                "nodes": [
                    {"id": "n1", "type": "SUPPLEMENT", "name": "Caffeine"},
                    {"id": "n2", "type": "NEUROTRANSMITTER", "name": "Adenosine"}
                ],
                "relationships": [
                    {"id": "r1", "sourceId": "n1", "targetId": "n2", "type": "INHIBITS", "strength": 0.9}
                ]
            }"#,
        );

        let graph = load_graph(file.path()).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[1].semantic_type, SemanticType::Neurotransmitter);
        assert_eq!(graph.relationships[0].strength, 0.9);
    }

    #[test]
    fn load_graph_from_yaml() {
        let file = write_temp(
            ".yaml",
            "nodes:\n  - id: a\n    type: PATHWAY\n    name: cAMP\nrelationships: []\n",
        );
        let graph = load_graph(file.path()).unwrap();
        assert_eq!(graph.nodes[0].semantic_type, SemanticType::Pathway);
    }

    #[test]
    fn load_config_validates() {
        let good = write_temp(".yaml", "initial_quality_tier: low\n");
        assert_eq!(
            load_config(good.path()).unwrap().initial_quality_tier,
            QualityTier::Low
        );

        let bad = write_temp(".json", r#"{"viewport": {"width": 0}}"#);
        assert!(matches!(load_config(bad.path()), Err(IoError::Config(_))));
    }

    #[test]
    fn load_reports_parse_errors() {
        let file = write_temp(".json", "{ not json");
        assert!(matches!(load_graph(file.path()), Err(IoError::Json(_))));
    }

    #[test]
    fn io_error_display() {
        let err = IoError::UnsupportedFormat("xyz".to_string());
        assert_eq!(err.to_string(), "unsupported format: xyz");
    }
}
