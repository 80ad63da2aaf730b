//! Data validation utilities.

use std::path::Path;

use serde::Serialize;
use td_core::data::SimConfig;
use tracing::{debug, info};

use crate::{Result, ToolError};

/// Summary of a configuration file that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// File that was checked.
    pub path: String,
    /// RNG seed.
    pub seed: u64,
    /// Number of producers.
    pub producers: usize,
    /// Number of placed towers.
    pub towers: usize,
    /// Number of tech and skill nodes.
    pub tech_nodes: usize,
    /// Number of letter stages producers can buy.
    pub letter_stages: usize,
    /// Topological unlock order.
    pub unlock_order: Vec<String>,
}

/// Read and parse a RON configuration file without validating it.
pub fn load_config(path: &Path) -> Result<SimConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(SimConfig::from_ron(&path.display().to_string(), &text)?)
}

/// Parse and fully validate one configuration file.
///
/// # Errors
///
/// Returns the first configuration error: unreadable file, bad RON, empty
/// letter pool, bad word lengths, zero tower capacity, unknown unit,
/// duplicate node, missing prerequisite or cycle.
pub fn validate_config_file(path: &Path) -> Result<ValidationReport> {
    let config = load_config(path)?;
    config.validate()?;

    let graph = config.tech_graph()?;
    let stages = config.letter_stages(&graph);
    let report = ValidationReport {
        path: path.display().to_string(),
        seed: config.seed,
        producers: config.producers.len(),
        towers: config.towers.len(),
        tech_nodes: graph.len(),
        letter_stages: stages.len(),
        unlock_order: graph.unlock_order().to_vec(),
    };
    debug!(path = %report.path, nodes = report.tech_nodes, "Config validated");
    Ok(report)
}

/// Validate every `.ron` file in a directory, in file-name order.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or any data file fails
/// validation.
pub fn validate_data_directory(path: &Path) -> Result<Vec<ValidationReport>> {
    let entries = std::fs::read_dir(path).map_err(|source| ToolError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut files: Vec<_> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|file| file.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();

    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        reports.push(validate_config_file(file)?);
    }
    info!(count = reports.len(), "Data directory validated");
    Ok(reports)
}

/// Validate a file or every `.ron` file in a directory.
pub fn validate_path(path: &Path) -> Result<Vec<ValidationReport>> {
    if path.is_dir() {
        validate_data_directory(path)
    } else {
        Ok(vec![validate_config_file(path)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use td_core::error::GameError;
    use td_test_utils::fixtures::SAMPLE_CONFIG_RON;

    fn write_temp(name: &str, text: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("td_tools_{}_{name}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let file = dir.join("config.ron");
        std::fs::write(&file, text).expect("write config");
        file
    }

    #[test]
    fn test_sample_config_validates() {
        let file = write_temp("sample", SAMPLE_CONFIG_RON);
        let report = validate_config_file(&file).expect("valid");
        assert_eq!(report.producers, 2);
        assert_eq!(report.unlock_order, vec!["letters_fj", "letters_dk"]);
    }

    #[test]
    fn test_shipped_config_validates() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/data/sim_config.ron");
        let report = validate_config_file(&path).expect("shipped config valid");
        assert_eq!(report.producers, 4);
        assert_eq!(report.tech_nodes, 17);
        assert_eq!(report.letter_stages, 13);
    }

    #[test]
    fn test_directory_validation_finds_ron_files() {
        let file = write_temp("dir", SAMPLE_CONFIG_RON);
        let dir = file.parent().expect("parent");
        let reports = validate_path(dir).expect("valid directory");
        assert_eq!(reports.len(), 1);
    }

    #[test]
    fn test_cycle_is_reported() {
        let text = r#"SimConfig(
            tech: [
                TechNodeData(id: "a", name: "A", category: Utility, cost: 0, prereqs: ["b"]),
                TechNodeData(id: "b", name: "B", category: Utility, cost: 0, prereqs: ["a"]),
            ],
        )"#;
        let file = write_temp("cycle", text);
        let err = validate_config_file(&file).expect_err("cycle rejected");
        assert!(matches!(
            err,
            ToolError::Config(GameError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_bad_ron_is_a_parse_error() {
        let file = write_temp("bad", "SimConfig(seed: ");
        let err = validate_config_file(&file).expect_err("parse error");
        assert!(matches!(
            err,
            ToolError::Config(GameError::DataParseError { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = validate_config_file(Path::new("/nonexistent/td_config.ron"))
            .expect_err("missing file");
        assert!(matches!(err, ToolError::Io { .. }));
    }
}
