use crate::camp::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "campName")]
    pub camp_name: String,
    #[serde(rename = "campDate")]
    pub camp_date: Option<String>,
    /// Relative to the directory of the configuration file.
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

/// The header of the produced report.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub camp: String,
    pub date: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    /// One of `json`, `csv` or `xlsx`.
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// A source described only by its path. The provider is guessed from the
    /// file extension.
    pub fn from_path(path: &str, excel_worksheet_name: Option<String>) -> CampResult<FileSource> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let provider = match ext.as_str() {
            "json" => "json",
            "csv" => "csv",
            "xlsx" | "xlsm" => "xlsx",
            _ => {
                return UnknownProviderSnafu {
                    provider: ext,
                    path: path.to_string(),
                }
                .fail()
            }
        };
        Ok(FileSource {
            provider: provider.to_string(),
            file_path: path.to_string(),
            excel_worksheet_name,
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CampConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "rosterSources")]
    pub roster_sources: Vec<FileSource>,
    #[serde(rename = "stampSources", default)]
    pub stamp_sources: Vec<FileSource>,
    #[serde(rename = "levelTestSources", default)]
    pub level_test_sources: Vec<FileSource>,
}

pub fn read_config(path: &str) -> CampResult<CampConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: CampConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Reads a reference report.
pub fn read_summary(path: &str) -> CampResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}
