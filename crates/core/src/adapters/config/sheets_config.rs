use crate::domain::portfolio::enrichment::ChangeStyle;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct SpreadsheetConfig {
    /// Path to the service account private key JSON file.
    pub priv_key: Box<str>,
    pub spreadsheet_id: Box<str>,
    pub sheet_name: Box<str>,
    /// Numeric id (`gid`) of the sheet, needed for formatting requests.
    #[serde(default)]
    pub sheet_gid: i32,
    #[serde(default = "default_apply_format")]
    pub apply_format: bool,
}

fn default_apply_format() -> bool {
    true
}

#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub change_style: ChangeStyle,
}
