use serde::{Deserialize, Serialize};
use std::fmt;

/// Default separator between the column name and its flags in a field tag
pub const DEFAULT_TAG_FIELD_SEP: &str = ",";

/// Format used to parse `Time` cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// RFC 3339 timestamps with a UTC offset, e.g. `2017-10-09T12:30:30+07:00`
    #[default]
    Rfc3339,

    /// A chrono `strftime` pattern; must carry an offset (`%z` / `%:z`)
    Custom(String),
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::Rfc3339 => f.write_str("RFC 3339"),
            TimeFormat::Custom(pattern) => f.write_str(pattern),
        }
    }
}

/// Configuration for building schemas and decoding rows.
///
/// Column names are always matched case-insensitively; there is no switch for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// How `Time` cells are parsed
    pub time_format: TimeFormat,

    /// Separator between the column name and flags in a packed field tag
    pub tag_field_sep: String,
}

impl BinderConfig {
    pub fn with_time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }

    pub fn with_tag_field_sep(mut self, sep: impl Into<String>) -> Self {
        self.tag_field_sep = sep.into();
        self
    }
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::Rfc3339,
            tag_field_sep: DEFAULT_TAG_FIELD_SEP.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BinderConfig::default();
        assert_eq!(config.time_format, TimeFormat::Rfc3339);
        assert_eq!(config.tag_field_sep, ",");
    }

    #[test]
    fn test_config_builders() {
        let config = BinderConfig::default()
            .with_time_format(TimeFormat::Custom("%Y-%m-%d %H:%M:%S %z".to_string()))
            .with_tag_field_sep(";");
        assert_eq!(
            config.time_format,
            TimeFormat::Custom("%Y-%m-%d %H:%M:%S %z".to_string())
        );
        assert_eq!(config.tag_field_sep, ";");
    }
}
