use crate::error::{CliError, CliResult};
use rowbind_core::{BinderConfig, DynamicRecord, RecordBinder, Shape, TimeFormat};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Shape file structure: a record shape plus optional binder settings
///
/// ```yaml
/// name: employee
/// config:
///   time_format: { custom: "%Y-%m-%d %H:%M:%S %z" }
/// fields:
///   - name: id
///     type: u32
///     tag: "Employee ID,required"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeFile {
    #[serde(flatten)]
    pub shape: Shape,

    #[serde(default)]
    pub config: BinderConfig,
}

/// Overrides given on the command line, taking precedence over the shape file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub time_format: Option<String>,
    pub tag_sep: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: BinderConfig) -> CliResult<BinderConfig> {
        if let Some(format) = &self.time_format {
            config.time_format = match format.as_str() {
                "rfc3339" | "RFC3339" => TimeFormat::Rfc3339,
                pattern => TimeFormat::Custom(pattern.to_string()),
            };
        }
        if let Some(sep) = &self.tag_sep {
            if sep.is_empty() {
                return Err(CliError::InvalidConfig(
                    "tag separator must not be empty".to_string(),
                ));
            }
            config.tag_field_sep = sep.clone();
        }
        Ok(config)
    }
}

pub fn load_shape_file(path: &Path) -> CliResult<ShapeFile> {
    let contents = fs::read_to_string(path)?;
    let file: ShapeFile = serde_yaml::from_str(&contents)?;
    Ok(file)
}

/// Load a shape file and build a binder for it.
pub fn load_binder(
    path: &Path,
    overrides: &ConfigOverrides,
) -> CliResult<RecordBinder<DynamicRecord>> {
    let file = load_shape_file(path)?;
    let config = overrides.apply(file.config)?;
    let binder = RecordBinder::from_shape(&file.shape, config)?;
    Ok(binder)
}
