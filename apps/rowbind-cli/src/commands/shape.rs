use crate::{
    config::{load_binder, ConfigOverrides},
    error::CliResult,
};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Write the resolved column bindings of a shape file.
pub fn describe<W: Write>(
    shape_path: &Path,
    overrides: &ConfigOverrides,
    out: &mut W,
) -> CliResult<()> {
    let binder = load_binder(shape_path, overrides)?;
    let schema = binder.schema();

    writeln!(out, "Shape: {}", schema.shape_name())?;
    writeln!(out, "Time format: {}", binder.config().time_format)?;
    writeln!(
        out,
        "Columns ({} bound of {} declared fields):",
        schema.descriptors().len(),
        schema.field_count()
    )?;

    for descriptor in schema.descriptors() {
        let field = schema.field_name(descriptor.field).unwrap_or("?");
        writeln!(
            out,
            "  {:<24} {:<16} {:<10} <- {}",
            descriptor.column,
            descriptor.kind.to_string(),
            if descriptor.required { "required" } else { "-" },
            field
        )?;
    }

    Ok(())
}

pub fn execute(shape_path: PathBuf, overrides: ConfigOverrides) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    describe(&shape_path, &overrides, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::TempDir;

    fn write_shape(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shape.yaml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_describe_lists_bound_columns() {
        let (_dir, path) = write_shape(
            r#"
name: employee
fields:
  - name: id
    type: u32
    tag: "Employee ID,required"
  - name: photo
    type: { list: u8 }
    tag: "-"
  - name: hired
    type: { optional: time }
"#,
        );

        let mut out = Vec::new();
        describe(&path, &ConfigOverrides::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Shape: employee");
        assert_eq!(lines[2], "Columns (2 bound of 3 declared fields):");
        assert!(lines[3].starts_with("  employee id"));
        assert!(lines[3].contains("u32"));
        assert!(lines[3].contains("required"));
        assert!(lines[3].ends_with("<- id"));
        assert!(lines[4].contains("optional time"));
        assert!(lines[4].ends_with("<- hired"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_describe_applies_time_format_override() {
        let (_dir, path) = write_shape("name: tick\nfields:\n  - name: at\n    type: time\n");
        let overrides = ConfigOverrides {
            time_format: Some("%Y-%m-%d".to_string()),
            ..Default::default()
        };

        let mut out = Vec::new();
        describe(&path, &overrides, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some("Time format: %Y-%m-%d"));
    }

    #[test]
    fn test_describe_rejects_unsupported_type() {
        let (_dir, path) = write_shape("name: bad\nfields:\n  - name: tags\n    type: { list: string }\n");

        let err = describe(&path, &ConfigOverrides::default(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Schema(_)));
    }
}
