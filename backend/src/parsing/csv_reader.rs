use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::path::Path;

/// Read a delimited file into a DataFrame whose columns are all strings.
///
/// Type conversion happens in the table loaders so that decimal commas,
/// Danish dates and malformed cells follow one policy regardless of what
/// polars would infer.
pub fn read_string_frame(path: &Path, separator: char) -> Result<DataFrame> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    if !separator.is_ascii() {
        bail!("Separator '{}' is not an ASCII character", separator);
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_separator(separator as u8))
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to open {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV {}", path.display()))?;

    Ok(df)
}

/// A required string column.
pub fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    df.column(name)
        .with_context(|| format!("Missing column '{}'", name))?
        .str()
        .with_context(|| format!("Column '{}' is not a string column", name))
}

/// An optional string column; absent columns yield `None`.
pub fn optional_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a StringChunked> {
    if name.is_empty() {
        return None;
    }
    df.column(name).ok().and_then(|c| c.str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_everything_as_strings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id;value").unwrap();
        writeln!(file, "1;2,5").unwrap();
        writeln!(file, "2;").unwrap();

        let df = read_string_frame(file.path(), ';').unwrap();
        assert_eq!(df.height(), 2);

        let ids = required_column(&df, "id").unwrap();
        assert_eq!(ids.get(0), Some("1"));
        let values = required_column(&df, "value").unwrap();
        assert_eq!(values.get(0), Some("2,5"));
        assert_eq!(values.get(1), None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_string_frame(Path::new("/nonexistent/usage.csv"), ',').unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_missing_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a,b").unwrap();
        writeln!(file, "1,2").unwrap();

        let df = read_string_frame(file.path(), ',').unwrap();
        assert!(required_column(&df, "c").is_err());
        assert!(optional_column(&df, "c").is_none());
        assert!(optional_column(&df, "").is_none());
        assert!(optional_column(&df, "b").is_some());
    }
}
