use langtable::formats::FormatType;
use std::path::Path;
use std::str::FromStr;

/// Validate file path exists and is readable
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &Path) -> Result<(), String> {
    if path.is_dir() {
        return Err(format!("Output path is a directory: {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Cannot create output directory: {}", e))?;
        }
    }

    Ok(())
}

/// Validate the language directory holding the translation trees
pub fn validate_lang_dir(path: &Path) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!(
            "Language directory does not exist: {}",
            path.display()
        ));
    }
    Ok(())
}

/// Parse a format name, listing the supported ones on failure
pub fn parse_format(format: &str) -> Result<FormatType, String> {
    if format.trim().is_empty() {
        return Err("Format cannot be empty".to_string());
    }

    FormatType::from_str(format).map_err(|_| {
        format!(
            "Unsupported format: {}. Supported formats: {}",
            format,
            supported_formats()
        )
    })
}

/// Format inferred from an output or input file's extension
pub fn format_from_path(path: &str) -> Result<FormatType, String> {
    langtable::infer_format_from_extension(path).ok_or_else(|| {
        format!(
            "Cannot infer format from path: {}. Supported extensions: {}",
            path,
            supported_formats()
        )
    })
}

pub fn supported_formats() -> String {
    FormatType::ALL
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("csv").unwrap(), FormatType::Csv);
        assert_eq!(parse_format("Excel").unwrap(), FormatType::Xlsx);
        let err = parse_format("yaml").unwrap_err();
        assert!(err.contains("csv, json, xml, xlsx"), "{}", err);
        assert!(parse_format(" ").is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(format_from_path("out/missing.xml").unwrap(), FormatType::Xml);
        assert!(format_from_path("out/missing").is_err());
    }

    #[test]
    fn test_validate_output_path_creates_parent() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nested").join("translations.csv");
        validate_output_path(&output).unwrap();
        assert!(dir.path().join("nested").is_dir());
        assert!(validate_output_path(dir.path()).is_err());
    }

    #[test]
    fn test_validate_file_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("translations.csv");
        assert!(validate_file_path(&file).is_err());
        std::fs::write(&file, "File,Key\n").unwrap();
        assert!(validate_file_path(&file).is_ok());
        assert!(validate_file_path(dir.path()).is_err());
    }
}
