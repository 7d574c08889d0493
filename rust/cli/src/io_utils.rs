//! Small I/O helpers shared by command handlers.

use std::io::BufRead;

/// Reads a line of input from a buffered reader, blocking until available.
///
/// Returns the trimmed line, or `None` on EOF or read error.
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// # use diemso_cli::io_utils::read_stdin_line;
///
/// let mut input = Cursor::new(&b"  yes\n"[..]);
/// assert_eq!(read_stdin_line(&mut input), Some("yes".to_string()));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Ensure parent directory exists for given path, creating if needed.
pub fn ensure_parent_dir(path: &std::path::Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Quotes a CSV field when it contains a delimiter, quote or newline.
pub fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_stdin_line_empty_after_trim() {
        let mut cursor = Cursor::new(b"   \n");
        assert_eq!(read_stdin_line(&mut cursor), Some("".to_string()));
    }

    #[test]
    fn test_read_stdin_line_eof() {
        let mut cursor = Cursor::new(b"");
        assert_eq!(read_stdin_line(&mut cursor), None);
    }

    #[test]
    fn test_ensure_parent_dir_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("subdir").join("file.csv");
        assert!(ensure_parent_dir(&nested_path).is_ok());
        assert!(temp_dir.path().join("subdir").exists());
    }

    #[test]
    fn test_csv_field_quotes_when_needed() {
        assert_eq!(csv_field("An"), "An");
        assert_eq!(csv_field("Penalty, red"), "\"Penalty, red\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
