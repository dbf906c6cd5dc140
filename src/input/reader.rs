use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};

// Upstream chat endpoints reject oversized prompts long before this;
// the cap exists to fail fast with a readable message.
const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

/// Reads the source text from a file argument or stdin.
pub struct InputReader;

impl InputReader {
    pub fn read(file_path: Option<&str>) -> Result<String> {
        file_path.map_or_else(Self::read_stdin, Self::read_file)
    }

    fn read_file(path: &str) -> Result<String> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to access file: {path}"))?;

        if metadata.len() as usize > MAX_INPUT_SIZE {
            bail!(
                "Error: Input exceeds the maximum size of {} MB.\n\n\
                 Consider splitting the file into smaller parts.",
                MAX_INPUT_SIZE / 1024 / 1024
            );
        }

        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
    }

    #[allow(clippy::significant_drop_tightening)]
    fn read_stdin() -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];
        let mut stdin = io::stdin().lock();

        loop {
            let bytes_read = stdin
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);

            if buffer.len() > MAX_INPUT_SIZE {
                bail!(
                    "Error: Input exceeds the maximum size of {} MB.\n\n\
                     Consider splitting the input into smaller parts.",
                    MAX_INPUT_SIZE / 1024 / 1024
                );
            }
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_read_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Hello, World!").unwrap();

        let content = InputReader::read(Some(temp_file.path().to_str().unwrap())).unwrap();
        assert_eq!(content.trim(), "Hello, World!");
    }

    #[test]
    fn test_read_nonexistent_file() {
        assert!(InputReader::read(Some("/nonexistent/path/to/file.txt")).is_err());
    }

    #[test]
    fn test_read_file_unicode() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = "你好，世界！\n学而时习之";
        write!(temp_file, "{content}").unwrap();

        let result = InputReader::read(Some(temp_file.path().to_str().unwrap())).unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_max_input_size_is_one_megabyte() {
        assert_eq!(MAX_INPUT_SIZE, 1024 * 1024);
    }

    #[test]
    fn test_read_file_exceeds_max_size() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("large.txt");
        fs::write(&file_path, "x".repeat(MAX_INPUT_SIZE + 1)).unwrap();

        let result = InputReader::read(Some(file_path.to_str().unwrap()));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("maximum size"));
    }

    #[test]
    fn test_read_file_at_max_size() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("max.txt");
        fs::write(&file_path, "x".repeat(MAX_INPUT_SIZE)).unwrap();

        let result = InputReader::read(Some(file_path.to_str().unwrap())).unwrap();
        assert_eq!(result.len(), MAX_INPUT_SIZE);
    }
}
