use crate::log_debug;
use colored::Colorize;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Writes `lines` to `path`, replacing any previous content.
///
/// Lines are joined with `\n` and the file always ends with a trailing newline
/// (except when there are no lines), so the same input always produces the
/// same bytes.
pub fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    let content = lines.join("\n");
    let final_content = if content.is_empty() {
        content
    } else {
        format!("{content}\n")
    };
    log_debug!(
        "[Files] Writing {} line(s) to {}",
        lines.len(),
        path.display().to_string().cyan()
    );
    fs::write(path, final_content)
}

/// Reads a line-oriented file. A missing file reads as no lines; any other
/// I/O problem is returned to the caller.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    match fs::File::open(path) {
        Ok(file) => BufReader::new(file).lines().collect(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_lines(&dir.path().join("nope.txt")).unwrap().is_empty());
    }

    #[test]
    fn write_adds_single_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        write_lines(&path, &["psutil".to_string(), "flask".to_string()]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "psutil\nflask\n");
        assert_eq!(read_lines(&path).unwrap(), vec!["psutil", "flask"]);
    }
}
