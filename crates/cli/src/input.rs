//! Part-list loading: positional arguments plus an optional list file.

use std::path::Path;

use crate::error::{CliError, Result};

/// Read part numbers from a list file: one per line, `#` starts a comment,
/// blank lines are skipped.
pub fn read_part_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::InputFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_part_lines(&contents))
}

fn parse_part_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter_map(|line| {
            let line = line.split('#').next().unwrap_or("").trim();
            (!line.is_empty()).then(|| line.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let parsed = parse_part_lines("77994840\n\n# a comment\n34343424  # trailing\n");
        assert_eq!(parsed, ["77994840", "34343424"]);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = read_part_file(Path::new("/no/such/parts.txt")).unwrap_err();
        assert!(error.to_string().contains("/no/such/parts.txt"));
    }

    #[test]
    fn file_contents_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "77994840\n34343424").unwrap();
        let parsed = read_part_file(file.path()).unwrap();
        assert_eq!(parsed, ["77994840", "34343424"]);
    }
}
