use crate::core::error::PxError;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Where `grep` reads its lines from
#[derive(Debug, Clone, Copy)]
pub enum GrepSource<'a> {
    Text(&'a str),
    File(&'a Path),
}

/// Return the lines of `source` that contain a match of the regular
/// expression `pattern`, without their line terminators.
pub fn grep(pattern: &str, source: GrepSource<'_>) -> Result<Vec<String>, PxError> {
    let re = Regex::new(pattern)?;

    match source {
        GrepSource::Text(text) => Ok(text
            .lines()
            .filter(|line| re.is_match(line))
            .map(str::to_string)
            .collect()),
        GrepSource::File(path) => {
            let reader = BufReader::new(File::open(path)?);
            let mut result = Vec::new();
            for line in reader.lines() {
                let line = line?;
                if re.is_match(&line) {
                    result.push(line);
                }
            }
            Ok(result)
        }
    }
}
