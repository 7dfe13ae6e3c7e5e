//! Two-column CSV persistence
//!
//! Rows are `letter,count`, no header, UTF-8. Fields are quoted only when
//! they contain the delimiter, a quote, or a line break.

use crate::tally::LetterTally;
use crate::{InputError, TallyError};
use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DELIMITER: char = ',';
const REQUIRED_SUFFIX: &str = ".csv";

/// A destination path known to carry the `.csv` suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDestination {
    path: PathBuf,
}

impl CsvDestination {
    /// Validates a destination file name
    ///
    /// # Examples
    ///
    /// ```
    /// use beast_tally::output::CsvDestination;
    ///
    /// assert!(CsvDestination::new("beasts.csv").is_ok());
    /// assert!(CsvDestination::new("out.txt").is_err());
    /// ```
    pub fn new(path: &str) -> Result<Self, InputError> {
        if !path.ends_with(REQUIRED_SUFFIX) {
            return Err(InputError::BadSuffix {
                path: path.to_string(),
            });
        }
        Ok(Self {
            path: PathBuf::from(path),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for CsvDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Writes `tally` to `destination`, replacing any existing file
///
/// The rows go to a temporary file in the destination directory which is
/// then renamed over the target, so readers never see a partial file.
pub fn write_tally_csv(destination: &CsvDestination, tally: &LetterTally) -> Result<(), TallyError> {
    let path = destination.path();
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        for (letter, count) in tally.iter() {
            write_row(&mut writer, &[letter, &count.to_string()])?;
        }
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Reads a tally previously written by [`write_tally_csv`]
///
/// Blank lines are skipped. Every other line must hold exactly two fields,
/// the second a non-negative integer.
pub fn read_tally_csv(path: &Path) -> Result<LetterTally, TallyError> {
    let content = fs::read_to_string(path)?;
    let mut tally = LetterTally::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let malformed = |message: String| TallyError::MalformedTally {
            path: path.display().to_string(),
            line: idx + 1,
            message,
        };

        let fields = split_row(line).map_err(|e| malformed(e.to_string()))?;
        let [letter, count] = fields.as_slice() else {
            return Err(malformed(format!("expected 2 fields, found {}", fields.len())));
        };
        let count: u64 = count
            .trim()
            .parse()
            .map_err(|_| malformed(format!("count '{}' is not a non-negative integer", count)))?;

        tally.add(letter, count);
    }

    Ok(tally)
}

fn needs_quotes(field: &str) -> bool {
    field.contains(DELIMITER) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Writes one row, terminated by `\n`
fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    for (idx, cell) in row.iter().enumerate() {
        if idx > 0 {
            write!(w, "{}", DELIMITER)?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Splits one line into fields, honouring quotes and `""` escapes
fn split_row(line: &str) -> Result<Vec<String>, &'static str> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            c if c == DELIMITER && !in_quotes => fields.push(std::mem::take(&mut field)),
            '\r' if !in_quotes && chars.peek().is_none() => {}
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field");
    }
    fields.push(field);
    Ok(fields)
}
