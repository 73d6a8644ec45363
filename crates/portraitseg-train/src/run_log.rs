//! Append-only CSV log of training runs.

use std::{
    borrow::Cow,
    fmt::Display,
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use crate::error::{TrainError, TrainResult};

/// A CSV file with a fixed header, one row per checkpoint or run.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
    columns: Vec<String>,
}

impl RunLog {
    /// Open the log at `path`, writing `headers` as its first line if the file
    /// does not exist yet or is empty.
    ///
    /// An existing header is kept as is and defines the expected row width.
    pub fn open<P: AsRef<Path>, S: AsRef<str>>(path: P, headers: &[S]) -> TrainResult<Self> {
        let path = path.as_ref().to_path_buf();
        if headers.is_empty() {
            return Err(TrainError::EmptyHeader { path });
        }

        if let Some(columns) = read_header(&path)? {
            return Ok(Self { path, columns });
        }

        let columns: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let line = columns
            .iter()
            .map(|c| escape_field(c))
            .collect::<Vec<_>>()
            .join(",");
        fs::write(&path, format!("{line}\n")).map_err(|source| TrainError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), columns = columns.len(), "created run log");

        Ok(Self { path, columns })
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Append one row. Fields containing commas, quotes or newlines are quoted.
    pub fn append<I, T>(&self, row: I) -> TrainResult<()>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let fields: Vec<String> = row.into_iter().map(|f| f.to_string()).collect();
        if fields.len() != self.columns.len() {
            return Err(TrainError::RowLengthMismatch {
                path: self.path.clone(),
                expected: self.columns.len(),
                actual: fields.len(),
            });
        }

        let line = fields
            .iter()
            .map(|f| escape_field(f))
            .collect::<Vec<_>>()
            .join(",");

        let io_error = |source| TrainError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(io_error)?;
        writeln!(file, "{line}").map_err(io_error)
    }
}

fn read_header(path: &Path) -> TrainResult<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }

    let io_error = |source| TrainError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;

    // A quoted header field may span several physical lines.
    let mut record = String::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(io_error)?;
        if record.is_empty() && line.trim().is_empty() {
            return Ok(None);
        }
        if !record.is_empty() {
            record.push('\n');
        }
        record.push_str(&line);

        if let Some(columns) = split_record(&record) {
            return Ok(Some(columns));
        }
    }

    Ok(None)
}

/// Split one CSV record written by [`escape_field`].
///
/// Returns `None` while a quoted field is still open.
fn split_record(record: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = record.chars().peekable();

    while let Some(c) = chars.next() {
        match (quoted, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            (true, '"') => quoted = false,
            (false, '"') if field.is_empty() => quoted = true,
            (false, ',') => fields.push(std::mem::take(&mut field)),
            (_, c) => field.push(c),
        }
    }

    if quoted {
        return None;
    }
    fields.push(field);
    Some(fields)
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
