use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::error::{Error, Result};
use crate::models::attempt_record::AttemptRecord;
use crate::utils::time::{format_timestamp, parse_timestamp};

const FIELD_COUNT: usize = 4;

/// Append-only log of quiz attempts, one delimited row per attempt:
/// `timestamp,topic,difficulty,87.50%`, no header.
///
/// Writers take an exclusive advisory lock and emit each row with a single
/// write, readers take a shared lock. Bytes after the last unquoted newline
/// belong to an interrupted write and are never returned.
#[derive(Clone, Debug)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &AttemptRecord) -> Result<()> {
        let row = encode_record(record)?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.lock()?;

        repair_tail(&mut file, &self.path)?;
        file.write_all(&row)?;
        file.sync_data()?;

        tracing::info!(
            topic = %record.topic,
            difficulty = %record.difficulty,
            percentage = record.percentage,
            "Recorded quiz attempt"
        );
        Ok(())
    }

    pub fn load_all(&self) -> Result<Vec<AttemptRecord>> {
        let mut file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::StoreNotFound),
            Err(e) => return Err(e.into()),
        };
        file.lock_shared()?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        drop(file);

        parse_records(&data)
    }
}

fn encode_record(record: &AttemptRecord) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record([
        format_timestamp(record.timestamp),
        record.topic.clone(),
        record.difficulty.clone(),
        format!("{:.2}%", record.percentage),
    ])?;
    writer
        .into_inner()
        .map_err(|e| Error::StoreIo(format!("Failed to encode record: {}", e)))
}

fn decode_record(row: &StringRecord) -> std::result::Result<AttemptRecord, String> {
    if row.len() != FIELD_COUNT {
        return Err(format!("expected {} fields, found {}", FIELD_COUNT, row.len()));
    }
    let timestamp = parse_timestamp(&row[0])
        .ok_or_else(|| format!("unreadable timestamp '{}'", &row[0]))?;
    let raw_pct = row[3].trim();
    let percentage: f64 = raw_pct
        .strip_suffix('%')
        .unwrap_or(raw_pct)
        .trim()
        .parse()
        .map_err(|_| format!("unreadable percentage '{}'", raw_pct))?;
    if !percentage.is_finite() {
        return Err(format!("unreadable percentage '{}'", raw_pct));
    }
    Ok(AttemptRecord::new(timestamp, &row[1], &row[2], percentage))
}

/// Length of the prefix made of complete records: everything up to the last
/// newline that sits outside a quoted field.
fn complete_len(data: &[u8]) -> usize {
    let mut in_quotes = false;
    let mut end = 0;
    for (idx, byte) in data.iter().enumerate() {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b'\n' if !in_quotes => end = idx + 1,
            _ => {}
        }
    }
    end
}

struct ParsedRow {
    /// Byte offset where the row starts.
    start: u64,
    row: std::result::Result<AttemptRecord, String>,
}

fn read_rows(complete: &[u8]) -> Vec<ParsedRow> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(complete);

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let start = reader.position().byte();
        match reader.read_record(&mut record) {
            Ok(true) => rows.push(ParsedRow {
                start,
                row: decode_record(&record),
            }),
            Ok(false) => break,
            Err(e) => {
                rows.push(ParsedRow {
                    start,
                    row: Err(e.to_string()),
                });
                if reader.position().byte() <= start {
                    break;
                }
            }
        }
    }
    rows
}

fn parse_records(data: &[u8]) -> Result<Vec<AttemptRecord>> {
    let complete = complete_len(data);
    if complete < data.len() {
        tracing::warn!(
            bytes = data.len() - complete,
            "Ignoring unterminated trailing record in results log"
        );
    }

    let rows = read_rows(&data[..complete]);
    let last = rows.len().saturating_sub(1);
    let mut records = Vec::with_capacity(rows.len());
    for (idx, parsed) in rows.into_iter().enumerate() {
        match parsed.row {
            Ok(record) => records.push(record),
            Err(reason) if idx == last => {
                tracing::warn!(row = idx + 1, %reason, "Skipping unreadable final record in results log");
            }
            Err(reason) => {
                return Err(Error::StoreIo(format!(
                    "Results log is corrupt at row {}: {}",
                    idx + 1,
                    reason
                )));
            }
        }
    }
    Ok(records)
}

/// Cuts whatever an interrupted or broken writer left at the end of the log:
/// an unterminated tail, or a final row that does not parse. The next row
/// then starts on its own line and no skipped row ends up mid-file. Caller
/// must hold the exclusive lock.
fn repair_tail(file: &mut File, path: &Path) -> Result<()> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }

    let mut data = Vec::with_capacity(len as usize);
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut data)?;

    let complete = complete_len(&data);
    let mut keep = complete as u64;
    if let Some(last) = read_rows(&data[..complete]).pop() {
        if let Err(reason) = last.row {
            tracing::warn!(path = %path.display(), %reason, "Dropping unreadable final record from results log");
            keep = last.start;
        }
    }

    if keep < len {
        tracing::warn!(
            path = %path.display(),
            dropped_bytes = len - keep,
            "Truncating results log to its last complete record"
        );
        file.set_len(keep)?;
    }
    Ok(())
}
