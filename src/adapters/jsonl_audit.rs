//! JSON-lines audit log
//!
//! Each command attempt becomes one line:
//!
//! ```text
//! {"id":3,"action":"Ligar LED","timestamp":"2026-10-19T12:00:00Z","status":"SUCESSO","message":"..."}
//! ```
//!
//! The file is only ever appended to. Ids continue from the highest one
//! already in the file, so restarting the controller keeps them unique.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::{AuditRecord, LedError, LedResult, StoredAuditRecord};
use crate::ports::AuditSink;

pub struct JsonlAuditLog {
    path: PathBuf,
    inner: Mutex<Inner>,
}

struct Inner {
    file: File,
    next_id: u64,
}

impl JsonlAuditLog {
    /// Open (or create) the log at `path`.
    pub fn open(path: impl AsRef<Path>) -> LedResult<Self> {
        let path = path.as_ref().to_path_buf();
        let next_id = last_id(&path)? + 1;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LedError::Audit(format!("Failed to open {}: {e}", path.display())))?;

        // A crash mid-append leaves a partial last line; start on a fresh one.
        if ends_mid_line(&path)? {
            log::warn!("Audit log {} ends with a partial line", path.display());
            file.write_all(b"\n")
                .and_then(|()| file.flush())
                .map_err(|e| LedError::Audit(format!("Failed to write {}: {e}", path.display())))?;
        }

        log::info!("Audit log at {} (next id {next_id})", path.display());
        Ok(Self {
            path,
            inner: Mutex::new(Inner { file, next_id }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// True when the file is non-empty and its last byte is not `\n`.
fn ends_mid_line(path: &Path) -> LedResult<bool> {
    let read_err = |e: std::io::Error| LedError::Audit(format!("Failed to read {}: {e}", path.display()));
    let mut file = File::open(path).map_err(read_err)?;
    let len = file.metadata().map_err(read_err)?.len();
    if len == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))
        .and_then(|_| file.read_exact(&mut last))
        .map_err(read_err)?;
    Ok(last[0] != b'\n')
}

/// Highest id present in an existing log, 0 if there is none.
fn last_id(path: &Path) -> LedResult<u64> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(LedError::Audit(format!(
                "Failed to read {}: {e}",
                path.display()
            )))
        }
    };

    let mut max = 0;
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| LedError::Audit(format!("Failed to read {}: {e}", path.display())))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<StoredAuditRecord>(&line) {
            Ok(stored) => max = max.max(stored.id),
            Err(e) => log::warn!("Skipping malformed audit line {} in {}: {e}", n + 1, path.display()),
        }
    }
    Ok(max)
}

impl AuditSink for JsonlAuditLog {
    fn append(&self, record: &AuditRecord) -> LedResult<u64> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| LedError::Audit("Audit log state corrupted".to_string()))?;

        let stored = StoredAuditRecord {
            id: inner.next_id,
            record: record.clone(),
        };
        let mut line = serde_json::to_string(&stored)
            .map_err(|e| LedError::Audit(format!("Serialization error: {e}")))?;
        line.push('\n');

        inner
            .file
            .write_all(line.as_bytes())
            .and_then(|()| inner.file.flush())
            .map_err(|e| LedError::Audit(format!("Failed to write {}: {e}", self.path.display())))?;

        inner.next_id += 1;
        Ok(stored.id)
    }
}
