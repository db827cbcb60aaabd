//! Persistent correlator records keyed by parameter tags.
//!
//! One record per (Wilson signs, geometry, mass, scale) combination: T
//! lines of `<time index> <value>` in index order, values at 16
//! significant digits. A record is written once by the sweep that produces
//! it and reread verbatim by every later run, so a present-but-malformed
//! file is reported as corruption rather than silently consumed.
//!
//! [`CorrelatorStore`] is the seam between the scaling driver and the
//! backend; [`FileStore`] is the flat-file implementation. Writes are not
//! transactional: a crash mid-write leaves a truncated record that the
//! next read rejects.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

/// Get/put access to correlator records.
pub trait CorrelatorStore {
    /// Fetch the record under `key`, if present. `len` is the expected
    /// number of entries; a record that exists but deviates from the
    /// format is an error, not a miss.
    fn load(&self, key: &str, len: usize) -> Result<Option<Vec<f64>>, StoreError>;

    /// Persist `values` under `key`, replacing any previous record.
    fn save(&self, key: &str, values: &[f64]) -> Result<(), StoreError>;
}

/// Store failure: filesystem trouble, or a record that no longer parses
/// back as written.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "store I/O failure: {}", err),
            StoreError::Corrupt { path, line, reason } => {
                write!(f, "corrupt record {} (line {}): {}", path.display(), line, reason)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Corrupt { .. } => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// Flat-file store: one `corr_<key>` file per record in a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the record file backing `key`.
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("corr_{}", key))
    }
}

impl CorrelatorStore for FileStore {
    fn load(&self, key: &str, len: usize) -> Result<Option<Vec<f64>>, StoreError> {
        let path = self.record_path(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        parse_record(&text, len, &path).map(Some)
    }

    fn save(&self, key: &str, values: &[f64]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.record_path(key);
        debug!("writing record {}", path.display());
        fs::write(path, format_record(values))?;
        Ok(())
    }
}

/// Render values in the two-column on-disk layout, 16 significant digits.
pub fn format_record(values: &[f64]) -> String {
    let mut out = String::new();
    for (index, value) in values.iter().enumerate() {
        out.push_str(&format!("{} {:.15e}\n", index, value));
    }
    out
}

fn parse_record(text: &str, len: usize, path: &Path) -> Result<Vec<f64>, StoreError> {
    let corrupt = |line: usize, reason: String| StoreError::Corrupt {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut values = Vec::with_capacity(len);
    for (line_no, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace();
        let index: usize = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| corrupt(line_no + 1, "missing or non-integer time index".into()))?;
        if index != line_no {
            return Err(corrupt(
                line_no + 1,
                format!("time index {} out of order, expected {}", index, line_no),
            ));
        }
        let value: f64 = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| corrupt(line_no + 1, "missing or non-numeric value".into()))?;
        values.push(value);
    }
    if values.len() != len {
        return Err(corrupt(
            values.len(),
            format!("expected {} entries, found {}", len, values.len()),
        ));
    }
    Ok(values)
}

/// Deterministic record tag for one (Wilson signs, geometry, mass, scale)
/// combination. The Wilson signs map through (r+1)/2, with r2 = 0 (the
/// conserved-current insertion) tagged 2. The mass keeps its command-line
/// spelling so retyped runs resolve to the same record; `scale` is
/// 1-based.
pub fn cache_tag(
    r1: i32,
    r2: i32,
    l_extent: usize,
    t_extent: usize,
    mu_text: &str,
    scale: usize,
) -> String {
    let r1_tag = (r1 + 1) / 2;
    let r2_tag = if r2 == 0 { 2 } else { (r2 + 1) / 2 };
    format!(
        "r1_{}_r2_{}_L_{}_T_{}_mu_{}_scale_{}",
        r1_tag, r2_tag, l_extent, t_extent, mu_text, scale
    )
}
