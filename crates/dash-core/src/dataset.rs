//! Dataset loading.
//!
//! A [`Dataset`] is the immutable in-memory copy of one CSV source. It keeps
//! both the typed [`Record`]s used by the metrics and the raw rows, so an
//! export reproduces the source schema including columns the metrics ignore.

use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{CoercionWarning, LoadError};
use crate::filter::{FilterCriteria, View};
use crate::logging::event_names;
use crate::record::{columns, parse_timestamp, Record};

/// Loaded, immutable dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    source_name: String,
    fingerprint: String,
    headers: csv::StringRecord,
    raw_rows: Vec<csv::StringRecord>,
    records: Vec<Record>,
    warnings: Vec<CoercionWarning>,
}

/// Load a dataset from a CSV file on disk.
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Dataset::from_bytes(name, &bytes)
}

/// Column positions of the required fields within the source header.
struct ColumnIndex {
    user_id: usize,
    username: usize,
    country: usize,
    device_type: usize,
    game_title: usize,
    preferred_game_mode: usize,
    total_revenue_usd: usize,
    total_hours_played: usize,
    total_play_sessions: usize,
    in_game_purchases_count: usize,
    signup_date: usize,
    last_login: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            user_id: find(columns::USER_ID)?,
            username: find(columns::USERNAME)?,
            country: find(columns::COUNTRY)?,
            device_type: find(columns::DEVICE_TYPE)?,
            game_title: find(columns::GAME_TITLE)?,
            preferred_game_mode: find(columns::PREFERRED_GAME_MODE)?,
            total_revenue_usd: find(columns::TOTAL_REVENUE_USD)?,
            total_hours_played: find(columns::TOTAL_HOURS_PLAYED)?,
            total_play_sessions: find(columns::TOTAL_PLAY_SESSIONS)?,
            in_game_purchases_count: find(columns::IN_GAME_PURCHASES_COUNT)?,
            signup_date: find(columns::SIGNUP_DATE)?,
            last_login: find(columns::LAST_LOGIN)?,
        })
    }
}

/// Floats that convert to `i64` without saturating. `i64::MAX as f64` is 2^63.
const I64_RANGE: std::ops::Range<f64> = (i64::MIN as f64)..(i64::MAX as f64);

/// Per-row conversion state.
struct RowParser<'a> {
    row: &'a csv::StringRecord,
    line: u64,
}

impl RowParser<'_> {
    fn cell(&self, idx: usize) -> Option<&str> {
        self.row.get(idx).map(str::trim).filter(|v| !v.is_empty())
    }

    fn text(&self, idx: usize) -> Option<String> {
        self.cell(idx).map(str::to_string)
    }

    fn float(&self, idx: usize, column: &str) -> Result<Option<f64>, LoadError> {
        match self.cell(idx) {
            None => Ok(None),
            Some(v) => v
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Some)
                .ok_or_else(|| self.invalid(column, v)),
        }
    }

    /// Integer counts. Integral floats such as `"3.0"` are accepted.
    fn int(&self, idx: usize, column: &str) -> Result<Option<i64>, LoadError> {
        match self.cell(idx) {
            None => Ok(None),
            Some(v) => {
                if let Ok(n) = v.parse::<i64>() {
                    return Ok(Some(n));
                }
                match v.parse::<f64>() {
                    Ok(f) if f.fract() == 0.0 && I64_RANGE.contains(&f) => Ok(Some(f as i64)),
                    _ => Err(self.invalid(column, v)),
                }
            }
        }
    }

    fn timestamp(
        &self,
        idx: usize,
        column: &str,
        warnings: &mut Vec<CoercionWarning>,
    ) -> Option<chrono::NaiveDateTime> {
        let value = self.cell(idx)?;
        let parsed = parse_timestamp(value);
        if parsed.is_none() {
            let warning = CoercionWarning {
                line: self.line,
                column: column.to_string(),
                value: value.to_string(),
            };
            debug!(event = event_names::DATASET_COERCION, %warning, "Timestamp coerced to null");
            warnings.push(warning);
        }
        parsed
    }

    fn invalid(&self, column: &str, value: &str) -> LoadError {
        LoadError::InvalidValue {
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

impl Dataset {
    /// Parse a dataset from any reader. The whole source is buffered so the
    /// fingerprint covers the exact bytes that were parsed.
    pub fn from_reader<R: Read>(
        source_name: impl Into<String>,
        mut reader: R,
    ) -> Result<Self, LoadError> {
        let source_name = source_name.into();
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| LoadError::io(&source_name, e))?;
        Self::from_bytes(source_name, &bytes)
    }

    /// Parse a dataset from an in-memory CSV buffer.
    pub fn from_bytes(source_name: impl Into<String>, bytes: &[u8]) -> Result<Self, LoadError> {
        let source_name = source_name.into();
        let fingerprint = hex::encode(Sha256::digest(bytes));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);
        let headers = reader.headers()?.clone();
        let index = ColumnIndex::from_headers(&headers)?;

        let mut raw_rows = Vec::new();
        let mut records = Vec::new();
        let mut warnings = Vec::new();

        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let parser = RowParser { row: &row, line };

            let record = Record {
                user_id: parser.text(index.user_id),
                username: parser.text(index.username),
                country: parser.text(index.country),
                device_type: parser.text(index.device_type),
                game_title: parser.text(index.game_title),
                preferred_game_mode: parser.text(index.preferred_game_mode),
                total_revenue_usd: parser
                    .float(index.total_revenue_usd, columns::TOTAL_REVENUE_USD)?,
                total_hours_played: parser
                    .float(index.total_hours_played, columns::TOTAL_HOURS_PLAYED)?,
                total_play_sessions: parser
                    .int(index.total_play_sessions, columns::TOTAL_PLAY_SESSIONS)?,
                in_game_purchases_count: parser
                    .int(index.in_game_purchases_count, columns::IN_GAME_PURCHASES_COUNT)?,
                signup_date: parser.timestamp(index.signup_date, columns::SIGNUP_DATE, &mut warnings),
                last_login: parser.timestamp(index.last_login, columns::LAST_LOGIN, &mut warnings),
            };

            records.push(record);
            raw_rows.push(row);
        }

        if !warnings.is_empty() {
            warn!(
                event = event_names::DATASET_COERCION,
                source = %source_name,
                count = warnings.len(),
                "Unparseable timestamps loaded as null"
            );
        }

        info!(
            event = event_names::DATASET_LOADED,
            source = %source_name,
            rows = records.len(),
            columns = headers.len(),
            fingerprint = %&fingerprint[..12],
            "Dataset loaded"
        );

        Ok(Self {
            source_name,
            fingerprint,
            headers,
            raw_rows,
            records,
            warnings,
        })
    }

    /// Display name of the source.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Hex SHA-256 of the source bytes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Source header, in source order.
    pub fn headers(&self) -> &csv::StringRecord {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn raw_row(&self, idx: usize) -> Option<&csv::StringRecord> {
        self.raw_rows.get(idx)
    }

    pub fn warnings(&self) -> &[CoercionWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// View over every row.
    pub fn view(&self) -> View<'_> {
        View::new(self, (0..self.records.len()).collect())
    }

    /// Rows matching `criteria`, in source order.
    pub fn filter(&self, criteria: &FilterCriteria) -> View<'_> {
        self.view().filter(criteria)
    }
}
