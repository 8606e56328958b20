//! LAS 2.0 well-log reader (ASCII, unwrapped).

use std::path::{Path, PathBuf};

use stratwarp_rgt::WellLog;
use tracing::{debug, info, instrument};

use crate::IoError;

/// One `MNEM.UNIT  VALUE : DESCRIPTION` header line.
#[derive(Debug, PartialEq)]
struct HeaderLine<'a> {
    mnemonic: &'a str,
    value: &'a str,
}

impl<'a> HeaderLine<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let (mnemonic, rest) = line.split_once('.')?;
        let mnemonic = mnemonic.trim();
        if mnemonic.is_empty() {
            return None;
        }
        let rest = rest.rsplit_once(':').map_or(rest, |(before, _)| before);
        // Units run from the dot to the first space.
        let value = match rest.find(char::is_whitespace) {
            Some(end) => rest[end..].trim(),
            None => "",
        };
        Some(Self { mnemonic, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Version,
    Well,
    Curves,
    Ascii,
    Other,
}

impl Section {
    fn from_marker(line: &str) -> Self {
        match line[1..].chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('V') => Self::Version,
            Some('W') => Self::Well,
            Some('C') => Self::Curves,
            Some('A') => Self::Ascii,
            _ => Self::Other,
        }
    }
}

/// Reads a single well log from a LAS 2.0 file.
///
/// Supported layout:
/// - sections introduced by `~V`, `~W`, `~C`, `~A` (others are skipped)
/// - `WRAP. NO` in `~V`; wrapped files are rejected
/// - the `~W` `NULL` value marks missing samples, as does `NaN`
/// - the first `~C` curve is the depth index, the rest become channels
///   named by their mnemonic
/// - one whitespace-separated `~A` row per depth
///
/// The log is named after the `~W` `WELL` value, or the file stem when that
/// is blank.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::WrappedLas`] | `~V` declares `WRAP. YES` |
/// | [`IoError::MalformedLine`] | Header line lacks a `MNEM.` prefix |
/// | [`IoError::MissingSection`] | No `~C` or no `~A` section |
/// | [`IoError::InconsistentRowLength`] | `~A` row length differs from the curve count |
/// | [`IoError::NonFiniteValue`] | Unparseable value, or a missing depth |
/// | [`IoError::EmptyDataset`] | `~A` has no rows |
/// | [`IoError::InvalidLog`] | Two curves share a mnemonic |
pub struct LasReader {
    path: PathBuf,
}

impl LasReader {
    /// Create a new reader for the given LAS file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the LAS file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<WellLog, IoError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        self.parse(&text)
    }

    fn parse(&self, text: &str) -> Result<WellLog, IoError> {
        let mut section = Section::Other;
        let mut seen_curves = false;
        let mut seen_ascii = false;
        let mut null_value: Option<f64> = None;
        let mut well_name = String::new();
        let mut curves: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<f64>> = Vec::new();

        for (line_index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('~') {
                section = Section::from_marker(line);
                seen_curves |= section == Section::Curves;
                seen_ascii |= section == Section::Ascii;
                continue;
            }
            match section {
                Section::Version | Section::Well | Section::Curves => {
                    let header = HeaderLine::parse(line).ok_or_else(|| IoError::MalformedLine {
                        path: self.path.clone(),
                        line: line_index + 1,
                        content: line.to_string(),
                    })?;
                    match (section, header.mnemonic.to_ascii_uppercase().as_str()) {
                        (Section::Version, "WRAP") if header.value.eq_ignore_ascii_case("YES") => {
                            return Err(IoError::WrappedLas {
                                path: self.path.clone(),
                            });
                        }
                        (Section::Well, "NULL") => null_value = header.value.parse().ok(),
                        (Section::Well, "WELL") => well_name = header.value.to_string(),
                        (Section::Curves, _) => curves.push(header.mnemonic.to_string()),
                        _ => {}
                    }
                }
                Section::Ascii => {
                    if curves.is_empty() {
                        return Err(IoError::MissingSection {
                            path: self.path.clone(),
                            section: "~C",
                        });
                    }
                    let row_index = rows.len();
                    let row = line
                        .split_whitespace()
                        .enumerate()
                        .map(|(col_index, token)| {
                            self.parse_value(token, null_value, row_index, col_index)
                        })
                        .collect::<Result<Vec<f64>, IoError>>()?;
                    if row.len() != curves.len() {
                        return Err(IoError::InconsistentRowLength {
                            path: self.path.clone(),
                            row_index,
                            expected: curves.len(),
                            got: row.len(),
                        });
                    }
                    rows.push(row);
                }
                Section::Other => {}
            }
        }

        if !seen_curves || curves.is_empty() {
            return Err(IoError::MissingSection {
                path: self.path.clone(),
                section: "~C",
            });
        }
        if !seen_ascii {
            return Err(IoError::MissingSection {
                path: self.path.clone(),
                section: "~A",
            });
        }
        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }
        debug!(n_curves = curves.len(), n_rows = rows.len(), ?null_value, "LAS parsed");

        self.into_log(&well_name, &curves, &rows)
    }

    fn parse_value(
        &self,
        token: &str,
        null_value: Option<f64>,
        row_index: usize,
        col_index: usize,
    ) -> Result<f64, IoError> {
        let non_finite = || IoError::NonFiniteValue {
            path: self.path.clone(),
            row_index,
            col_index,
            raw: token.to_string(),
        };
        let value: f64 = token.parse().map_err(|_| non_finite())?;
        let is_null =
            null_value.is_some_and(|null| (value - null).abs() <= 1e-9 * null.abs().max(1.0));
        if value.is_nan() || is_null {
            if col_index == 0 {
                return Err(non_finite());
            }
            return Ok(f64::NAN);
        }
        if !value.is_finite() {
            return Err(non_finite());
        }
        Ok(value)
    }

    fn into_log(
        &self,
        well_name: &str,
        curves: &[String],
        rows: &[Vec<f64>],
    ) -> Result<WellLog, IoError> {
        let name = if well_name.is_empty() {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            well_name.to_string()
        };
        let depths = rows.iter().map(|r| r[0]).collect();
        let mut log = WellLog::new(name, depths);
        for (col, curve) in curves.iter().enumerate().skip(1) {
            let values: Vec<f64> = rows.iter().map(|r| r[col]).collect();
            log = log
                .with_raw_channel(curve.as_str(), &values)
                .map_err(|e| IoError::InvalidLog {
                    path: self.path.clone(),
                    source: e,
                })?;
        }
        info!(
            log = log.name(),
            n_samples = log.len(),
            n_channels = log.channels().len(),
            "LAS log loaded"
        );
        Ok(log)
    }
}
