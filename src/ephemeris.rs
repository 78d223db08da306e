//! Per-day lunar records for one year, as produced by the external ephemeris
//! script, grouped by month.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use memmap2::MmapOptions;
use tracing::{info, warn};

use crate::error::{PosterError, RecordLocation, Result};

/// Event flag carried by a day in the ephemeris file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseLabel {
    None,
    Full,
    New,
}

impl TryFrom<u8> for PhaseLabel {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, u8> {
        match code {
            0 => Ok(PhaseLabel::None),
            1 => Ok(PhaseLabel::Full),
            2 => Ok(PhaseLabel::New),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisRecord {
    month: u32,
    day: u32,
    phase_fraction: f64,
    label: PhaseLabel,
    weekday: u32,
}

impl EphemerisRecord {
    /// Validated record; `weekday` counts days from Sunday (5 = Friday).
    pub fn new(
        month: u32,
        day: u32,
        phase_fraction: f64,
        label: PhaseLabel,
        weekday: u32,
    ) -> Result<Self> {
        Self::validated(month, day, phase_fraction, label, weekday, RecordLocation::default())
    }

    fn validated(
        month: u32,
        day: u32,
        phase_fraction: f64,
        label: PhaseLabel,
        weekday: u32,
        location: RecordLocation,
    ) -> Result<Self> {
        let location = location.on(Some(month), Some(day));
        let invalid = |field: &'static str, value: String| PosterError::InvalidField {
            location: location.clone(),
            field,
            value,
        };
        if !(1..=12).contains(&month) {
            return Err(invalid("month", month.to_string()));
        }
        if !(1..=31).contains(&day) {
            return Err(invalid("day", day.to_string()));
        }
        if !(0.0..1.0).contains(&phase_fraction) {
            return Err(invalid("phase", phase_fraction.to_string()));
        }
        if weekday > 6 {
            return Err(invalid("weekday", weekday.to_string()));
        }
        Ok(Self {
            month,
            day,
            phase_fraction,
            label,
            weekday,
        })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn phase_fraction(&self) -> f64 {
        self.phase_fraction
    }

    pub fn label(&self) -> PhaseLabel {
        self.label
    }

    pub fn weekday(&self) -> u32 {
        self.weekday
    }

    /// Friday and Saturday nights.
    pub fn is_weekend_night(&self) -> bool {
        matches!(self.weekday, 5 | 6)
    }
}

/// A year of records indexed by month, each month sorted by day.
#[derive(Debug, Clone, PartialEq)]
pub struct YearEphemeris {
    year: i32,
    months: [Vec<EphemerisRecord>; 12],
}

impl YearEphemeris {
    pub fn from_records(year: i32, records: impl IntoIterator<Item = EphemerisRecord>) -> Result<Self> {
        let mut months: [Vec<EphemerisRecord>; 12] = Default::default();
        for record in records {
            months[record.month as usize - 1].push(record);
        }
        for (index, days) in months.iter_mut().enumerate() {
            days.sort_by_key(|r| r.day);
            if let Some(pair) = days.windows(2).find(|w| w[0].day == w[1].day) {
                return Err(PosterError::DuplicateDay {
                    location: RecordLocation::in_year(year).on(Some(index as u32 + 1), Some(pair[0].day)),
                });
            }
        }
        Ok(Self { year, months })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Records for `month` (1 = January).
    pub fn month(&self, month: u32) -> &[EphemerisRecord] {
        &self.months[month as usize - 1]
    }

    pub fn months(&self) -> impl Iterator<Item = (u32, &[EphemerisRecord])> {
        self.months
            .iter()
            .enumerate()
            .map(|(i, days)| (i as u32 + 1, days.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.months.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Path of the ephemeris file for `year` under `data_dir`.
pub fn year_path(data_dir: &Path, year: i32) -> PathBuf {
    data_dir.join(format!("{}.dat", year))
}

/// Parses one year's file: `year month day phase label iso_weekday` per line,
/// `#` comments allowed.
pub fn parse_year(year: i32, text: &str) -> Result<YearEphemeris> {
    let mut records = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let location = RecordLocation::in_year(year).at_line(index + 1);
        records.push(parse_line(year, line, location)?);
    }
    YearEphemeris::from_records(year, records)
}

fn parse_line(year: i32, line: &str, location: RecordLocation) -> Result<EphemerisRecord> {
    let columns: Vec<&str> = line.split_whitespace().collect();
    if columns.len() != 6 {
        return Err(PosterError::MalformedLine {
            location,
            found: columns.len(),
        });
    }

    let record_year: i32 = field(&columns, 0, "year", &location)?;
    let month: u32 = field(&columns, 1, "month", &location)?;
    let day: u32 = field(&columns, 2, "day", &location)?;
    let location = location.on(Some(month), Some(day));
    let phase: f64 = field(&columns, 3, "phase", &location)?;
    let label_code: u8 = field(&columns, 4, "label", &location)?;
    let iso_weekday: u32 = field(&columns, 5, "weekday", &location)?;

    if record_year != year {
        return Err(PosterError::YearMismatch {
            expected: year,
            found: record_year,
            location,
        });
    }
    let label = PhaseLabel::try_from(label_code).map_err(|code| PosterError::InvalidField {
        location: location.clone(),
        field: "label",
        value: code.to_string(),
    })?;
    if !(1..=7).contains(&iso_weekday) {
        return Err(PosterError::InvalidField {
            location,
            field: "weekday",
            value: iso_weekday.to_string(),
        });
    }
    let weekday = iso_weekday % 7;

    let record = EphemerisRecord::validated(month, day, phase, label, weekday, location.clone())?;

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| PosterError::InvalidDate { location: location.clone() })?;
    let expected = date.weekday().num_days_from_sunday();
    if expected != weekday {
        warn!(
            target: "ephemeris",
            "Weekday {} disagrees with calendar weekday {} ({})",
            weekday,
            expected,
            location
        );
    }

    Ok(record)
}

fn field<T: std::str::FromStr>(
    columns: &[&str],
    index: usize,
    name: &'static str,
    location: &RecordLocation,
) -> Result<T> {
    columns[index].parse().map_err(|_| PosterError::InvalidField {
        location: location.clone(),
        field: name,
        value: columns[index].to_string(),
    })
}

/// Memory-maps `<data_dir>/<year>.dat` and parses it.
pub fn load_year(data_dir: &Path, year: i32) -> Result<YearEphemeris> {
    let start = Instant::now();
    let path = year_path(data_dir, year);
    let file = File::open(&path).map_err(|source| PosterError::FileError {
        path: path.clone(),
        source,
    })?;

    // Zero-length files cannot be mapped on every platform.
    let is_empty = file
        .metadata()
        .map_err(|source| PosterError::FileError {
            path: path.clone(),
            source,
        })?
        .len()
        == 0;
    let ephemeris = if is_empty {
        parse_year(year, "")?
    } else {
        // SAFETY: the mapping is read-only and dropped before returning; the
        // ephemeris files are written once by the external producer.
        let mmap = unsafe {
            MmapOptions::new()
                .map(&file)
                .map_err(|source| PosterError::MmapError {
                    path: path.clone(),
                    source,
                })?
        };
        let text = std::str::from_utf8(&mmap).map_err(|_| PosterError::Encoding { path: path.clone() })?;
        parse_year(year, text)?
    };

    info!(
        target: "ephemeris",
        "Loaded {} records for {} from {} in {}µs",
        ephemeris.len(),
        year,
        path.display(),
        start.elapsed().as_micros()
    );
    Ok(ephemeris)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# [1] = year, [2] = month, [3] = day, [4] = lunar phase,
# [5] = label (1 = full, 2 = new),
# [6] = day of week (1 = monday, 7 = sunday)

2025\t1\t3\t0.120000\t0\t5
2025\t1\t1\t0.050000\t0\t3
2025\t1\t2\t0.080000\t0\t4
2025\t2\t1\t0.100000\t2\t6
";

    #[test]
    fn parses_and_groups_by_month() {
        let ephemeris = parse_year(2025, SAMPLE).unwrap();
        assert_eq!(ephemeris.year(), 2025);
        assert_eq!(ephemeris.len(), 4);
        let days: Vec<u32> = ephemeris.month(1).iter().map(|r| r.day()).collect();
        assert_eq!(days, vec![1, 2, 3]);
        assert_eq!(ephemeris.month(2)[0].label(), PhaseLabel::New);
        assert!(ephemeris.month(3).is_empty());
        assert_eq!(ephemeris.months().count(), 12);
    }

    #[test]
    fn iso_weekdays_become_days_from_sunday() {
        // 2025-01-03 was a Friday, 2025-01-04 a Saturday, 2025-01-05 a Sunday
        let text = "2025 1 3 0.1 0 5\n2025 1 4 0.15 0 6\n2025 1 5 0.2 0 7\n2025 1 6 0.25 0 1\n";
        let ephemeris = parse_year(2025, text).unwrap();
        let january = ephemeris.month(1);
        assert_eq!(january[0].weekday(), 5);
        assert!(january[0].is_weekend_night());
        assert_eq!(january[1].weekday(), 6);
        assert!(january[1].is_weekend_night());
        assert_eq!(january[2].weekday(), 0);
        assert!(!january[2].is_weekend_night());
        assert_eq!(january[3].weekday(), 1);
        assert!(!january[3].is_weekend_night());
    }

    #[test]
    fn phase_out_of_range_names_the_record() {
        let text = "# header\n2025 3 7 1.5 0 5\n";
        let err = parse_year(2025, text).unwrap_err();
        assert_eq!(err.to_string(), "invalid phase `1.5` (year 2025, line 2, 03-07)");
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let err = parse_year(2025, "2025 1 x 0.1 0 1\n").unwrap_err();
        assert!(matches!(err, PosterError::InvalidField { field: "day", .. }));
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = parse_year(2025, "2025 1 1 0.1 3 1\n").unwrap_err();
        assert!(matches!(err, PosterError::InvalidField { field: "label", .. }));
    }

    #[test]
    fn weekday_outside_iso_range_is_rejected() {
        let err = parse_year(2025, "2025 1 1 0.1 0 0\n").unwrap_err();
        assert!(matches!(err, PosterError::InvalidField { field: "weekday", .. }));
    }

    #[test]
    fn impossible_dates_are_rejected() {
        let err = parse_year(2025, "2025 2 30 0.1 0 1\n").unwrap_err();
        assert!(matches!(err, PosterError::InvalidDate { .. }));
    }

    #[test]
    fn short_lines_are_rejected() {
        let err = parse_year(2025, "2025 1 1 0.1\n").unwrap_err();
        assert!(matches!(err, PosterError::MalformedLine { found: 4, .. }));
    }

    #[test]
    fn records_from_another_year_are_rejected() {
        let err = parse_year(2025, "2024 1 1 0.1 0 1\n").unwrap_err();
        assert!(matches!(err, PosterError::YearMismatch { expected: 2025, found: 2024, .. }));
    }

    #[test]
    fn duplicate_days_are_rejected() {
        let err = parse_year(2025, "2025 1 1 0.1 0 3\n2025 1 1 0.2 0 3\n").unwrap_err();
        assert!(matches!(err, PosterError::DuplicateDay { .. }));
    }

    #[test]
    fn record_constructor_checks_ranges() {
        assert!(EphemerisRecord::new(1, 1, 0.0, PhaseLabel::New, 3).is_ok());
        assert!(EphemerisRecord::new(0, 1, 0.0, PhaseLabel::None, 3).is_err());
        assert!(EphemerisRecord::new(1, 32, 0.0, PhaseLabel::None, 3).is_err());
        assert!(EphemerisRecord::new(1, 1, 1.0, PhaseLabel::None, 3).is_err());
        assert!(EphemerisRecord::new(1, 1, f64::NAN, PhaseLabel::None, 3).is_err());
        assert!(EphemerisRecord::new(1, 1, 0.5, PhaseLabel::None, 7).is_err());
    }

    #[test]
    fn load_reads_the_year_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(year_path(dir.path(), 2025), SAMPLE).unwrap();
        let ephemeris = load_year(dir.path(), 2025).unwrap();
        assert_eq!(ephemeris.len(), 4);
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_year(dir.path(), 2031).unwrap_err();
        assert!(matches!(err, PosterError::FileError { .. }));
    }
}
