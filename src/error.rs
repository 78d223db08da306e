use std::fmt;
use std::path::PathBuf;

/// Where a rejected ephemeris value came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordLocation {
    pub year: Option<i32>,
    pub line: Option<usize>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl RecordLocation {
    pub fn in_year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn on(mut self, month: Option<u32>, day: Option<u32>) -> Self {
        self.month = month;
        self.day = day;
        self
    }
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(year) = self.year {
            parts.push(format!("year {}", year));
        }
        if let Some(line) = self.line {
            parts.push(format!("line {}", line));
        }
        match (self.month, self.day) {
            (Some(month), Some(day)) => parts.push(format!("{:02}-{:02}", month, day)),
            (Some(month), None) => parts.push(format!("month {}", month)),
            _ => {}
        }
        if parts.is_empty() {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

// Poster Error Handling
#[derive(Debug, thiserror::Error)]
pub enum PosterError {
    #[error("invalid {field} `{value}` ({location})")]
    InvalidField {
        location: RecordLocation,
        field: &'static str,
        value: String,
    },

    #[error("malformed line ({location}): expected 6 columns, found {found}")]
    MalformedLine {
        location: RecordLocation,
        found: usize,
    },

    #[error("date does not exist ({location})")]
    InvalidDate { location: RecordLocation },

    #[error("duplicate record ({location})")]
    DuplicateDay { location: RecordLocation },

    #[error("record for year {found} found in ephemeris for {expected} ({location})")]
    YearMismatch {
        expected: i32,
        found: i32,
        location: RecordLocation,
    },

    #[error("invalid spiral a={a}, b={b}, ds={ds}: log argument {argument} is not positive at day {day}")]
    InvalidSpiral {
        a: f64,
        b: f64,
        ds: f64,
        day: u32,
        argument: f64,
    },

    #[error("invalid spiral parameter {name}={value}: must be finite and positive")]
    InvalidSpiralParameter { name: &'static str, value: f64 },

    #[error("poster for {year} needs 12 month panels, got {found}")]
    PanelCount { year: i32, found: usize },

    #[error("poster for {year} has month {found_month} in panel position {position}")]
    PanelOrder {
        year: i32,
        position: u32,
        found_month: u32,
    },

    #[error("failed to open ephemeris {path}: {source}")]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("memory mapping failed for {path}: {source}")]
    MmapError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ephemeris {path} is not valid UTF-8")]
    Encoding { path: PathBuf },

    #[error("failed to write poster {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PosterError>;
