use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::model::{LaunchRecord, LaunchTable};

/// Where the dashboard fetches its launch records from when nothing else is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/spacex_launch_dash.csv";

/// Header names that must be present in the CSV.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "Launch Site",
    "class",
    "Payload Mass (kg)",
    "Booster Version Category",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetching {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fetching {url}: server answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV header is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("CSV row {row}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("CSV row {row}: class must be 0 or 1, got {value}")]
    InvalidClass { row: usize, value: i64 },
    #[error("CSV row {row}: payload mass must be a non-negative number, got {value}")]
    InvalidPayload { row: usize, value: f64 },
}

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// A remote URL or a local CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// Anything starting with `http://` or `https://` is a URL, the rest is a path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            DataSource::Url(s.to_string())
        } else {
            DataSource::Path(PathBuf::from(s))
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Url(DEFAULT_SOURCE_URL.to_string())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the launch table from a URL or a local file.
pub fn load(source: &DataSource) -> Result<LaunchTable, LoadError> {
    let table = match source {
        DataSource::Url(url) => fetch_url(url)?,
        DataSource::Path(path) => load_file(path)?,
    };
    log::info!(
        "Loaded {} launches from {source} ({} sites, {} booster categories)",
        table.len(),
        table.sites().len(),
        table.booster_categories().len()
    );
    Ok(table)
}

/// Download the CSV with a single blocking GET.
pub fn fetch_url(url: &str) -> Result<LaunchTable, LoadError> {
    log::info!("Fetching launch records from {url}");
    let response = reqwest::blocking::get(url).map_err(|source| LoadError::Fetch {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response.bytes().map_err(|source| LoadError::Fetch {
        url: url.to_string(),
        source,
    })?;
    parse_csv(decode_latin1(&body).as_bytes())
}

/// Read a local CSV file.
pub fn load_file(path: &Path) -> Result<LaunchTable, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(decode_latin1(&bytes).as_bytes())
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Row layout of `spacex_launch_dash.csv`. Unknown columns (including the
/// unnamed index column) are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Flight Number", default)]
    flight_number: Option<u32>,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version", default)]
    booster_version: Option<String>,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
}

/// Parse UTF-8 CSV text into a [`LaunchTable`].
pub fn parse_csv<R: Read>(input: R) -> Result<LaunchTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv { row: 0, source })?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = idx + 1;
        let raw = result.map_err(|source| LoadError::Csv { row, source })?;

        let class = match raw.class {
            0 => 0,
            1 => 1,
            value => return Err(LoadError::InvalidClass { row, value }),
        };
        if !raw.payload_mass_kg.is_finite() || raw.payload_mass_kg < 0.0 {
            return Err(LoadError::InvalidPayload {
                row,
                value: raw.payload_mass_kg,
            });
        }

        records.push(LaunchRecord {
            flight_number: raw.flight_number,
            launch_site: raw.launch_site,
            class,
            payload_mass_kg: raw.payload_mass_kg,
            booster_version: raw.booster_version.filter(|s| !s.is_empty()),
            booster_version_category: raw.booster_version_category,
        });
    }

    Ok(LaunchTable::from_records(records))
}

/// The dataset is published as ISO-8859-1; every byte is its own code point.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Outcome, PayloadRange};

    const SAMPLE: &str = "\
,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
1,2,CCAFS LC-40,0,0.0,F9 v1.0  B0004,v1.0
2,3,CCAFS LC-40,0,525.0,F9 v1.0  B0005,v1.0
3,6,VAFB SLC-4E,0,500.0,F9 v1.1  B1003,v1.1
4,21,KSC LC-39A,1,2490.0,F9 FT B1031.1,FT
5,45,CCAFS SLC-40,1,9600.0,F9 B5 B1048.3,B5
";

    #[test]
    fn parses_dataset_layout() {
        let table = parse_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 6);
        assert_eq!(
            table.sites(),
            ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"]
        );
        assert_eq!(table.booster_categories(), ["v1.0", "v1.1", "FT", "B5"]);
        assert_eq!(table.payload_bounds(), Some(PayloadRange::new(0.0, 9600.0)));

        let first = &table.records()[0];
        assert_eq!(first.flight_number, Some(1));
        assert_eq!(first.booster_version.as_deref(), Some("F9 v1.0  B0003"));
        assert_eq!(first.outcome(), Outcome::Failure);
        assert_eq!(table.records()[4].outcome(), Outcome::Success);
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1,500,v1\n";
        let table = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.records()[0].flight_number, None);
        assert_eq!(table.records()[0].booster_version, None);
    }

    #[test]
    fn header_only_yields_empty_table() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\n";
        let table = parse_csv(csv.as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.payload_bounds(), None);
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "Launch Site,class,Booster Version Category\nA,1,v1\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Payload Mass (kg)")));
    }

    #[test]
    fn rejects_class_outside_zero_one() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1,500,v1\nA,2,500,v1\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidClass { row: 2, value: 2 }));
    }

    #[test]
    fn rejects_negative_payload() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1,-5,v1\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidPayload { row: 1, .. }));
    }

    #[test]
    fn rejects_non_numeric_payload() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1,heavy,v1\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Csv { row: 1, .. }));
    }

    /// Answer one HTTP request on a local port and return its URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/launches.csv")
    }

    #[test]
    fn unreachable_url_is_a_fetch_error() {
        let url = "http://127.0.0.1:9/launches.csv";
        let err = load(&DataSource::Url(url.to_string())).unwrap_err();
        match err {
            LoadError::Fetch { url: failed, .. } => assert_eq!(failed, url),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[test]
    fn http_error_status_fails_the_load() {
        let url = serve_once("404 Not Found", "");
        let err = load(&DataSource::Url(url)).unwrap_err();
        match err {
            LoadError::Status { status, .. } => assert_eq!(status, reqwest::StatusCode::NOT_FOUND),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn url_body_is_parsed_as_latin1_csv() {
        let url = serve_once(
            "200 OK",
            "Launch Site,class,Payload Mass (kg),Booster Version Category\nCaf\u{e9},1,500,v1\n",
        );
        let table = load(&DataSource::Url(url)).unwrap();
        assert_eq!(table.len(), 1);
        // UTF-8 "é" on the wire is two bytes, each decoded as its own code point.
        assert_eq!(table.sites(), ["Caf\u{c3}\u{a9}"]);
    }

    #[test]
    fn latin1_bytes_decode_to_matching_code_points() {
        assert_eq!(decode_latin1(b"Caf\xe9"), "Café");
    }

    #[test]
    fn source_kind_is_guessed_from_prefix() {
        assert_eq!(
            DataSource::parse("https://example.com/x.csv"),
            DataSource::Url("https://example.com/x.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/launches.csv"),
            DataSource::Path(PathBuf::from("data/launches.csv"))
        );
        assert_eq!(DataSource::default(), DataSource::Url(DEFAULT_SOURCE_URL.to_string()));
    }
}
