use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::LoadError;
use crate::models::domain::PacketRecord;

pub const DEFAULT_DATA_FILE: &str = "network_data.csv";

/// Column names every capture file has to carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Protocol", "Source IP", "Destination IP", "Packet Size"];

#[derive(Debug, Deserialize)]
struct CaptureRow {
    #[serde(rename = "Protocol")]
    protocol: String,
    #[serde(rename = "Source IP")]
    source: String,
    #[serde(rename = "Destination IP")]
    destination: String,
    #[serde(rename = "Packet Size")]
    size: String,
}

/// Read-only handle on a capture CSV. Every `load` re-reads the file.
#[derive(Debug, Clone)]
pub struct CaptureFile {
    path: PathBuf,
}

impl CaptureFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<PacketRecord>, LoadError> {
        load_records(&self.path)
    }
}

pub fn load_records(path: &Path) -> Result<Vec<PacketRecord>, LoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound { path: path.to_path_buf() },
        _ => LoadError::Io { path: path.to_path_buf(), source },
    })?;

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let parse_error = |detail: String| LoadError::Parse { path: path.to_path_buf(), detail };

    let headers = reader.headers().map_err(|e| parse_error(e.to_string()))?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(parse_error("no header row".to_string()));
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::SchemaViolation { path: path.to_path_buf(), missing });
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<CaptureRow>().enumerate() {
        let row = row.map_err(|e| parse_error(e.to_string()))?;
        // header is line 1
        let line = index + 2;
        let size = row.size.trim().parse::<f64>().map_err(|_| {
            parse_error(format!("line {line}: Packet Size {:?} is not a number", row.size))
        })?;
        if !size.is_finite() {
            return Err(parse_error(format!("line {line}: Packet Size {:?} is not finite", row.size)));
        }

        records.push(PacketRecord {
            protocol: row.protocol,
            source_address: row.source,
            destination_address: row.destination,
            size,
        });
    }

    debug!(path = %path.display(), rows = records.len(), "loaded capture file");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn capture(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_in_order() {
        let file = capture(
            "Timestamp,Protocol,Source IP,Destination IP,Packet Size\n\
             1,TCP,1.1.1.1,2.2.2.2,100\n\
             2,UDP,1.1.1.1,3.3.3.3,200.5\n",
        );

        let records = load_records(file.path()).unwrap();
        assert_eq!(
            records,
            vec![
                PacketRecord::new("TCP", "1.1.1.1", "2.2.2.2", 100.0),
                PacketRecord::new("UDP", "1.1.1.1", "3.3.3.3", 200.5),
            ]
        );
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        let file = capture("Protocol,Source IP,Destination IP,Packet Size\n");
        assert!(load_records(file.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("network_data.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn empty_file_is_a_parse_error() {
        let file = capture("");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn ragged_row_is_a_parse_error() {
        let file = capture(
            "Protocol,Source IP,Destination IP,Packet Size\n\
             TCP,1.1.1.1,2.2.2.2\n",
        );
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn non_numeric_size_is_a_parse_error() {
        let file = capture(
            "Protocol,Source IP,Destination IP,Packet Size\n\
             TCP,1.1.1.1,2.2.2.2,big\n",
        );
        match load_records(file.path()).unwrap_err() {
            LoadError::Parse { detail, .. } => assert!(detail.contains("line 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_size_cell_is_a_parse_error() {
        let file = capture(
            "Protocol,Source IP,Destination IP,Packet Size\n\
             TCP,1.1.1.1,2.2.2.2,100\n\
             UDP,1.1.1.1,3.3.3.3,\n",
        );
        match load_records(file.path()).unwrap_err() {
            LoadError::Parse { detail, .. } => {
                assert!(detail.contains("line 3"));
                assert!(detail.contains("Packet Size"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_columns_are_a_schema_violation() {
        let file = capture("Protocol,Source,Destination IP\nTCP,a,b\n");
        match load_records(file.path()).unwrap_err() {
            LoadError::SchemaViolation { missing, .. } => {
                assert_eq!(missing, vec!["Source IP".to_string(), "Packet Size".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn capture_file_rereads_on_every_load() {
        let mut file = capture("Protocol,Source IP,Destination IP,Packet Size\n");
        let source = CaptureFile::new(file.path());
        assert!(source.load().unwrap().is_empty());

        file.write_all(b"TCP,a,b,10\n").unwrap();
        file.flush().unwrap();
        assert_eq!(source.load().unwrap().len(), 1);
    }
}
