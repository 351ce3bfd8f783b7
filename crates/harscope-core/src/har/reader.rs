use super::types::Har;
use crate::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<Har> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let har: Har = serde_json::from_reader(reader)?;

        Self::log_parsed(&har);
        Ok(har)
    }

    /// Parse a HAR document from a JSON string
    pub fn from_str(content: &str) -> Result<Har> {
        tracing::debug!("Parsing HAR from string");

        let har: Har = serde_json::from_str(content)?;

        Self::log_parsed(&har);
        Ok(har)
    }

    /// Parse a HAR document from raw bytes; they must be UTF-8 JSON
    pub fn from_slice(bytes: &[u8]) -> Result<Har> {
        tracing::debug!("Parsing HAR from {} bytes", bytes.len());

        let har: Har = serde_json::from_slice(bytes)?;

        Self::log_parsed(&har);
        Ok(har)
    }

    fn log_parsed(har: &Har) {
        if har.log.entries.is_empty() {
            tracing::warn!("HAR document contains no entries");
        }

        tracing::info!(
            "Successfully parsed HAR with {} entries",
            har.log.entries.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_parse_minimal_har() {
        let har_json = r#"{
            "log": {
                "version": "1.2",
                "creator": {"name": "test", "version": "1.0"},
                "entries": []
            }
        }"#;

        let har = HarReader::from_str(har_json).unwrap();
        assert_eq!(har.log.version, "1.2");
        assert_eq!(har.log.entries.len(), 0);
    }

    #[test]
    fn test_missing_log_is_empty_document() {
        let har = HarReader::from_str("{}").unwrap();
        assert!(har.log.entries.is_empty());

        let har = HarReader::from_str(r#"{"log": {}}"#).unwrap();
        assert!(har.log.entries.is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = HarReader::from_str("{not json");
        assert!(matches!(result, Err(Error::Parse(_))));

        let result = HarReader::from_slice(&[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_from_file_reads_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("one.har");
        std::fs::write(
            &path,
            r#"{"log": {"entries": [{"request": {"url": "https://a.test/"}}]}}"#,
        )
        .unwrap();

        let har = HarReader::from_file(&path).unwrap();
        assert_eq!(har.log.entries.len(), 1);
        assert_eq!(har.log.entries[0].request.url, "https://a.test/");
    }
}
