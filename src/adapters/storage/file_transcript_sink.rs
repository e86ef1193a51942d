//! File-based Transcript Sink Adapter
//!
//! Writes each finished conversation as one YAML document named
//! `<kind>_intake_<record-id>_<YYYYmmdd_HHMMSS>.yaml`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::intake::SessionTranscript;
use crate::ports::{TranscriptError, TranscriptSink};

/// File-based transcript storage
#[derive(Debug, Clone)]
pub struct FileTranscriptSink {
    base_path: PathBuf,
}

impl FileTranscriptSink {
    /// Create a sink writing into `base_path` (created on first write)
    ///
    /// # Example
    /// ```ignore
    /// let sink = FileTranscriptSink::new("./data/transcripts");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Path the transcript is written to
    pub fn file_path(&self, transcript: &SessionTranscript) -> PathBuf {
        self.base_path
            .join(format!("{}.yaml", transcript.file_stem()))
    }
}

#[async_trait]
impl TranscriptSink for FileTranscriptSink {
    async fn write(&self, transcript: &SessionTranscript) -> Result<(), TranscriptError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| TranscriptError::IoError(e.to_string()))?;

        let yaml = serde_yaml::to_string(transcript)
            .map_err(|e| TranscriptError::SerializationFailed(e.to_string()))?;

        fs::write(self.file_path(transcript), yaml)
            .await
            .map_err(|e| TranscriptError::IoError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{IntakeSessionId, Timestamp};
    use crate::domain::intake::{ConversationState, RecordKind, TranscriptEntry, TypedValue};
    use tempfile::TempDir;

    fn transcript() -> SessionTranscript {
        let mut state = ConversationState::new(
            IntakeSessionId::new(),
            RecordKind::Incident,
            Timestamp::from_unix_secs(1_705_276_800),
        );
        state
            .accept(
                "VPN credentials phished",
                Some(TypedValue::Text("VPN credentials phished".to_string())),
                None,
                Timestamp::from_unix_secs(1_705_276_810),
            )
            .unwrap();
        let entries = vec![TranscriptEntry {
            step_index: 0,
            prompt: "What would you like to title this incident?".to_string(),
            raw_input: "VPN credentials phished".to_string(),
            diagnostic: None,
            timestamp: Timestamp::from_unix_secs(1_705_276_810),
        }];
        SessionTranscript::capture(&state, entries, Timestamp::from_unix_secs(1_705_276_900))
    }

    #[tokio::test]
    async fn writes_yaml_named_after_record() {
        let dir = TempDir::new().unwrap();
        let sink = FileTranscriptSink::new(dir.path().join("transcripts"));
        let doc = transcript();

        sink.write(&doc).await.unwrap();

        let path = dir
            .path()
            .join("transcripts")
            .join("incident_intake_INC-276800_20240115_000140.yaml");
        let yaml = std::fs::read_to_string(path).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value["record_id"].as_str(), Some("INC-276800"));
        assert_eq!(value["completed"].as_bool(), Some(false));
        assert_eq!(
            value["fields"][0]["value"].as_str(),
            Some("VPN credentials phished")
        );
        assert_eq!(
            value["entries"][0]["raw_input"].as_str(),
            Some("VPN credentials phished")
        );
    }

    #[tokio::test]
    async fn unwritable_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let sink = FileTranscriptSink::new(&blocker);

        let err = sink.write(&transcript()).await.unwrap_err();
        assert!(matches!(err, TranscriptError::IoError(_)));
    }
}
