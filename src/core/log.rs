//! Plain-text transcript logging behind the `-l/--log` flag.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub struct TranscriptLog {
    path: Option<PathBuf>,
}

impl TranscriptLog {
    /// Verifies the file is writable up front so a bad path fails at startup
    /// rather than on the first message.
    pub fn new(path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.map(PathBuf::from);
        if let Some(ref p) = path {
            let mut file = OpenOptions::new().create(true).append(true).open(p)?;
            file.flush()?;
        }
        Ok(Self { path })
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Append one transcript line, followed by a blank spacer line to match
    /// the on-screen message spacing.
    pub fn record(&self, speaker: &str, text: &str) -> Result<(), std::io::Error> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        for line in text.lines() {
            writeln!(file, "{speaker}: {line}")?;
        }
        writeln!(file)?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn disabled_log_records_nothing() {
        let log = TranscriptLog::disabled();
        assert!(!log.is_enabled());
        log.record("You", "hello").unwrap();
    }

    #[test]
    fn records_speaker_prefixed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.log");
        let log = TranscriptLog::new(Some(path.to_string_lossy().into_owned())).unwrap();

        log.record("You", "Hello there").unwrap();
        log.record("Gemini", "Hi there").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "You: Hello there\n\nGemini: Hi there\n\n");
    }

    #[test]
    fn unwritable_path_fails_at_construction() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("chat.log");
        assert!(TranscriptLog::new(Some(path.to_string_lossy().into_owned())).is_err());
    }
}
