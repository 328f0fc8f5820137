//! Delivery sinks for rendered artifacts

use super::exporter::ExportArtifact;
use super::options::plain_base_name;
use crate::error::{Result, TodoError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destination for a rendered export
pub trait DeliverySink {
    /// Persist one artifact
    fn deliver(&self, artifact: &ExportArtifact) -> Result<()>;
}

/// Writes artifacts into a directory under their derived filename
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    /// Create a sink that refuses to replace existing files
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    /// Allow replacing existing files
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where an artifact with `filename` would be written
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Hidden temp file next to the target, named after it
    fn temp_path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(format!(".{}.tmp", filename))
    }

    fn write_atomic(&self, path: &Path, filename: &str, payload: &str) -> std::io::Result<()> {
        let temp_path = self.temp_path_for(filename);
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(payload.as_bytes())?;
            file.flush()?;
        }

        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            e
        })
    }
}

impl DeliverySink for DirectorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<()> {
        let delivery_error = |message: String| TodoError::Delivery {
            filename: artifact.filename.clone(),
            message,
        };

        if plain_base_name(&artifact.filename) != Some(artifact.filename.as_str()) {
            return Err(delivery_error("not a plain file name".to_string()));
        }

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .map_err(|e| delivery_error(format!("cannot create {}: {}", self.dir.display(), e)))?;
            debug!("Created export directory: {:?}", self.dir);
        }

        let path = self.path_for(&artifact.filename);
        if path.exists() && !self.overwrite {
            return Err(delivery_error(format!("{} already exists", path.display())));
        }

        self.write_atomic(&path, &artifact.filename, &artifact.payload)
            .map_err(|e| delivery_error(e.to_string()))?;

        info!(
            "Wrote {} ({} bytes, {})",
            path.display(),
            artifact.payload.len(),
            artifact.mime_type
        );
        Ok(())
    }
}

/// Writes the payload to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl DeliverySink for StdoutSink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(artifact.payload.as_bytes())
            .and_then(|_| handle.flush())
            .map_err(|e| TodoError::Delivery {
                filename: artifact.filename.clone(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::cell::RefCell;

    /// Sink that keeps artifacts in memory and can fail for chosen filenames
    #[derive(Default)]
    pub struct RecordingSink {
        pub delivered: RefCell<Vec<ExportArtifact>>,
        pub fail_extension: Option<&'static str>,
    }

    impl RecordingSink {
        pub fn failing_on(extension: &'static str) -> Self {
            Self {
                delivered: RefCell::new(Vec::new()),
                fail_extension: Some(extension),
            }
        }
    }

    impl DeliverySink for RecordingSink {
        fn deliver(&self, artifact: &ExportArtifact) -> Result<()> {
            if let Some(ext) = self.fail_extension {
                if artifact.filename.ends_with(ext) {
                    return Err(TodoError::Delivery {
                        filename: artifact.filename.clone(),
                        message: "rejected".to_string(),
                    });
                }
            }
            self.delivered.borrow_mut().push(artifact.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportFormat;
    use tempfile::TempDir;

    fn artifact(filename: &str, payload: &str) -> ExportArtifact {
        ExportArtifact {
            format: ExportFormat::Markdown,
            payload: payload.to_string(),
            filename: filename.to_string(),
            mime_type: "text/markdown".to_string(),
            task_count: 1,
        }
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path().join("out"));

        sink.deliver(&artifact("tasks.md", "# hi\n")).unwrap();

        let path = temp.path().join("out").join("tasks.md");
        assert_eq!(fs::read_to_string(&path).unwrap(), "# hi\n");
        assert!(!sink.temp_path_for("tasks.md").exists());
    }

    #[test]
    fn test_directory_sink_keeps_unrelated_tmp_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("report.tmp"), "user data").unwrap();
        let sink = DirectorySink::new(temp.path());

        sink.deliver(&artifact("report.md", "# report\n")).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("report.tmp")).unwrap(),
            "user data"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("report.md")).unwrap(),
            "# report\n"
        );
    }

    #[test]
    fn test_directory_sink_rejects_path_in_filename() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path().join("out"));

        let result = sink.deliver(&artifact("../escaped.md", "x"));
        assert!(matches!(result, Err(TodoError::Delivery { .. })));
        assert!(!temp.path().join("escaped.md").exists());
    }

    #[test]
    fn test_directory_sink_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path());
        sink.deliver(&artifact("tasks.md", "first")).unwrap();

        let result = sink.deliver(&artifact("tasks.md", "second"));
        assert!(matches!(result, Err(TodoError::Delivery { .. })));
        assert_eq!(fs::read_to_string(temp.path().join("tasks.md")).unwrap(), "first");
    }

    #[test]
    fn test_directory_sink_overwrite_enabled() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path()).overwrite(true);
        sink.deliver(&artifact("tasks.md", "first")).unwrap();
        sink.deliver(&artifact("tasks.md", "second")).unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("tasks.md")).unwrap(), "second");
    }

    #[test]
    fn test_crlf_preserved_on_disk() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path());
        sink.deliver(&artifact("cal.ics", "A\r\nB")).unwrap();
        assert_eq!(fs::read(temp.path().join("cal.ics")).unwrap(), b"A\r\nB");
    }
}
