//! Audit copies of validated records
//!
//! One pretty-printed JSON file per target, named by the URL-safe base64 of
//! the identifier so identifiers never have to be valid file names.

use crate::schema::ValidatedRecord;
use crate::sink::SinkResult;
use crate::target::TargetId;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use std::path::PathBuf;

/// Writes audit files into a directory
#[derive(Debug, Clone)]
pub struct AuditWriter {
    dir: PathBuf,
}

impl AuditWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<dir>/<base64(id)>.json`
    pub fn path_for(&self, id: &TargetId) -> PathBuf {
        self.dir
            .join(format!("{}.json", URL_SAFE.encode(id.as_str())))
    }

    /// Writes the record, overwriting any earlier copy
    pub async fn write(&self, record: &ValidatedRecord) -> SinkResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(record.id());
        tokio::fs::write(&path, record.to_json_pretty()?).await?;

        Ok(path)
    }
}
