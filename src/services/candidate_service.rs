use crate::error::{Error, Result};
use crate::models::candidate::CandidateRecord;
use crate::utils::{text::slugify, time};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

const MAX_NAME_COLLISIONS: usize = 100;

/// Writes finished candidate records as one JSON document per file.
#[derive(Clone)]
pub struct CandidateService {
    data_dir: PathBuf,
}

impl CandidateService {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Serializes a snapshot of `record` to `candidate_<slug>_<stamp>.json`.
    ///
    /// Needs a name. Existing files are never touched: a numeric suffix is
    /// added when the name is already taken.
    pub async fn persist(&self, record: &CandidateRecord) -> Result<PathBuf> {
        let name = record
            .name()
            .filter(|n| !n.trim().is_empty())
            .ok_or(Error::MissingCandidateName)?;

        let snapshot = record.snapshot();
        let body = serde_json::to_vec_pretty(&snapshot)?;
        fs::create_dir_all(&self.data_dir).await?;

        let base = format!("candidate_{}_{}", slugify(name), time::file_stamp(time::now()));
        for n in 0..MAX_NAME_COLLISIONS {
            let file_name = if n == 0 {
                format!("{}.json", base)
            } else {
                format!("{}_{}.json", base, n)
            };
            let path = self.data_dir.join(file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(mut file) => {
                    file.write_all(&body).await?;
                    file.flush().await?;
                    tracing::info!("Candidate data saved to {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    tracing::error!("Failed to save candidate data to {}: {}", path.display(), e);
                    return Err(e.into());
                }
            }
        }

        Err(Error::Internal(format!(
            "No free file name for {} in {}",
            base,
            self.data_dir.display()
        )))
    }
}
