use crate::config::RouteBlend;
use crate::constants::{
    LATEST_RATINGS_POINTER, RATINGS_ARTIFACT_EXTENSION, RATINGS_ARTIFACT_PREFIX,
    RATINGS_ARTIFACT_VERSION,
};
use crate::error::{AppError, Result};
use crate::models::RatingTables;
use crate::ratings::builder::RatingBuild;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

// ── Types ───────────────────────────────────────────────────

/// One published batch of rating tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingsArtifact {
    pub version: u32,
    pub generated_at: String,
    pub route_blend: RouteBlend,
    pub incident_count_total: usize,
    pub relevant_incident_count: usize,
    #[serde(flatten)]
    pub tables: RatingTables,
}

impl RatingsArtifact {
    pub fn from_build(build: RatingBuild, generated_at: OffsetDateTime) -> Self {
        let generated_at = generated_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        RatingsArtifact {
            version: RATINGS_ARTIFACT_VERSION,
            generated_at,
            route_blend: build.route_blend,
            incident_count_total: build.total_incidents,
            relevant_incident_count: build.relevant_incidents,
            tables: build.tables,
        }
    }
}

/// Directory of timestamped artifacts plus a pointer naming the latest one.
#[derive(Debug, Clone)]
pub struct RatingsStore {
    dir: PathBuf,
}

impl RatingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pointer_path(&self) -> PathBuf {
        self.dir.join(LATEST_RATINGS_POINTER)
    }

    /// `risk_ratings_YYYYMMDD_HHMMSS.json`
    pub fn artifact_file_name(stamp: OffsetDateTime) -> Result<String> {
        let format = time::format_description::parse("[year][month][day]_[hour][minute][second]")
            .map_err(|e| AppError::Internal(format!("Bad timestamp format: {e}")))?;
        let stamp = stamp
            .format(&format)
            .map_err(|e| AppError::Internal(format!("Failed to format timestamp: {e}")))?;
        Ok(format!(
            "{}{}.{}",
            RATINGS_ARTIFACT_PREFIX, stamp, RATINGS_ARTIFACT_EXTENSION
        ))
    }

    // ── Save ────────────────────────────────────────────────

    /// Write the artifact, then move the pointer to it.
    ///
    /// Both files are written to a temporary name and renamed into place, and
    /// the pointer rename happens last: readers see either the previous
    /// artifact or the complete new one. On any error the pointer is untouched.
    pub fn publish(&self, artifact: &RatingsArtifact, stamp: OffsetDateTime) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::RatingsArtifact(format!(
                "Failed to create directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let file_name = Self::artifact_file_name(stamp)?;
        let artifact_path = self.dir.join(&file_name);
        let json = serde_json::to_string_pretty(artifact)?;
        write_atomically(&artifact_path, json.as_bytes())?;

        write_atomically(&self.pointer_path(), file_name.as_bytes())?;

        tracing::info!(
            artifact = %artifact_path.display(),
            routes = artifact.tables.routes.len(),
            liable_parties = artifact.tables.liable_parties.len(),
            "Published ratings artifact {}",
            file_name
        );
        Ok(artifact_path)
    }

    // ── Load ────────────────────────────────────────────────

    /// Resolve the latest artifact: the pointer when it names an existing
    /// file, otherwise the newest artifact by file name. `None` when the
    /// directory holds no artifact at all.
    pub fn resolve_latest(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = self.read_pointer() {
            return Ok(Some(path));
        }

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut newest: Option<String> = None;
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if is_artifact_name(&name) && newest.as_ref().map_or(true, |n| name > *n) {
                newest = Some(name);
            }
        }

        if let Some(ref name) = newest {
            tracing::warn!(
                pointer = %self.pointer_path().display(),
                fallback = %name,
                "Ratings pointer missing or stale, using newest artifact {}",
                name
            );
        }
        Ok(newest.map(|name| self.dir.join(name)))
    }

    pub fn load(&self, path: &Path) -> Result<RatingsArtifact> {
        let data = fs::read_to_string(path).map_err(|e| {
            AppError::RatingsArtifact(format!(
                "Failed to read ratings at {}: {e}",
                path.display()
            ))
        })?;
        let artifact: RatingsArtifact = serde_json::from_str(&data).map_err(|e| {
            AppError::RatingsArtifact(format!(
                "Failed to parse ratings at {}: {e}",
                path.display()
            ))
        })?;
        Ok(artifact)
    }

    pub fn load_latest(&self) -> Result<Option<RatingsArtifact>> {
        match self.resolve_latest()? {
            Some(path) => self.load(&path).map(Some),
            None => Ok(None),
        }
    }

    /// Pointer target, if the pointer exists and names a file that is still there.
    fn read_pointer(&self) -> Option<PathBuf> {
        let contents = fs::read_to_string(self.pointer_path()).ok()?;
        // Older pointers held a relative path; only the file name is meaningful.
        let file_name = Path::new(contents.trim()).file_name()?.to_owned();
        let path = self.dir.join(file_name);
        path.is_file().then_some(path)
    }
}

fn is_artifact_name(name: &str) -> bool {
    name.starts_with(RATINGS_ARTIFACT_PREFIX)
        && Path::new(name)
            .extension()
            .is_some_and(|ext| ext == RATINGS_ARTIFACT_EXTENSION)
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::Internal(format!("Not a file path: {}", path.display())))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    fs::write(&tmp_path, contents).map_err(|e| {
        AppError::RatingsArtifact(format!("Write error for {}: {e}", tmp_path.display()))
    })?;
    fs::rename(&tmp_path, path).map_err(|e| {
        AppError::RatingsArtifact(format!("Rename error for {}: {e}", path.display()))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn artifact_names_sort_by_time() {
        let early = RatingsStore::artifact_file_name(datetime!(2024-03-09 08:05:07 UTC)).unwrap();
        let late = RatingsStore::artifact_file_name(datetime!(2024-11-20 17:45:00 UTC)).unwrap();
        assert_eq!(early, "risk_ratings_20240309_080507.json");
        assert!(late > early);
    }

    #[test]
    fn recognizes_artifact_names() {
        assert!(is_artifact_name("risk_ratings_20240309_080507.json"));
        assert!(!is_artifact_name("risk_ratings_20240309_080507.xlsx"));
        assert!(!is_artifact_name(".risk_ratings_20240309_080507.json.tmp"));
        assert!(!is_artifact_name(LATEST_RATINGS_POINTER));
    }
}
