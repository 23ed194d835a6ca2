//! On-disk state for the CLI
//!
//! The engine is storage-free; between invocations the CLI keeps the whole
//! collection as one JSON snapshot in its data directory.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use studybox_core::{Collection, SchedulerConfig, StudyEngine};
use uuid::Uuid;

/// Snapshot file name inside the data directory
pub const COLLECTION_FILE: &str = "collection.json";

/// Platform data directory (`~/.local/share/studybox` on Linux).
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "studybox", "studybox")
        .ok_or_else(|| anyhow::anyhow!("Could not determine project directories"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Defaults, then the optional JSON file, then environment overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SchedulerConfig> {
    let config = match path {
        Some(path) => SchedulerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SchedulerConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

/// The engine plus the collection it operates on.
pub struct Workspace {
    pub engine: StudyEngine,
    pub collection: Collection,
    data_dir: PathBuf,
}

impl Workspace {
    /// Open the workspace, starting an empty collection if none is saved yet.
    pub fn open(data_dir: Option<PathBuf>, config: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let engine = StudyEngine::new(load_config(config)?)?;

        let path = data_dir.join(COLLECTION_FILE);
        let collection = if path.exists() {
            let file = fs::File::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Collection::read_json(file)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            tracing::info!(path = %path.display(), "No collection yet, starting empty");
            Collection::new()
        };

        tracing::debug!(
            data_dir = %data_dir.display(),
            cards = collection.len(),
            decks = collection.decks().len(),
            "Workspace opened"
        );

        Ok(Self {
            engine,
            collection,
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Write the snapshot, replacing the previous one atomically.
    pub fn save(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;

        let path = self.data_dir.join(COLLECTION_FILE);
        let tmp = self.data_dir.join(format!("{COLLECTION_FILE}.tmp"));
        {
            let file = fs::File::create(&tmp)
                .with_context(|| format!("Failed to create {}", tmp.display()))?;
            self.collection.write_json(BufWriter::new(file))?;
        }
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    /// Resolve a full card id or a unique prefix of one.
    pub fn resolve_card(&self, id_or_prefix: &str) -> anyhow::Result<Uuid> {
        if let Ok(id) = Uuid::parse_str(id_or_prefix) {
            return Ok(id);
        }

        let prefix = id_or_prefix.to_ascii_lowercase();
        let mut matches = self
            .collection
            .cards()
            .iter()
            .filter(|c| c.id.to_string().starts_with(&prefix));

        match (matches.next(), matches.next()) {
            (Some(card), None) => Ok(card.id),
            (None, _) => anyhow::bail!("No card matches '{}'", id_or_prefix),
            (Some(_), Some(_)) => anyhow::bail!("'{}' matches more than one card", id_or_prefix),
        }
    }
}
