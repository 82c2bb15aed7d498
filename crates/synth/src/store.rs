use crate::error::{Result, SynthError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use wordpack_protocol::{normalize_lemma, WordPack};

/// Packs keyed by normalized lemma, optionally backed by a JSON file.
#[derive(Debug, Default)]
pub struct WordPackStore {
    packs: HashMap<String, WordPack>,
    path: Option<PathBuf>,
}

impl WordPackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the store at `path`; a missing file yields an empty store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let packs = match tokio::fs::read_to_string(&path).await {
            Ok(data) => {
                let stored: Vec<WordPack> = serde_json::from_str(&data)?;
                log::info!("Loaded {} word packs from {:?}", stored.len(), path);
                stored
                    .into_iter()
                    .map(|pack| (normalize_lemma(&pack.lemma), pack))
                    .collect()
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No word pack store at {:?}; starting empty", path);
                HashMap::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            packs,
            path: Some(path),
        })
    }

    pub fn get(&self, lemma: &str) -> Option<&WordPack> {
        self.packs.get(&normalize_lemma(lemma))
    }

    pub fn contains(&self, lemma: &str) -> bool {
        self.packs.contains_key(&normalize_lemma(lemma))
    }

    /// Insert or replace; returns the pack previously stored under the same identity.
    pub fn upsert(&mut self, pack: WordPack) -> Option<WordPack> {
        self.packs.insert(normalize_lemma(&pack.lemma), pack)
    }

    pub fn remove(&mut self, lemma: &str) -> Option<WordPack> {
        self.packs.remove(&normalize_lemma(lemma))
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// Stored lemmas in sorted order.
    pub fn lemmas(&self) -> Vec<String> {
        let mut lemmas: Vec<String> = self.packs.keys().cloned().collect();
        lemmas.sort();
        lemmas
    }

    pub async fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| SynthError::Store("store has no backing file".to_string()))?;
        self.save_to(path).await
    }

    pub async fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        log::info!("Saving {} word packs to {:?}", self.len(), path.as_ref());
        let mut packs: Vec<&WordPack> = self.packs.values().collect();
        packs.sort_by(|a, b| a.lemma.cmp(&b.lemma));
        let data = serde_json::to_string_pretty(&packs)?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path.as_ref(), data).await?;
        Ok(())
    }
}
