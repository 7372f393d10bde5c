//! Loads bundled font files from disk.

use std::path::PathBuf;

use async_trait::async_trait;
use mm_core::ports::FontLoaderPort;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// A font file read into memory.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub struct FileFontLoader {
    dir: PathBuf,
    /// Explicit file list. Empty means every `.ttf`/`.otf` in `dir`.
    files: Vec<String>,
    loaded: Mutex<Vec<LoadedFont>>,
}

impl FileFontLoader {
    pub fn new(dir: impl Into<PathBuf>, files: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            files,
            loaded: Mutex::new(Vec::new()),
        }
    }

    pub async fn loaded_names(&self) -> Vec<String> {
        self.loaded
            .lock()
            .await
            .iter()
            .map(|font| font.name.clone())
            .collect()
    }

    async fn discover(&self) -> anyhow::Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read font dir {}: {e}", self.dir.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_font = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
            if is_font {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl FontLoaderPort for FileFontLoader {
    async fn load_fonts(&self) -> anyhow::Result<usize> {
        let names = if self.files.is_empty() {
            self.discover().await?
        } else {
            self.files.clone()
        };

        let mut fonts = Vec::with_capacity(names.len());
        for name in names {
            let path = self.dir.join(&name);
            let bytes = fs::read(&path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load font {}: {e}", path.display()))?;
            debug!(font = %name, size = bytes.len(), "Loaded font");
            fonts.push(LoadedFont { name, bytes });
        }

        let count = fonts.len();
        *self.loaded.lock().await = fonts;
        info!(count, dir = %self.dir.display(), "Fonts loaded");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn discovers_font_files_when_no_list_given() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Uncut-Sans-Bold.otf"), b"otf")
            .await
            .unwrap();
        fs::write(temp_dir.path().join("Inter.TTF"), b"ttf")
            .await
            .unwrap();
        fs::write(temp_dir.path().join("README.md"), b"docs")
            .await
            .unwrap();

        let loader = FileFontLoader::new(temp_dir.path(), Vec::new());

        assert_eq!(loader.load_fonts().await.unwrap(), 2);
        assert_eq!(
            loader.loaded_names().await,
            vec!["Inter.TTF".to_string(), "Uncut-Sans-Bold.otf".to_string()]
        );
    }

    #[tokio::test]
    async fn missing_listed_font_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let loader = FileFontLoader::new(temp_dir.path(), vec!["Missing.otf".into()]);

        let err = loader.load_fonts().await.unwrap_err();

        assert!(err.to_string().contains("Missing.otf"));
    }
}
