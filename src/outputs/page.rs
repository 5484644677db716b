//! The hosting page: a brand container and a "last updated" label.
//!
//! [`Board`] is the in-memory display surface the orchestrator mounts cards
//! into. It is serialized to a standalone HTML document with two addressable
//! regions, `#lastUpdated` and `#brands`, from `templates/page.html`.

use crate::render::Fragment;
use askama::Template;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

const PAGE_TITLE: &str = "Press releases";

/// Mounted cards plus the global status label.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Board {
    fragments: Vec<Fragment>,
    last_updated: String,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all mounted cards and blank the label.
    pub fn clear(&mut self) {
        self.fragments.clear();
        self.last_updated.clear();
    }

    pub fn mount(&mut self, fragment: Fragment) {
        debug!(brand = %fragment.brand, "Mounted card");
        self.fragments.push(fragment);
    }

    pub fn set_last_updated(&mut self, label: impl Into<String>) {
        self.last_updated = label.into();
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    /// Serialize the whole page.
    pub fn to_document(&self) -> askama::Result<String> {
        let cards = self
            .fragments
            .iter()
            .map(Fragment::to_html)
            .collect::<askama::Result<Vec<_>>>()?;
        PageTemplate {
            title: PAGE_TITLE,
            last_updated: &self.last_updated,
            cards,
        }
        .render()
    }
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    last_updated: &'a str,
    /// Pre-rendered, already escaped card markup.
    cards: Vec<String>,
}

/// Write the board to `path`, creating parent directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn write_board(board: &Board, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    fs::write(path, board.to_document()?).await?;
    info!(cards = board.fragments().len(), "Wrote board page");
    Ok(())
}

/// Make sure the output file's directory exists and accepts writes.
///
/// Runs before any feed is fetched so a bad output path fails fast.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn ensure_writable_parent(path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let dir = match path.as_ref().parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;

    let probe = dir.join(".__probe_write__");
    fs::write(&probe, b"").await?;
    let _ = fs::remove_file(&probe).await;
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
