//! Ordered media catalog shown by the grid and the viewer.
//!
//! The catalog is built once at startup, either from the built-in list of
//! photos and videos under the media root or by scanning a directory, and is
//! never reordered afterwards so tile indices stay valid for every viewer
//! session.

use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::CatalogError;
use crate::models::{MediaDescriptor, MediaKind};

/// Number of photos in the built-in catalog.
const BUILTIN_PHOTO_COUNT: usize = 9;
/// Number of videos in the built-in catalog.
const BUILTIN_VIDEO_COUNT: usize = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<MediaDescriptor>,
}

impl Catalog {
    pub fn new(items: Vec<MediaDescriptor>) -> Self {
        Self { items }
    }

    /// Built-in catalog: `photos/1.jpeg`..`photos/9.jpeg` followed by
    /// `video/1.mp4`, resolved against `root`. Entries carry explicit tags.
    pub fn builtin(root: &Path) -> Self {
        let photos = (1..=BUILTIN_PHOTO_COUNT).map(|n| {
            let path = root.join("photos").join(format!("{}.jpeg", n));
            MediaDescriptor::tagged(MediaKind::Image, path.to_string_lossy())
        });
        let videos = (1..=BUILTIN_VIDEO_COUNT).map(|n| {
            let path = root.join("video").join(format!("{}.mp4", n));
            MediaDescriptor::tagged(MediaKind::Video, path.to_string_lossy())
        });
        Self::new(photos.chain(videos).collect())
    }

    /// Recursively scan `dir` for recognised images and videos.
    ///
    /// Hidden files and directories are skipped. Entries are sorted by path
    /// so the display order is stable between runs.
    pub fn scan(dir: &Path) -> Result<Self, CatalogError> {
        if !dir.exists() {
            return Err(CatalogError::MissingDirectory(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(CatalogError::NotADirectory(dir.to_path_buf()));
        }

        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || entry
                        .file_name()
                        .to_str()
                        .map(|name| !name.starts_with('.'))
                        .unwrap_or(true)
            });

        let mut items = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| CatalogError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(kind) = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(MediaKind::from_extension)
            else {
                debug!(path = %path.display(), "Skipping unsupported file");
                continue;
            };
            items.push(MediaDescriptor::tagged(kind, path.to_string_lossy()));
        }

        info!(dir = %dir.display(), count = items.len(), "Scanned media directory");
        Ok(Self::new(items))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&MediaDescriptor> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaDescriptor> {
        self.items.iter()
    }

    /// Source strings in display order, as handed to the viewer.
    pub fn sources(&self) -> Vec<String> {
        self.items.iter().map(|item| item.source.clone()).collect()
    }

    /// Indices whose explicit tag disagrees with the extension.
    pub fn kind_conflicts(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_consistent())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn video_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_video()).count()
    }

    /// Header line summarising the catalog size.
    pub fn summary(&self) -> String {
        format!(
            "{} snapshots of love, laughter, and sibling magic.",
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_builtin_catalog_order() {
        let catalog = Catalog::builtin(Path::new("/media"));
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.video_count(), 1);
        assert_eq!(
            PathBuf::from(&catalog.get(0).unwrap().source),
            PathBuf::from("/media/photos/1.jpeg")
        );
        assert_eq!(
            PathBuf::from(&catalog.get(9).unwrap().source),
            PathBuf::from("/media/video/1.mp4")
        );
        assert!(catalog.get(10).is_none());
    }

    #[test]
    fn test_builtin_tags_match_extensions() {
        let catalog = Catalog::builtin(Path::new("media"));
        assert!(catalog.kind_conflicts().is_empty());
        for item in catalog.iter() {
            assert_eq!(MediaKind::infer(&item.source), item.kind);
        }
    }

    #[test]
    fn test_kind_conflicts_reports_indices() {
        let catalog = Catalog::new(vec![
            MediaDescriptor::new("a.jpeg"),
            MediaDescriptor::tagged(MediaKind::Image, "b.mp4"),
            MediaDescriptor::new("c.mp4"),
        ]);
        assert_eq!(catalog.kind_conflicts(), vec![1]);
    }

    #[test]
    fn test_sources_preserve_order() {
        let catalog = Catalog::new(vec![
            MediaDescriptor::new("a.jpeg"),
            MediaDescriptor::new("b.jpeg"),
            MediaDescriptor::new("c.mp4"),
        ]);
        assert_eq!(catalog.sources(), vec!["a.jpeg", "b.jpeg", "c.mp4"]);
        assert_eq!(catalog.summary(), "3 snapshots of love, laughter, and sibling magic.");
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("photos")).unwrap();
        fs::create_dir(root.join(".hidden")).unwrap();
        fs::write(root.join("photos/b.JPG"), b"x").unwrap();
        fs::write(root.join("photos/a.png"), b"x").unwrap();
        fs::write(root.join("clip.mp4"), b"x").unwrap();
        fs::write(root.join("notes.txt"), b"x").unwrap();
        fs::write(root.join(".hidden/secret.png"), b"x").unwrap();
        fs::write(root.join(".dot.png"), b"x").unwrap();

        let catalog = Catalog::scan(root).unwrap();
        let names: Vec<&str> = catalog.iter().map(|item| item.file_name()).collect();
        assert_eq!(names, vec!["clip.mp4", "a.png", "b.JPG"]);
        assert_eq!(catalog.get(0).unwrap().kind, MediaKind::Video);
        assert!(catalog.kind_conflicts().is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            Catalog::scan(&missing),
            Err(CatalogError::MissingDirectory(_))
        ));

        let file = dir.path().join("file.png");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            Catalog::scan(&file),
            Err(CatalogError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::scan(dir.path()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.sources().is_empty());
    }
}
