/// Extensions classified as video. Anything else, including a missing
/// extension, is treated as an image.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "ogv", "mov", "m4v", "mkv", "avi"];

/// Extensions picked up when scanning a directory for images.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a source path by the text after its final `.`.
    ///
    /// Total and case-insensitive: unknown or missing extensions fall back to
    /// `Image` instead of failing.
    pub fn infer(source: &str) -> Self {
        let ext = match source.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return Self::Image,
        };
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Video
        } else {
            Self::Image
        }
    }

    /// Strict variant used by the directory scanner, which skips files that
    /// are neither a known image nor a known video.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else {
            None
        }
    }

    pub fn is_video(self) -> bool {
        self == Self::Video
    }

    /// How an item of this kind is presented inside the viewer.
    pub fn render_spec(self) -> RenderSpec {
        match self {
            Self::Image => RenderSpec::Image {
                placeholder_on_error: true,
            },
            Self::Video => RenderSpec::Video(PlaybackSpec::VIEWER),
        }
    }
}

/// Playback flags applied to a video surface. Playback always stays inside
/// the widget it was started in; nothing goes fullscreen on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSpec {
    pub autoplay: bool,
    /// Autoplay is only permitted for muted streams.
    pub muted: bool,
    pub looping: bool,
    pub controls: bool,
}

/// Widget used to present a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSurface {
    /// `gtk::Video` with its transport controls.
    WithControls,
    /// A plain picture painting the stream frames.
    Bare,
}

impl PlaybackSpec {
    /// Active item in the viewer.
    pub const VIEWER: Self = Self {
        autoplay: true,
        muted: true,
        looping: true,
        controls: true,
    };

    /// Silent preview inside a grid tile.
    pub const TILE_PREVIEW: Self = Self {
        autoplay: true,
        muted: true,
        looping: true,
        controls: false,
    };

    pub fn surface(self) -> VideoSurface {
        if self.controls {
            VideoSurface::WithControls
        } else {
            VideoSurface::Bare
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSpec {
    Image { placeholder_on_error: bool },
    Video(PlaybackSpec),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub kind: MediaKind,
    pub source: String,
}

impl MediaDescriptor {
    /// Descriptor whose kind comes from the source extension.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            kind: MediaKind::infer(&source),
            source,
        }
    }

    /// Descriptor with an explicit kind tag. The tag wins over the extension;
    /// a disagreement is logged so the catalog can be fixed.
    pub fn tagged(kind: MediaKind, source: impl Into<String>) -> Self {
        let source = source.into();
        let inferred = MediaKind::infer(&source);
        if inferred != kind {
            tracing::warn!(
                source = %source,
                tagged = ?kind,
                inferred = ?inferred,
                "Media kind tag disagrees with file extension, keeping tag"
            );
        }
        Self { kind, source }
    }

    /// True when the tag and the extension agree.
    pub fn is_consistent(&self) -> bool {
        MediaKind::infer(&self.source) == self.kind
    }

    pub fn is_video(&self) -> bool {
        self.kind.is_video()
    }

    /// Accessible label for the item at display position `index`.
    pub fn alt_text(index: usize) -> String {
        format!("Memory {}", index + 1)
    }

    /// Last path component, for captions.
    pub fn file_name(&self) -> &str {
        self.source
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_video_extensions() {
        assert_eq!(MediaKind::infer("/media/video/1.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::infer("clip.webm"), MediaKind::Video);
        assert_eq!(MediaKind::infer("clip.ogg"), MediaKind::Video);
    }

    #[test]
    fn test_infer_is_case_insensitive() {
        assert_eq!(MediaKind::infer("CLIP.MP4"), MediaKind::Video);
        assert_eq!(MediaKind::infer("clip.WebM"), MediaKind::Video);
        assert_eq!(MediaKind::infer("photo.JPEG"), MediaKind::Image);
    }

    #[test]
    fn test_infer_falls_back_to_image() {
        assert_eq!(MediaKind::infer("photo.jpeg"), MediaKind::Image);
        assert_eq!(MediaKind::infer("no_extension"), MediaKind::Image);
        assert_eq!(MediaKind::infer(""), MediaKind::Image);
        assert_eq!(MediaKind::infer("trailing."), MediaKind::Image);
        assert_eq!(MediaKind::infer("archive.mp4.zip"), MediaKind::Image);
        // Only the text after the final dot counts.
        assert_eq!(MediaKind::infer("dir.mp4/frame"), MediaKind::Image);
    }

    #[test]
    fn test_infer_is_deterministic() {
        for source in ["a.jpeg", "b.MOV", "c", "d.gif"] {
            assert_eq!(MediaKind::infer(source), MediaKind::infer(source));
        }
    }

    #[test]
    fn test_from_extension_is_strict() {
        assert_eq!(MediaKind::from_extension("PNG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("mkv"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_extension("txt"), None);
    }

    #[test]
    fn test_video_render_spec_autoplays_muted_looping() {
        match MediaKind::Video.render_spec() {
            RenderSpec::Video(spec) => {
                assert!(spec.autoplay);
                assert!(spec.muted);
                assert!(spec.looping);
                assert_eq!(spec.surface(), VideoSurface::WithControls);
            }
            other => panic!("unexpected render spec: {:?}", other),
        }
        assert!(PlaybackSpec::TILE_PREVIEW.muted);
    }

    #[test]
    fn test_tile_preview_has_no_controls() {
        assert_eq!(PlaybackSpec::TILE_PREVIEW.surface(), VideoSurface::Bare);
        assert_eq!(PlaybackSpec::VIEWER.surface(), VideoSurface::WithControls);
    }

    #[test]
    fn test_image_render_spec_falls_back_to_placeholder() {
        assert_eq!(
            MediaKind::Image.render_spec(),
            RenderSpec::Image {
                placeholder_on_error: true
            }
        );
    }

    #[test]
    fn test_tagged_kind_wins_over_extension() {
        let item = MediaDescriptor::tagged(MediaKind::Video, "odd.jpeg");
        assert_eq!(item.kind, MediaKind::Video);
        assert!(!item.is_consistent());

        let item = MediaDescriptor::tagged(MediaKind::Image, "photos/1.jpeg");
        assert!(item.is_consistent());
    }

    #[test]
    fn test_alt_text_and_file_name() {
        assert_eq!(MediaDescriptor::alt_text(0), "Memory 1");
        let item = MediaDescriptor::new("/media/photos/3.jpeg");
        assert_eq!(item.file_name(), "3.jpeg");
        assert_eq!(MediaDescriptor::new("plain.png").file_name(), "plain.png");
    }
}
