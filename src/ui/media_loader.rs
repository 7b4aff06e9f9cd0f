// Background image decoding for grid tiles
// A small worker pool decodes thumbnails off the main thread; results are
// polled on the GTK main loop and cached as textures.

use gdk4::Texture;
use gtk4::prelude::*;
use gtk4::gdk;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::image_loader::{self, DecodedImage};

const TILE_PREVIEW_SIZE: u32 = 512;
const TILE_LOADER_QUEUE: usize = 512;
const TILE_CACHE_ENTRIES: usize = 256;
const RESULT_POLL_INTERVAL_MS: u64 = 16;

static LOADER_THREADS: AtomicUsize = AtomicUsize::new(2);

/// Placeholder shown for tiles still loading and for failed images.
pub fn placeholder_texture() -> Texture {
    thread_local! {
        static PLACEHOLDER: Texture = build_placeholder();
    }
    PLACEHOLDER.with(Texture::clone)
}

fn build_placeholder() -> Texture {
    let size: usize = 64;
    let mut pixels = vec![0u8; size * size * 4];

    // Muted plum background with a lighter diagonal band.
    for y in 0..size {
        for x in 0..size {
            let idx = (y * size + x) * 4;
            let on_band = x.abs_diff(y) < 6 || x.abs_diff(size - 1 - y) < 6;
            let shade: [u8; 4] = if on_band {
                [0x4a, 0x3a, 0x5c, 0xff]
            } else {
                [0x2a, 0x22, 0x33, 0xff]
            };
            pixels[idx..idx + 4].copy_from_slice(&shade);
        }
    }

    let bytes = glib::Bytes::from_owned(pixels);
    gdk::MemoryTexture::new(
        size as i32,
        size as i32,
        gdk::MemoryFormat::R8g8b8a8,
        &bytes,
        size * 4,
    )
    .upcast()
}

pub fn create_texture_from_rgba(image: DecodedImage) -> Option<Texture> {
    let DecodedImage {
        rgba,
        width,
        height,
    } = image;
    if width == 0 || height == 0 {
        return None;
    }
    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if rgba.len() < expected {
        return None;
    }
    let bytes = glib::Bytes::from_owned(rgba);
    let texture = gdk::MemoryTexture::new(
        width as i32,
        height as i32,
        gdk::MemoryFormat::R8g8b8a8,
        &bytes,
        (width * 4) as usize,
    );
    Some(texture.upcast())
}

/// Set the worker count used when the loader is first touched.
pub fn configure_loader_threads(threads: usize) {
    LOADER_THREADS.store(threads.max(1), Ordering::Relaxed);
}

/// Called on the main loop with the decoded texture, or `None` on failure.
pub type LoadCallback = Box<dyn FnOnce(Option<Texture>)>;

struct DecodeRequest {
    path: PathBuf,
}

struct DecodeResult {
    path: PathBuf,
    image: Option<DecodedImage>,
}

struct LoaderState {
    pending_paths: HashSet<PathBuf>,
    waiters: HashMap<PathBuf, Vec<LoadCallback>>,
    cache: lru::LruCache<PathBuf, Texture>,
}

struct TileImageLoader {
    request_tx: flume::Sender<DecodeRequest>,
    result_rx: flume::Receiver<DecodeResult>,
    state: RefCell<LoaderState>,
}

thread_local! {
    static TILE_IMAGE_LOADER: Rc<TileImageLoader> = TileImageLoader::new();
}

impl TileImageLoader {
    fn new() -> Rc<Self> {
        let (request_tx, request_rx) = flume::bounded::<DecodeRequest>(TILE_LOADER_QUEUE);
        let (result_tx, result_rx) = flume::unbounded::<DecodeResult>();

        let threads = LOADER_THREADS.load(Ordering::Relaxed);
        for _ in 0..threads {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            std::thread::spawn(move || {
                while let Ok(req) = rx.recv() {
                    let image = match image_loader::decode_rgba(&req.path, Some(TILE_PREVIEW_SIZE))
                    {
                        Ok(image) => Some(image),
                        Err(err) => {
                            tracing::warn!(error = %err, "Tile image failed to load");
                            None
                        }
                    };
                    let _ = tx.send(DecodeResult {
                        path: req.path,
                        image,
                    });
                }
            });
        }

        let capacity = NonZeroUsize::new(TILE_CACHE_ENTRIES).unwrap_or(NonZeroUsize::MIN);
        let loader = Rc::new(Self {
            request_tx,
            result_rx,
            state: RefCell::new(LoaderState {
                pending_paths: HashSet::new(),
                waiters: HashMap::new(),
                cache: lru::LruCache::new(capacity),
            }),
        });

        let loader_weak = Rc::downgrade(&loader);
        glib::timeout_add_local(Duration::from_millis(RESULT_POLL_INTERVAL_MS), move || {
            if let Some(loader) = loader_weak.upgrade() {
                loader.process_results();
                glib::ControlFlow::Continue
            } else {
                glib::ControlFlow::Break
            }
        });

        loader
    }

    fn request(&self, path: &Path, callback: LoadCallback) {
        let mut state = self.state.borrow_mut();

        if let Some(texture) = state.cache.get(path).cloned() {
            glib::idle_add_local_once(move || callback(Some(texture)));
            return;
        }

        state
            .waiters
            .entry(path.to_path_buf())
            .or_default()
            .push(callback);

        if state.pending_paths.insert(path.to_path_buf())
            && self
                .request_tx
                .try_send(DecodeRequest {
                    path: path.to_path_buf(),
                })
                .is_err()
        {
            tracing::warn!(path = %path.display(), "Tile decode queue full");
            state.pending_paths.remove(path);
            let waiters = state.waiters.remove(path).unwrap_or_default();
            drop(state);
            for waiter in waiters {
                waiter(None);
            }
        }
    }

    fn process_results(&self) {
        while let Ok(result) = self.result_rx.try_recv() {
            let texture = result.image.and_then(create_texture_from_rgba);

            let waiters = {
                let mut state = self.state.borrow_mut();
                state.pending_paths.remove(&result.path);
                if let Some(ref texture) = texture {
                    state.cache.put(result.path.clone(), texture.clone());
                }
                state.waiters.remove(&result.path).unwrap_or_default()
            };

            for waiter in waiters {
                waiter(texture.clone());
            }
        }
    }
}

/// Decode `path` for a grid tile. The callback runs on the main loop.
pub fn request_tile_image<F>(path: &Path, callback: F)
where
    F: FnOnce(Option<Texture>) + 'static,
{
    TILE_IMAGE_LOADER.with(|loader| loader.request(path, Box::new(callback)));
}
