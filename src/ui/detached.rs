// Detached ("picture-in-picture") presentation for video tiles
//
// There is exactly one detached slot per process. A request releases the
// current holder first and then tries to acquire; every failure is logged and
// leaves the requesting tile untouched.

use gtk4::prelude::*;
use gtk4::{gdk, ApplicationWindow, ContentFit, MediaStream, Picture, Window};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::DetachError;

const DETACHED_WIDTH: i32 = 480;
const DETACHED_HEIGHT: i32 = 270;
const DETACHED_MIN_WIDTH: i32 = 320;
const DETACHED_MIN_HEIGHT: i32 = 180;

/// Floating window size for a gallery of `parent_width` x `parent_height`:
/// a quarter of its width at 16:9, never below the minimum. Unknown (zero
/// or negative) sizes give the default.
fn floating_window_size(parent_width: i32, parent_height: i32) -> (i32, i32) {
    if parent_width <= 0 || parent_height <= 0 {
        return (DETACHED_WIDTH, DETACHED_HEIGHT);
    }
    let width = (parent_width / 4).max(DETACHED_MIN_WIDTH);
    let height = (width * 9 / 16).max(DETACHED_MIN_HEIGHT);
    (width, height)
}

/// Environment side of the detached slot.
pub trait DetachedHost {
    type Surface: ?Sized;

    /// Capability check; `false` means requests are rejected up front.
    fn is_supported(&self) -> bool;

    /// Tile index currently holding the slot.
    fn holder(&self) -> Option<usize>;

    fn release(&self) -> Result<(), DetachError>;

    fn acquire(&self, holder: usize, surface: &Self::Surface) -> Result<(), DetachError>;
}

/// Request detached presentation for tile `holder`.
///
/// Never panics and never propagates: rejections are logged and reported as
/// `false` so the caller can ignore them.
pub fn request_detached<H: DetachedHost>(host: &H, holder: usize, surface: &H::Surface) -> bool {
    match try_request(host, holder, surface) {
        Ok(()) => {
            tracing::info!(tile = holder, "Detached presentation started");
            true
        }
        Err(err) => {
            tracing::warn!(tile = holder, error = %err, "Detached presentation request failed");
            false
        }
    }
}

fn try_request<H: DetachedHost>(
    host: &H,
    holder: usize,
    surface: &H::Surface,
) -> Result<(), DetachError> {
    if !host.is_supported() {
        return Err(DetachError::Unsupported);
    }
    if host.holder().is_some() {
        host.release()?;
    }
    host.acquire(holder, surface)
}

/// The real slot: a small floating window showing the tile's stream.
pub struct FloatingWindowHost {
    enabled: Cell<bool>,
    parent: RefCell<Option<ApplicationWindow>>,
    window: RefCell<Option<Window>>,
    holder: Rc<Cell<Option<usize>>>,
}

thread_local! {
    static FLOATING_HOST: Rc<FloatingWindowHost> = Rc::new(FloatingWindowHost::new());
}

/// Process-wide detached slot.
pub fn floating_host() -> Rc<FloatingWindowHost> {
    FLOATING_HOST.with(Rc::clone)
}

impl FloatingWindowHost {
    fn new() -> Self {
        Self {
            enabled: Cell::new(true),
            parent: RefCell::new(None),
            window: RefCell::new(None),
            holder: Rc::new(Cell::new(None)),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
        if !enabled {
            let _ = self.release();
        }
    }

    /// Gallery window the floating window stays on top of and shares an
    /// application with.
    pub fn set_parent(&self, parent: &ApplicationWindow) {
        *self.parent.borrow_mut() = Some(parent.clone());
    }

    fn ensure_window(&self) -> Window {
        if let Some(window) = self.window.borrow().as_ref() {
            return window.clone();
        }

        let parent = self.parent.borrow().clone();
        let (width, height) = parent
            .as_ref()
            .map(|parent| floating_window_size(parent.width(), parent.height()))
            .unwrap_or((DETACHED_WIDTH, DETACHED_HEIGHT));

        let window = Window::builder()
            .title("Picture in Picture")
            .default_width(width)
            .default_height(height)
            .resizable(true)
            .build();
        window.add_css_class("detached-window");
        if let Some(parent) = parent.as_ref() {
            window.set_transient_for(Some(parent));
            window.set_destroy_with_parent(true);
            window.set_application(parent.application().as_ref());
        }
        window.set_hide_on_close(true);

        // Closing the window by hand frees the slot.
        let holder = self.holder.clone();
        window.connect_close_request(move |window| {
            holder.set(None);
            window.set_child(Option::<&gtk4::Widget>::None);
            glib::Propagation::Proceed
        });

        *self.window.borrow_mut() = Some(window.clone());
        window
    }
}

impl DetachedHost for FloatingWindowHost {
    type Surface = MediaStream;

    fn is_supported(&self) -> bool {
        self.enabled.get() && gdk::Display::default().is_some()
    }

    fn holder(&self) -> Option<usize> {
        self.holder.get()
    }

    fn release(&self) -> Result<(), DetachError> {
        if let Some(window) = self.window.borrow().as_ref() {
            window.set_child(Option::<&gtk4::Widget>::None);
            window.set_visible(false);
        }
        if let Some(previous) = self.holder.take() {
            tracing::debug!(tile = previous, "Released detached presentation");
        }
        Ok(())
    }

    fn acquire(&self, holder: usize, surface: &MediaStream) -> Result<(), DetachError> {
        if let Some(err) = surface.error() {
            tracing::debug!(tile = holder, error = %err, "Stream error before detaching");
            return Err(DetachError::StreamUnavailable(holder));
        }

        let window = self.ensure_window();
        let picture = Picture::for_paintable(surface);
        picture.set_content_fit(ContentFit::Contain);
        picture.set_can_shrink(true);
        window.set_child(Some(&picture));
        window.present();

        if !window.is_visible() {
            window.set_child(Option::<&gtk4::Widget>::None);
            return Err(DetachError::HostUnavailable(
                "floating window could not be shown".to_string(),
            ));
        }

        self.holder.set(Some(holder));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeHost {
        unsupported: bool,
        fail_acquire: bool,
        holder: Cell<Option<usize>>,
        releases: Cell<usize>,
        acquires: Cell<usize>,
    }

    impl DetachedHost for FakeHost {
        type Surface = ();

        fn is_supported(&self) -> bool {
            !self.unsupported
        }

        fn holder(&self) -> Option<usize> {
            self.holder.get()
        }

        fn release(&self) -> Result<(), DetachError> {
            self.releases.set(self.releases.get() + 1);
            self.holder.set(None);
            Ok(())
        }

        fn acquire(&self, holder: usize, _surface: &()) -> Result<(), DetachError> {
            self.acquires.set(self.acquires.get() + 1);
            if self.fail_acquire {
                return Err(DetachError::StreamUnavailable(holder));
            }
            if self.holder.get().is_some() {
                return Err(DetachError::HostUnavailable("slot busy".to_string()));
            }
            self.holder.set(Some(holder));
            Ok(())
        }
    }

    #[test]
    fn test_acquire_free_slot() {
        let host = FakeHost::default();
        assert!(request_detached(&host, 3, &()));
        assert_eq!(host.holder(), Some(3));
        assert_eq!(host.releases.get(), 0);
    }

    #[test]
    fn test_existing_holder_released_first() {
        let host = FakeHost::default();
        assert!(request_detached(&host, 1, &()));
        assert!(request_detached(&host, 4, &()));
        assert_eq!(host.holder(), Some(4));
        assert_eq!(host.releases.get(), 1);
    }

    #[test]
    fn test_unsupported_is_rejected_without_touching_slot() {
        let host = FakeHost {
            unsupported: true,
            ..FakeHost::default()
        };
        assert!(!request_detached(&host, 2, &()));
        assert_eq!(host.acquires.get(), 0);
        assert_eq!(host.holder(), None);
    }

    #[test]
    fn test_failed_acquire_is_swallowed() {
        let host = FakeHost {
            fail_acquire: true,
            ..FakeHost::default()
        };
        assert!(!request_detached(&host, 2, &()));
        assert_eq!(host.holder(), None);
        assert_eq!(
            try_request(&host, 2, &()),
            Err(DetachError::StreamUnavailable(2))
        );
    }

    #[test]
    fn test_floating_window_follows_parent_size() {
        assert_eq!(floating_window_size(1920, 1080), (480, 270));
        assert_eq!(floating_window_size(2560, 1440), (640, 360));
    }

    #[test]
    fn test_floating_window_size_floor_and_default() {
        assert_eq!(floating_window_size(800, 600), (320, 180));
        assert_eq!(floating_window_size(0, 0), (480, 270));
        assert_eq!(floating_window_size(-1, 600), (480, 270));
    }

    #[test]
    fn test_same_holder_reacquires() {
        let host = FakeHost::default();
        assert!(request_detached(&host, 5, &()));
        assert!(request_detached(&host, 5, &()));
        assert_eq!(host.holder(), Some(5));
        assert_eq!(host.acquires.get(), 2);
    }
}
