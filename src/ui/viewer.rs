// Lightbox viewer for the gallery
// Features:
// - Full-window overlay on top of the grid, dismissed by close button,
//   Escape or a click on the backdrop
// - Looping prev/next navigation by buttons, arrow keys or horizontal swipe
//   (buttons hidden for single-item catalogs)
// - Images decode on a single background worker and fall back to a
//   placeholder
// - Videos play inline, muted, looping, with controls; playback stops when
//   the viewer closes or moves to another item

use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, ContentFit, EventSequenceState, GestureClick, GestureDrag,
    Label, MediaFile, MediaStream, Orientation, Overlay, PickFlags, Picture, Range, Stack,
    StackTransitionType, Video, Widget,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::keybindings::{command_for_swipe, ViewerKeybindings};
use super::media_loader::{create_texture_from_rgba, placeholder_texture};
use crate::image_loader::{self, DecodedImage};
use crate::models::{
    MediaDescriptor, MediaKind, RenderSpec, Transition, VideoSurface, ViewerCommand,
    ViewerSession,
};

/// Longest side for images decoded for the viewer.
const VIEWER_DECODE_SIZE: u32 = 2048;
/// Fade between items while navigating.
const SLIDE_TRANSITION_MS: u32 = 300;
/// Space around the media that counts as backdrop.
const BACKDROP_MARGIN: i32 = 56;
/// Backdrop clicks this soon after opening are the tail of the click that
/// opened the viewer.
const OPEN_GRACE: Duration = Duration::from_millis(400);

fn backdrop_dismiss_allowed(since_open: Duration) -> bool {
    since_open >= OPEN_GRACE
}

/// Load generation shared with the decode worker. Every new item (and every
/// close) advances it; work tagged with an older value is dropped.
#[derive(Debug, Clone, Default)]
struct LoadGeneration(Arc<AtomicU64>);

impl LoadGeneration {
    fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::Acquire) == generation
    }
}

struct DecodeRequest {
    generation: u64,
    path: PathBuf,
}

/// Decode loop for the viewer's single worker thread. Queued requests are
/// coalesced to the newest one, and the generation is checked before and
/// after decoding. Returns once the request channel closes or `send` fails.
fn run_decode_worker<D, S>(
    requests: flume::Receiver<DecodeRequest>,
    generation: LoadGeneration,
    decode: D,
    send: S,
) where
    D: Fn(&Path) -> Option<DecodedImage>,
    S: Fn(u64, Option<DecodedImage>) -> bool,
{
    while let Ok(mut req) = requests.recv() {
        while let Ok(next) = requests.try_recv() {
            req = next;
        }
        if !generation.is_current(req.generation) {
            continue;
        }
        let result = decode(&req.path);
        if !generation.is_current(req.generation) {
            continue;
        }
        if !send(req.generation, result) {
            break;
        }
    }
}

fn decode_for_viewer(path: &Path) -> Option<DecodedImage> {
    match image_loader::decode_rgba(path, Some(VIEWER_DECODE_SIZE)) {
        Ok(image) => Some(image),
        Err(err) => {
            tracing::warn!(error = %err, "Viewer image failed to load");
            None
        }
    }
}

/// Transport controls and buttons keep their own drags.
fn is_playback_control(widget: &Widget) -> bool {
    widget.ancestor(Range::static_type()).is_some()
        || widget.ancestor(Button::static_type()).is_some()
}

/// Text under the active item, e.g. `3 / 10  ·  3.jpeg`.
fn caption_text(index: usize, len: usize, source: &str) -> String {
    let name = MediaDescriptor::new(source).file_name().to_string();
    format!("{} / {}  ·  {}", index + 1, len, name)
}

// GObject subclass for LightboxViewer
mod imp {
    use super::*;

    #[derive(Default)]
    pub struct LightboxViewerInner {
        pub overlay: RefCell<Option<Overlay>>,
        pub backdrop: RefCell<Option<GtkBox>>,
        pub content_stack: RefCell<Option<Stack>>,
        pub picture: RefCell<Option<Picture>>,
        pub video_area: RefCell<Option<Video>>,
        pub video_stream: RefCell<Option<MediaFile>>,
        pub nav_controls: RefCell<Option<GtkBox>>,
        pub caption: RefCell<Option<Label>>,
        // Catalog sources in display order
        pub images: RefCell<Vec<String>>,
        pub session: RefCell<ViewerSession>,
        pub keybindings: ViewerKeybindings,
        // Widget the key listener is attached to while open
        pub key_target: RefCell<Option<Widget>>,
        pub on_open_change: RefCell<Option<Rc<dyn Fn(bool)>>>,
        // Loading generation counter (to ignore stale results)
        pub(super) load_generation: LoadGeneration,
        pub(super) decode_request_tx: RefCell<Option<flume::Sender<DecodeRequest>>>,
        // Whether a failed image shows the placeholder
        pub placeholder_on_error: Cell<bool>,
        pub opened_at: Cell<Option<Instant>>,
        // Set when a drag starts on a control, so it never swipes
        pub swipe_blocked: Cell<bool>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for LightboxViewerInner {
        const NAME: &'static str = "KeepsakeLightboxViewer";
        type Type = super::LightboxViewer;
        type ParentType = glib::Object;
    }

    impl ObjectImpl for LightboxViewerInner {}
}

glib::wrapper! {
    pub struct LightboxViewer(ObjectSubclass<imp::LightboxViewerInner>);
}

impl LightboxViewer {
    pub fn new() -> Self {
        let obj: Self = glib::Object::builder().build();
        obj.setup_channels();
        obj.setup_widgets();
        obj.setup_keybindings();
        obj
    }

    /// Set up the decode worker and the async channel its results come
    /// back on
    fn setup_channels(&self) {
        let imp = self.imp();
        let (sender, receiver) = async_channel::unbounded::<(u64, Option<DecodedImage>)>();

        let (request_tx, request_rx) = flume::unbounded::<DecodeRequest>();
        *imp.decode_request_tx.borrow_mut() = Some(request_tx);
        let generation = imp.load_generation.clone();
        std::thread::spawn(move || {
            run_decode_worker(request_rx, generation, decode_for_viewer, |generation, result| {
                sender.send_blocking((generation, result)).is_ok()
            });
        });

        let viewer_weak = self.downgrade();
        glib::spawn_future_local(async move {
            while let Ok((generation, result)) = receiver.recv().await {
                if let Some(viewer) = viewer_weak.upgrade() {
                    viewer.handle_load_result(generation, result);
                } else {
                    break;
                }
            }
        });
    }

    fn setup_widgets(&self) {
        let imp = self.imp();

        let overlay = Overlay::new();
        overlay.set_hexpand(true);
        overlay.set_vexpand(true);
        overlay.add_css_class("lightbox");
        overlay.set_visible(false);
        overlay.set_focusable(true);

        let backdrop = GtkBox::new(Orientation::Vertical, 0);
        backdrop.set_hexpand(true);
        backdrop.set_vexpand(true);
        backdrop.add_css_class("lightbox-backdrop");

        let content_stack = Stack::new();
        content_stack.set_hexpand(true);
        content_stack.set_vexpand(true);
        content_stack.set_margin_top(BACKDROP_MARGIN);
        content_stack.set_margin_bottom(BACKDROP_MARGIN);
        content_stack.set_margin_start(BACKDROP_MARGIN);
        content_stack.set_margin_end(BACKDROP_MARGIN);
        content_stack.set_hhomogeneous(false);
        content_stack.set_vhomogeneous(false);
        content_stack.set_transition_type(StackTransitionType::Crossfade);
        content_stack.set_transition_duration(SLIDE_TRANSITION_MS);

        let picture = Picture::new();
        picture.set_can_shrink(true);
        picture.set_content_fit(ContentFit::Contain);
        picture.add_css_class("lightbox-media");

        let video_area = Video::new();
        video_area.set_autoplay(true);
        video_area.set_loop(true);
        video_area.set_hexpand(true);
        video_area.set_vexpand(true);
        video_area.set_halign(Align::Fill);
        video_area.set_valign(Align::Fill);
        video_area.add_css_class("lightbox-media");

        content_stack.add_named(&picture, Some("image"));
        content_stack.add_named(&video_area, Some("video"));
        content_stack.set_visible_child_name("image");

        // Controls bar at top
        let controls = GtkBox::new(Orientation::Horizontal, 8);
        controls.set_halign(Align::Fill);
        controls.set_valign(Align::Start);
        controls.add_css_class("lightbox-controls");
        controls.set_margin_start(16);
        controls.set_margin_end(16);
        controls.set_margin_top(12);

        let close_btn = Button::with_label("Close");
        close_btn.add_css_class("glass-button");
        close_btn.set_tooltip_text(Some("Close viewer (Escape)"));

        let spacer = GtkBox::new(Orientation::Horizontal, 0);
        spacer.set_hexpand(true);

        let prev_btn = Button::with_label("Prev");
        prev_btn.add_css_class("glass-button");
        prev_btn.set_tooltip_text(Some("Previous (Left)"));

        let next_btn = Button::with_label("Next");
        next_btn.add_css_class("glass-button");
        next_btn.set_tooltip_text(Some("Next (Right)"));

        let nav_controls = GtkBox::new(Orientation::Horizontal, 8);
        nav_controls.append(&prev_btn);
        nav_controls.append(&next_btn);

        controls.append(&close_btn);
        controls.append(&spacer);
        controls.append(&nav_controls);

        let caption = Label::new(None);
        caption.set_halign(Align::Center);
        caption.set_valign(Align::End);
        caption.set_margin_bottom(16);
        caption.add_css_class("lightbox-caption");
        caption.set_ellipsize(gtk4::pango::EllipsizeMode::Middle);

        overlay.set_child(Some(&backdrop));
        overlay.add_overlay(&content_stack);
        overlay.add_overlay(&controls);
        overlay.add_overlay(&caption);

        *imp.overlay.borrow_mut() = Some(overlay.clone());
        *imp.backdrop.borrow_mut() = Some(backdrop.clone());
        *imp.content_stack.borrow_mut() = Some(content_stack);
        *imp.picture.borrow_mut() = Some(picture);
        *imp.video_area.borrow_mut() = Some(video_area);
        *imp.nav_controls.borrow_mut() = Some(nav_controls);
        *imp.caption.borrow_mut() = Some(caption);

        let viewer_weak = self.downgrade();
        close_btn.connect_clicked(move |_| {
            if let Some(viewer) = viewer_weak.upgrade() {
                viewer.dispatch(ViewerCommand::Close);
            }
        });

        let viewer_weak = self.downgrade();
        prev_btn.connect_clicked(move |_| {
            if let Some(viewer) = viewer_weak.upgrade() {
                viewer.dispatch(ViewerCommand::Prev);
            }
        });

        let viewer_weak = self.downgrade();
        next_btn.connect_clicked(move |_| {
            if let Some(viewer) = viewer_weak.upgrade() {
                viewer.dispatch(ViewerCommand::Next);
            }
        });

        // Clicks that land on the backdrop itself dismiss the viewer.
        let backdrop_click = GestureClick::new();
        backdrop_click.set_button(1);
        let viewer_weak = self.downgrade();
        backdrop_click.connect_released(move |_, _n, x, y| {
            let Some(viewer) = viewer_weak.upgrade() else {
                return;
            };
            let imp = viewer.imp();
            let settled = imp
                .opened_at
                .get()
                .is_some_and(|opened| backdrop_dismiss_allowed(opened.elapsed()));
            if !settled {
                return;
            }
            let overlay = imp.overlay.borrow().clone();
            let backdrop = imp.backdrop.borrow().clone();
            if let (Some(overlay), Some(backdrop)) = (overlay, backdrop) {
                let picked = overlay.pick(x, y, PickFlags::DEFAULT);
                if picked.as_ref() == Some(backdrop.upcast_ref::<Widget>()) {
                    viewer.dispatch(ViewerCommand::Close);
                }
            }
        });
        overlay.add_controller(backdrop_click);

        // Horizontal swipe changes items
        let swipe = GestureDrag::new();
        swipe.set_button(1);

        let viewer_weak = self.downgrade();
        swipe.connect_drag_begin(move |gesture, x, y| {
            let Some(viewer) = viewer_weak.upgrade() else {
                return;
            };
            let imp = viewer.imp();
            let on_control = imp
                .overlay
                .borrow()
                .as_ref()
                .and_then(|overlay| overlay.pick(x, y, PickFlags::DEFAULT))
                .is_some_and(|picked| is_playback_control(&picked));
            imp.swipe_blocked.set(on_control);
            if on_control {
                gesture.set_state(EventSequenceState::Denied);
            }
        });

        let viewer_weak = self.downgrade();
        swipe.connect_drag_end(move |_, offset_x, offset_y| {
            let Some(viewer) = viewer_weak.upgrade() else {
                return;
            };
            if viewer.imp().swipe_blocked.replace(false) {
                return;
            }
            if let Some(command) = command_for_swipe(offset_x, offset_y) {
                viewer.dispatch(command);
            }
        });
        overlay.add_controller(swipe);
    }

    fn setup_keybindings(&self) {
        let viewer_weak = self.downgrade();
        self.imp().keybindings.connect_command(move |command| {
            if let Some(viewer) = viewer_weak.upgrade() {
                viewer.dispatch(command);
            }
        });
    }

    /// Get the widget to add to the UI
    pub fn widget(&self) -> Option<Widget> {
        self.imp()
            .overlay
            .borrow()
            .as_ref()
            .map(|overlay| overlay.clone().upcast())
    }

    /// Widget that receives key events while the viewer is open.
    pub fn set_key_target(&self, target: &impl IsA<Widget>) {
        *self.imp().key_target.borrow_mut() = Some(target.as_ref().clone());
    }

    /// Replace the item list. Ignored while a session is open so indices stay
    /// stable.
    pub fn set_images(&self, images: Vec<String>) {
        let imp = self.imp();
        if !imp.session.borrow_mut().set_len(images.len()) {
            tracing::warn!("Ignoring item list change while the viewer is open");
            return;
        }
        *imp.images.borrow_mut() = images;
        self.update_nav_visibility();
    }

    /// Controlled open state. `open == true` starts a session at
    /// `start_index`, or repositions an open one.
    pub fn set_open(&self, open: bool, start_index: usize) {
        if open {
            self.open_at(start_index);
        } else {
            self.close_session(false);
        }
    }

    /// Called whenever the viewer asks to change its open state.
    pub fn connect_open_change<F: Fn(bool) + 'static>(&self, callback: F) {
        *self.imp().on_open_change.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn is_open(&self) -> bool {
        self.imp().session.borrow().is_open()
    }

    fn open_at(&self, start_index: usize) {
        let imp = self.imp();
        let was_open = imp.session.borrow().is_open();
        let opened = imp.session.borrow_mut().open(start_index);
        if !opened {
            tracing::debug!("Nothing to show, viewer stays closed");
            return;
        }
        let Some(current) = imp.session.borrow().current_index() else {
            return;
        };

        tracing::info!(index = current, "Opening viewer");
        // Reposition before the viewer becomes interactive.
        self.show_item(current, false);
        self.update_nav_visibility();

        if let Some(overlay) = imp.overlay.borrow().as_ref() {
            overlay.set_visible(true);
            overlay.grab_focus();
        }

        if !was_open {
            imp.opened_at.set(Some(Instant::now()));
            if let Some(target) = imp.key_target.borrow().as_ref() {
                imp.keybindings.attach(target);
            }
            self.emit_open_change(true);
        }
    }

    /// Apply a command from the controls, the keyboard or a swipe.
    pub fn dispatch(&self, command: ViewerCommand) {
        let transition = self.imp().session.borrow_mut().apply(command);
        match transition {
            Transition::Moved(index) => {
                tracing::debug!(index, ?command, "Viewer navigated");
                self.show_item(index, true);
            }
            Transition::Closed => self.teardown(true),
            Transition::None => {}
        }
    }

    fn close_session(&self, notify: bool) {
        let transition = self.imp().session.borrow_mut().close();
        if transition == Transition::Closed {
            self.teardown(notify);
        }
    }

    fn teardown(&self, notify: bool) {
        let imp = self.imp();
        tracing::info!("Closing viewer");

        // Invalidate pending loads
        imp.load_generation.advance();
        imp.opened_at.set(None);

        self.stop_video();
        imp.keybindings.detach();

        if let Some(picture) = imp.picture.borrow().as_ref() {
            picture.set_paintable(Option::<&gdk4::Paintable>::None);
        }
        if let Some(overlay) = imp.overlay.borrow().as_ref() {
            overlay.set_visible(false);
        }

        if notify {
            self.emit_open_change(false);
        }
    }

    fn emit_open_change(&self, open: bool) {
        let callback = self.imp().on_open_change.borrow().clone();
        if let Some(callback) = callback {
            callback(open);
        }
    }

    fn update_nav_visibility(&self) {
        let imp = self.imp();
        let loops = imp.session.borrow().loops();
        if let Some(nav) = imp.nav_controls.borrow().as_ref() {
            nav.set_visible(loops);
        }
    }

    fn show_item(&self, index: usize, animate: bool) {
        let imp = self.imp();
        let Some(source) = imp.images.borrow().get(index).cloned() else {
            return;
        };
        let len = imp.images.borrow().len();

        let generation = imp.load_generation.advance();

        self.stop_video();

        if let Some(stack) = imp.content_stack.borrow().as_ref() {
            stack.set_transition_type(if animate {
                StackTransitionType::Crossfade
            } else {
                StackTransitionType::None
            });
        }
        if let Some(caption) = imp.caption.borrow().as_ref() {
            caption.set_text(&caption_text(index, len, &source));
        }

        match MediaKind::infer(&source).render_spec() {
            RenderSpec::Image {
                placeholder_on_error,
            } => {
                imp.placeholder_on_error.set(placeholder_on_error);
                self.show_image(&source, generation);
            }
            RenderSpec::Video(spec) => {
                let media = MediaFile::for_filename(&source);
                media.set_muted(spec.muted);
                media.set_loop(spec.looping);

                let viewer_weak = self.downgrade();
                media.connect_notify_local(Some("error"), move |stream, _| {
                    let Some(err) = stream.error() else {
                        return;
                    };
                    let Some(viewer) = viewer_weak.upgrade() else {
                        return;
                    };
                    if !viewer.imp().load_generation.is_current(generation) {
                        tracing::debug!(error = %err, "Ignoring error from a previous video");
                        return;
                    }
                    tracing::warn!(error = %err, "Video failed to load, showing placeholder");
                    viewer.show_placeholder();
                });

                let page = match spec.surface() {
                    VideoSurface::WithControls => {
                        if let Some(video) = imp.video_area.borrow().as_ref() {
                            video.set_autoplay(spec.autoplay);
                            video.set_loop(spec.looping);
                            video.set_media_stream(Some(&media));
                        }
                        "video"
                    }
                    VideoSurface::Bare => {
                        if let Some(picture) = imp.picture.borrow().as_ref() {
                            picture.set_paintable(Some(&media));
                        }
                        "image"
                    }
                };
                if spec.autoplay {
                    media.play();
                }
                *imp.video_stream.borrow_mut() = Some(media);

                if let Some(stack) = imp.content_stack.borrow().as_ref() {
                    stack.set_visible_child_name(page);
                }
            }
        }
    }

    fn show_image(&self, source: &str, generation: u64) {
        let imp = self.imp();
        if let Some(picture) = imp.picture.borrow().as_ref() {
            picture.set_paintable(Option::<&gdk4::Paintable>::None);
        }
        if let Some(stack) = imp.content_stack.borrow().as_ref() {
            stack.set_visible_child_name("image");
        }

        if let Some(tx) = imp.decode_request_tx.borrow().as_ref() {
            let _ = tx.send(DecodeRequest {
                generation,
                path: PathBuf::from(source),
            });
        }
    }

    fn handle_load_result(&self, generation: u64, result: Option<DecodedImage>) {
        let imp = self.imp();
        if !imp.load_generation.is_current(generation) || !imp.session.borrow().is_open() {
            return;
        }
        match result.and_then(create_texture_from_rgba) {
            Some(texture) => {
                if let Some(picture) = imp.picture.borrow().as_ref() {
                    picture.set_paintable(Some(&texture));
                }
            }
            None if imp.placeholder_on_error.get() => self.show_placeholder(),
            None => {}
        }
    }

    fn show_placeholder(&self) {
        let imp = self.imp();
        self.stop_video();
        if let Some(picture) = imp.picture.borrow().as_ref() {
            picture.set_paintable(Some(&placeholder_texture()));
        }
        if let Some(stack) = imp.content_stack.borrow().as_ref() {
            stack.set_visible_child_name("image");
        }
    }

    /// Stop and drop the active stream so nothing keeps playing in the
    /// background.
    fn stop_video(&self) {
        let imp = self.imp();
        if let Some(stream) = imp.video_stream.borrow_mut().take() {
            stream.pause();
            stream.clear();
        }
        if let Some(video) = imp.video_area.borrow().as_ref() {
            video.set_media_stream(Option::<&MediaStream>::None);
        }
    }
}

impl Default for LightboxViewer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::keybindings::command_for_key;
    use gdk4::Key;

    #[test]
    fn test_caption_text() {
        assert_eq!(caption_text(2, 3, "/media/video/1.mp4"), "3 / 3  ·  1.mp4");
        assert_eq!(caption_text(0, 1, "a.jpeg"), "1 / 1  ·  a.jpeg");
    }

    #[test]
    fn test_backdrop_ignores_clicks_right_after_open() {
        assert!(!backdrop_dismiss_allowed(Duration::ZERO));
        assert!(!backdrop_dismiss_allowed(Duration::from_millis(150)));
        assert!(backdrop_dismiss_allowed(OPEN_GRACE));
        assert!(backdrop_dismiss_allowed(Duration::from_secs(2)));
    }

    #[test]
    fn test_generation_advance_invalidates_previous() {
        let generation = LoadGeneration::default();
        let first = generation.advance();
        assert!(generation.is_current(first));

        let shared = generation.clone();
        let second = shared.advance();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn test_worker_decodes_only_newest_request() {
        let generation = LoadGeneration::default();
        let (tx, rx) = flume::unbounded();
        for name in ["a.jpeg", "b.jpeg", "c.jpeg"] {
            let current = generation.advance();
            tx.send(DecodeRequest {
                generation: current,
                path: PathBuf::from(name),
            })
            .unwrap();
        }
        drop(tx);

        let decoded = RefCell::new(Vec::new());
        let sent = RefCell::new(Vec::new());
        run_decode_worker(
            rx,
            generation.clone(),
            |path| {
                decoded.borrow_mut().push(path.to_path_buf());
                None
            },
            |g, _| {
                sent.borrow_mut().push(g);
                true
            },
        );

        assert_eq!(decoded.into_inner(), vec![PathBuf::from("c.jpeg")]);
        assert_eq!(sent.into_inner(), vec![3]);
    }

    #[test]
    fn test_worker_drops_result_superseded_while_decoding() {
        let generation = LoadGeneration::default();
        let (tx, rx) = flume::unbounded();
        tx.send(DecodeRequest {
            generation: generation.advance(),
            path: PathBuf::from("slow.jpeg"),
        })
        .unwrap();
        drop(tx);

        let sent = Cell::new(0);
        let racing = generation.clone();
        run_decode_worker(
            rx,
            generation,
            |_| {
                racing.advance();
                None
            },
            |_, _| {
                sent.set(sent.get() + 1);
                true
            },
        );
        assert_eq!(sent.get(), 0);
    }

    #[test]
    fn test_escape_closes_exactly_once() {
        let mut session = ViewerSession::new(3);
        let escape = command_for_key(Key::Escape).unwrap();

        // Closed: no effect.
        assert_eq!(session.apply(escape), Transition::None);

        session.open(1);
        assert_eq!(session.apply(escape), Transition::Closed);
        assert_eq!(session.apply(escape), Transition::None);
    }

    #[test]
    fn test_arrow_right_wraps_to_first_image() {
        let sources = ["a.jpeg", "b.jpeg", "c.mp4"];
        let mut session = ViewerSession::new(sources.len());
        session.open(2);
        let next = command_for_key(Key::Right).unwrap();
        assert_eq!(session.apply(next), Transition::Moved(0));
        assert!(matches!(
            MediaKind::infer(sources[0]).render_spec(),
            RenderSpec::Image { .. }
        ));
    }
}
