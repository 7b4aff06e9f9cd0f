// Responsive tile grid for the gallery
// Each tile fades in on a short stagger, tilts under the pointer and opens
// the viewer on click. Video tiles preview muted on loop and carry a
// detach control.

use gtk4::prelude::*;
use gtk4::{
    Align, Button, ContentFit, EventSequenceState, FlowBox, GestureClick, Label, MediaFile,
    MediaStream, Overlay, PickFlags, Picture, Revealer, RevealerTransitionType, SelectionMode,
    Video, Widget,
};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use super::detached::{floating_host, request_detached};
use super::media_loader::{placeholder_texture, request_tile_image};
use super::tilt::TiltFrame;
use crate::models::{
    Catalog, GridState, MediaDescriptor, MediaKind, PlaybackSpec, TileEvent, TileHit,
    VideoSurface,
};

const MIN_COLUMNS: u32 = 2;
const MAX_COLUMNS: u32 = 5;
const TILE_HEIGHT: i32 = 220;
const TILE_SPACING: u32 = 12;
const FADE_DURATION_MS: u32 = 350;
const STAGGER_STEP_MS: u64 = 30;
const STAGGER_GROUP: usize = 10;

/// Entrance delay for tile `index`; restarts every ten tiles so long grids
/// don't wait on the tail.
pub fn stagger_delay(index: usize) -> Duration {
    Duration::from_millis((index % STAGGER_GROUP) as u64 * STAGGER_STEP_MS)
}

/// Callback type for tile open requests
pub type OpenCallback = Box<dyn Fn(usize)>;

pub struct MediaGrid {
    flow_box: FlowBox,
    state: Rc<RefCell<GridState>>,
    on_open: Rc<RefCell<Option<OpenCallback>>>,
    detached_enabled: bool,
}

impl MediaGrid {
    pub fn new(detached_enabled: bool) -> Self {
        let flow_box = FlowBox::new();
        flow_box.set_homogeneous(true);
        flow_box.set_min_children_per_line(MIN_COLUMNS);
        flow_box.set_max_children_per_line(MAX_COLUMNS);
        flow_box.set_row_spacing(TILE_SPACING);
        flow_box.set_column_spacing(TILE_SPACING);
        flow_box.set_selection_mode(SelectionMode::None);
        flow_box.set_activate_on_single_click(false);
        flow_box.set_valign(Align::Start);
        flow_box.add_css_class("media-grid");

        let on_open: Rc<RefCell<Option<OpenCallback>>> = Rc::new(RefCell::new(None));

        // Keyboard activation (Enter on a focused tile). Pointer presses are
        // claimed by the tile gestures and never reach this.
        let on_open_clone = on_open.clone();
        flow_box.connect_child_activated(move |_, child| {
            let Ok(index) = usize::try_from(child.index()) else {
                return;
            };
            if let Some(ref callback) = *on_open_clone.borrow() {
                callback(index);
            }
        });

        Self {
            flow_box,
            state: Rc::new(RefCell::new(GridState::default())),
            on_open,
            detached_enabled,
        }
    }

    pub fn widget(&self) -> &FlowBox {
        &self.flow_box
    }

    /// Connect callback for tile clicks (receives the tile index)
    pub fn connect_open_requested<F>(&self, callback: F)
    where
        F: Fn(usize) + 'static,
    {
        *self.on_open.borrow_mut() = Some(Box::new(callback));
    }

    /// Rebuild the grid from `catalog`, in catalog order.
    pub fn set_catalog(&self, catalog: &Catalog) {
        self.flow_box.remove_all();
        *self.state.borrow_mut() = GridState::from_catalog(catalog);

        for (index, item) in catalog.iter().enumerate() {
            let tile = self.build_tile(index, item);
            self.flow_box.append(&tile);
        }
        tracing::debug!(tiles = catalog.len(), "Grid populated");
    }

    pub fn placeholder_count(&self) -> usize {
        self.state.borrow().placeholder_count()
    }

    fn build_tile(&self, index: usize, item: &MediaDescriptor) -> Revealer {
        let alt = MediaDescriptor::alt_text(index);

        let picture = Picture::new();
        picture.set_can_shrink(true);
        picture.set_content_fit(ContentFit::Cover);
        picture.set_size_request(-1, TILE_HEIGHT);
        picture.set_alternative_text(Some(&alt));
        picture.add_css_class("tile-media");

        let overlay = Overlay::new();
        overlay.set_child(Some(&picture));
        overlay.add_css_class("tile");
        overlay.set_tooltip_text(Some(&alt));
        overlay.set_overflow(gtk4::Overflow::Hidden);

        let mut detach_control: Option<Button> = None;

        match item.kind {
            MediaKind::Image => {
                picture.set_paintable(Some(&placeholder_texture()));
                self.load_image(index, &item.source, &picture);
            }
            MediaKind::Video => {
                let spec = PlaybackSpec::TILE_PREVIEW;
                overlay.add_css_class("video-tile");
                let media = MediaFile::for_filename(&item.source);
                media.set_muted(spec.muted);
                media.set_loop(spec.looping);
                self.watch_stream(index, &media, &picture);
                match spec.surface() {
                    VideoSurface::Bare => picture.set_paintable(Some(&media)),
                    VideoSurface::WithControls => {
                        let video = Video::for_media_stream(Some(&media));
                        video.set_size_request(-1, TILE_HEIGHT);
                        overlay.set_child(Some(&video));
                    }
                }
                if spec.autoplay {
                    media.play();
                }

                let badge = Label::new(Some("▶"));
                badge.set_halign(Align::Center);
                badge.set_valign(Align::Center);
                badge.set_can_target(false);
                badge.add_css_class("play-badge");
                overlay.add_overlay(&badge);

                if self.detached_enabled {
                    let button = self.detach_button(index, media.upcast_ref());
                    overlay.add_overlay(&button);
                    detach_control = Some(button);
                }
            }
        }

        self.connect_tile_click(index, &overlay, detach_control);

        let frame = TiltFrame::new(&overlay);

        let revealer = Revealer::new();
        revealer.set_transition_type(RevealerTransitionType::Crossfade);
        revealer.set_transition_duration(FADE_DURATION_MS);
        revealer.set_reveal_child(false);
        revealer.set_child(Some(&frame));

        let revealer_weak = revealer.downgrade();
        glib::timeout_add_local_once(stagger_delay(index), move || {
            if let Some(revealer) = revealer_weak.upgrade() {
                revealer.set_reveal_child(true);
            }
        });

        revealer
    }

    fn load_image(&self, index: usize, source: &str, picture: &Picture) {
        let picture_weak = picture.downgrade();
        let state = self.state.clone();
        request_tile_image(Path::new(source), move |texture| {
            let ok = texture.is_some();
            state.borrow_mut().finish_load(index, ok);
            let Some(picture) = picture_weak.upgrade() else {
                return;
            };
            match texture {
                Some(texture) => picture.set_paintable(Some(&texture)),
                None => picture.set_paintable(Some(&placeholder_texture())),
            }
        });
    }

    fn watch_stream(&self, index: usize, media: &MediaFile, picture: &Picture) {
        let state = self.state.clone();
        media.connect_notify_local(Some("prepared"), move |stream, _| {
            if stream.is_prepared() {
                state.borrow_mut().finish_load(index, true);
            }
        });

        let state = self.state.clone();
        let picture_weak = picture.downgrade();
        media.connect_notify_local(Some("error"), move |stream, _| {
            let Some(err) = stream.error() else {
                return;
            };
            tracing::warn!(tile = index, error = %err, "Tile video failed to load");
            state.borrow_mut().finish_load(index, false);
            if let Some(picture) = picture_weak.upgrade() {
                picture.set_paintable(Some(&placeholder_texture()));
            }
        });
    }

    fn detach_button(&self, index: usize, stream: &MediaStream) -> Button {
        let button = Button::with_label("PiP");
        button.set_halign(Align::End);
        button.set_valign(Align::Start);
        button.set_margin_top(8);
        button.set_margin_end(8);
        button.set_tooltip_text(Some("Picture in picture"));
        button.add_css_class("pip-button");

        let state = self.state.clone();
        let stream = stream.clone();
        button.connect_clicked(move |_| {
            let event = state.borrow().route_click(index, TileHit::DetachControl);
            if let Some(TileEvent::Detach(index)) = event {
                request_detached(&*floating_host(), index, &stream);
            }
        });
        button
    }

    fn connect_tile_click(&self, index: usize, overlay: &Overlay, detach_control: Option<Button>) {
        let click = GestureClick::new();
        click.set_button(1);

        // Keep surface presses away from the FlowBox so a double click
        // doesn't also fire child-activated.
        let overlay_weak = overlay.downgrade();
        let pressed_control = detach_control.clone();
        click.connect_pressed(move |gesture, _n_press, x, y| {
            let Some(overlay) = overlay_weak.upgrade() else {
                return;
            };
            if hit_at(&overlay, pressed_control.as_ref(), x, y) == TileHit::Surface {
                gesture.set_state(EventSequenceState::Claimed);
            }
        });

        let state = self.state.clone();
        let on_open = self.on_open.clone();
        let overlay_weak = overlay.downgrade();
        click.connect_released(move |_, n_press, x, y| {
            let Some(overlay) = overlay_weak.upgrade() else {
                return;
            };
            // The detach control handles its own click.
            let event = state
                .borrow()
                .route_press(index, hit_at(&overlay, detach_control.as_ref(), x, y), n_press);
            if let Some(TileEvent::Open(index)) = event {
                if let Some(ref callback) = *on_open.borrow() {
                    callback(index);
                }
            }
        });
        overlay.add_controller(click);
    }
}

fn hit_at(overlay: &Overlay, detach_control: Option<&Button>, x: f64, y: f64) -> TileHit {
    match (detach_control, overlay.pick(x, y, PickFlags::DEFAULT)) {
        (Some(control), Some(picked)) if is_within(&picked, control.upcast_ref()) => {
            TileHit::DetachControl
        }
        _ => TileHit::Surface,
    }
}

fn is_within(widget: &Widget, container: &Widget) -> bool {
    widget == container || widget.is_ancestor(container)
}
