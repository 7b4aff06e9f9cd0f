// Main window: header, tile grid and the lightbox viewer layered on top.

use gtk4::gdk::Display;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, CssProvider, Label, Orientation,
    Overlay, PolicyType, ScrolledWindow, Settings, STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use super::detached::floating_host;
use super::tile_grid::MediaGrid;
use super::viewer::LightboxViewer;
use crate::config::GalleryConfig;
use crate::models::Catalog;

const FALLBACK_CSS: &str = r#"
window {
    background-color: #17121c;
    color: #f3e9f5;
}

.gallery-title {
    font-size: 28px;
    font-weight: bold;
}

.gallery-summary {
    color: #b9a5c2;
}

.tile {
    border-radius: 14px;
    background-color: #2a2233;
}

.play-badge {
    opacity: 0;
    font-size: 32px;
}

.tile:hover .play-badge {
    opacity: 0.9;
}

.lightbox-backdrop {
    background-color: rgba(8, 5, 12, 0.92);
}

.lightbox-caption {
    color: #d8c8de;
}
"#;

const STYLESHEET_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/style.css");

#[derive(Debug, PartialEq, Eq)]
enum StyleSource<'a> {
    File(&'a Path),
    Embedded,
}

/// The on-disk stylesheet wins when present so it can be edited without a
/// rebuild.
fn stylesheet_source(path: &Path) -> StyleSource<'_> {
    if path.is_file() {
        StyleSource::File(path)
    } else {
        StyleSource::Embedded
    }
}

fn install_stylesheet() {
    let Some(display) = Display::default() else {
        tracing::warn!("No display, skipping stylesheet");
        return;
    };

    let provider = CssProvider::new();
    match stylesheet_source(Path::new(STYLESHEET_PATH)) {
        StyleSource::File(path) => {
            provider.load_from_path(path);
            tracing::debug!(path = %path.display(), "Stylesheet loaded");
        }
        StyleSource::Embedded => {
            provider.load_from_string(FALLBACK_CSS);
            tracing::debug!("Using embedded stylesheet");
        }
    }
    gtk4::style_context_add_provider_for_display(
        &display,
        &provider,
        STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

/// Main window for the gallery
pub struct MainWindow {
    window: ApplicationWindow,
    grid: MediaGrid,
    viewer: LightboxViewer,
    // Parent-side view of the controlled open state
    viewer_open: Rc<Cell<bool>>,
}

impl MainWindow {
    pub fn new(app: &Application, config: &GalleryConfig, catalog: &Catalog) -> Rc<Self> {
        install_stylesheet();
        if let Some(settings) = Settings::default() {
            settings.set_gtk_application_prefer_dark_theme(true);
        }

        let window = ApplicationWindow::builder()
            .application(app)
            .title(config.title.as_str())
            .default_width(1200)
            .default_height(800)
            .build();

        // Header
        let title = Label::new(Some(&config.title));
        title.add_css_class("gallery-title");
        title.set_halign(Align::Center);

        let summary = Label::new(Some(&catalog.summary()));
        summary.add_css_class("gallery-summary");
        summary.set_halign(Align::Center);

        let header = GtkBox::new(Orientation::Vertical, 6);
        header.set_margin_top(32);
        header.set_margin_bottom(24);
        header.add_css_class("gallery-header");
        header.append(&title);
        header.append(&summary);

        // Grid
        floating_host().set_enabled(config.detached_enabled);
        floating_host().set_parent(&window);
        let grid = MediaGrid::new(config.detached_enabled);
        grid.set_catalog(catalog);
        grid.widget().set_margin_start(24);
        grid.widget().set_margin_end(24);
        grid.widget().set_margin_bottom(24);

        let content = GtkBox::new(Orientation::Vertical, 0);
        content.append(&header);
        content.append(grid.widget());

        let scroller = ScrolledWindow::new();
        scroller.set_policy(PolicyType::Never, PolicyType::Automatic);
        scroller.set_hexpand(true);
        scroller.set_vexpand(true);
        scroller.set_child(Some(&content));

        // Viewer sits above the grid
        let viewer = LightboxViewer::new();
        viewer.set_images(catalog.sources());
        viewer.set_key_target(&window);

        let root = Overlay::new();
        root.set_child(Some(&scroller));
        if let Some(viewer_widget) = viewer.widget() {
            root.add_overlay(&viewer_widget);
        }
        window.set_child(Some(&root));

        let main_window = Rc::new(Self {
            window,
            grid,
            viewer,
            viewer_open: Rc::new(Cell::new(false)),
        });
        main_window.connect_signals();

        if catalog.is_empty() {
            tracing::warn!("Catalog is empty, nothing to show");
        }
        let conflicts = catalog.kind_conflicts();
        if !conflicts.is_empty() {
            tracing::warn!(?conflicts, "Catalog entries with mismatched kind tags");
        }
        tracing::info!(
            items = catalog.len(),
            videos = catalog.video_count(),
            "Gallery ready"
        );

        main_window
    }

    fn connect_signals(self: &Rc<Self>) {
        let viewer = self.viewer.clone();
        let viewer_open = self.viewer_open.clone();
        self.grid.connect_open_requested(move |index| {
            viewer_open.set(true);
            viewer.set_open(true, index);
        });

        let viewer_open = self.viewer_open.clone();
        let viewer_weak = self.viewer.downgrade();
        self.viewer.connect_open_change(move |open| {
            viewer_open.set(open);
            if let Some(viewer) = viewer_weak.upgrade() {
                if !open && viewer.is_open() {
                    viewer.set_open(false, 0);
                }
            }
        });

        // Release the detached slot along with the gallery.
        let window_weak = Rc::downgrade(self);
        self.window.connect_close_request(move |_| {
            if let Some(main_window) = window_weak.upgrade() {
                tracing::debug!(
                    placeholders = main_window.placeholder_count(),
                    viewer_open = main_window.is_viewer_open(),
                    "Closing gallery"
                );
            }
            floating_host().set_enabled(false);
            glib::Propagation::Proceed
        });
    }

    pub fn present(&self) {
        self.window.present();
    }

    pub fn is_viewer_open(&self) -> bool {
        self.viewer_open.get()
    }

    pub fn placeholder_count(&self) -> usize {
        self.grid.placeholder_count()
    }
}
