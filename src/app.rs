use gtk4::prelude::*;
use gtk4::Application;
use std::path::Path;
use std::rc::Rc;

use crate::config::GalleryConfig;
use crate::models::Catalog;
use crate::ui::MainWindow;

const APP_ID: &str = "com.keepsake.Gallery";

pub struct KeepsakeApp {
    app: Application,
}

impl KeepsakeApp {
    pub fn new(config: GalleryConfig) -> Self {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        let config = Rc::new(config);

        let activate_config = config.clone();
        app.connect_activate(move |app| {
            let catalog = Catalog::builtin(&activate_config.media_dir);
            Self::show_window(app, &activate_config, &catalog);
        });

        app.connect_open(move |app, files, _hint| {
            let path = files.first().and_then(|f| f.path());
            let catalog = match path.as_deref() {
                Some(dir) => Self::catalog_for(dir, &config),
                None => Catalog::builtin(&config.media_dir),
            };
            Self::show_window(app, &config, &catalog);
        });

        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    /// Scan an opened directory; fall back to the built-in catalog when it
    /// can't be read.
    fn catalog_for(dir: &Path, config: &GalleryConfig) -> Catalog {
        match Catalog::scan(dir) {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::warn!(error = %err, "Falling back to built-in catalog");
                Catalog::builtin(&config.media_dir)
            }
        }
    }

    fn show_window(app: &Application, config: &GalleryConfig, catalog: &Catalog) {
        let window = MainWindow::new(app, config, catalog);
        window.present();
        // Keep the window alive by storing it on the Application.
        unsafe {
            app.set_data("main-window", window);
        }
    }
}
