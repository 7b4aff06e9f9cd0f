mod app;
mod config;
mod error;
mod image_loader;
mod models;
mod ui;

use app::KeepsakeApp;
use config::GalleryConfig;

fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "keepsake=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = GalleryConfig::from_env();
    tracing::debug!(?config, "Loaded configuration");
    ui::media_loader::configure_loader_threads(config.loader_threads);

    let app = KeepsakeApp::new(config);
    std::process::exit(app.run());
}
