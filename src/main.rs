#![deny(missing_docs)]
#![deny(warnings)]

//! Entry point for the dropkit demo window.
use dropkit::config;
use dropkit::demo::DemoApp;
use dropkit::logging;
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = config::load_or_default();
    let settings = loaded.as_ref().cloned().unwrap_or_default();
    if let Err(err) = logging::init(&settings.drag) {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = &loaded {
        tracing::warn!("Falling back to default settings: {err}");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 600.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "dropkit demo",
        native_options,
        Box::new(move |_cc| Ok(Box::new(DemoApp::new(settings)))),
    )?;
    Ok(())
}
