#![warn(clippy::all, rust_2018_idioms)]

use eschersketch::EscherApp;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Eschersketch"),
        ..Default::default()
    };

    eframe::run_native(
        "eschersketch",
        options,
        Box::new(|cc| Ok(Box::new(EscherApp::new(cc)))),
    )
}

// The web build is driven from the page, not from `main`.
#[cfg(target_arch = "wasm32")]
fn main() {}
