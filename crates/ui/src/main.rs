//! Native desktop window for the portfolio page.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Portfolio")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "folio",
        options,
        Box::new(|cc| Ok(Box::new(folio_ui::PortfolioApp::new(cc)?))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
