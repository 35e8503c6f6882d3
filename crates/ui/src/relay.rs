//! Email relay transport for the current platform.

use folio_core::EmailRelay;

/// Relay that wakes the UI when the answer lands.
pub fn for_context(ctx: &egui::Context) -> Box<dyn EmailRelay> {
    let ctx = ctx.clone();
    #[cfg(not(target_arch = "wasm32"))]
    let relay = folio_core::contact::http::ThreadRelay::new();
    #[cfg(target_arch = "wasm32")]
    let relay = folio_core::contact::http::FetchRelay::new();
    Box::new(relay.on_reply(move || ctx.request_repaint()))
}
