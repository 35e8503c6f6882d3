//! Browser bridge for the folio page.
//!
//! Two ways in: [`RevealSection`] drives scroll-reveal over real DOM
//! elements, and the `render_*`/`page_*` functions expose the canvas page
//! as JSON render commands.

mod reveal;

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use folio_core::content::filter::{TagFilter, filter_items, filter_tabs};
use folio_core::contact::http::FetchRelay;
use folio_core::{Page, Registry, SiteConfig};
use folio_protocol::{Action, ThemeMode, Viewport};
use wasm_bindgen::prelude::*;

pub use reveal::{NODE_ATTR, RevealSection};

struct Session {
    page: Page,
    /// `Date.now()` when the page was created.
    origin_ms: f64,
}

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn registry() -> Result<Arc<Registry>, JsError> {
    SiteConfig::default().registry().map_err(js_err)
}

/// Run `f` against the page, creating it on first use.
fn with_page<T>(f: impl FnOnce(&mut Page, Duration) -> T) -> Result<T, JsError> {
    SESSION.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let config = SiteConfig::default();
            let page = Page::new(&config, registry()?, Box::new(FetchRelay::new()));
            *slot = Some(Session {
                page,
                origin_ms: js_sys::Date::now(),
            });
        }
        let Some(session) = slot.as_mut() else {
            return Err(JsError::new("page unavailable"));
        };
        let elapsed_ms = (js_sys::Date::now() - session.origin_ms).max(0.0);
        let now = Duration::from_secs_f64(elapsed_ms / 1000.0);
        Ok(f(&mut session.page, now))
    })
}

/// The whole content registry as JSON.
#[wasm_bindgen]
pub fn registry_json() -> Result<String, JsError> {
    serde_json::to_string(registry()?.as_ref()).map_err(js_err)
}

/// Ids of the projects shown under the filter `tag` (`"all"` shows every
/// project), in registry order.
#[wasm_bindgen]
pub fn filter_projects(tag: &str) -> Result<Vec<u32>, JsError> {
    let registry = registry()?;
    Ok(filter_items(&registry.projects, &TagFilter::from_tag(tag))
        .into_iter()
        .map(|p| p.id)
        .collect())
}

/// Project filter buttons with their counts, as JSON.
#[wasm_bindgen]
pub fn project_filter_tabs() -> Result<String, JsError> {
    let registry = registry()?;
    serde_json::to_string(&filter_tabs(&registry.projects, &registry.project_filters))
        .map_err(js_err)
}

/// Lay the page out for the given viewport and return its render commands
/// as JSON.
#[wasm_bindgen]
pub fn render_page(width: f64, height: f64, scroll_y: f64) -> Result<String, JsError> {
    let viewport = Viewport::new(width, height).scrolled_to(scroll_y);
    let commands = with_page(|page, now| page.frame(&viewport, now))?;
    serde_json::to_string(&commands).map_err(js_err)
}

/// Total page height after the last render.
#[wasm_bindgen]
pub fn page_height() -> Result<f64, JsError> {
    with_page(|page, _| page.height())
}

/// Apply an action (JSON, as carried by the render commands). Returns the
/// effect the host must perform as JSON, or `None`.
#[wasm_bindgen]
pub fn page_action(action_json: &str) -> Result<Option<String>, JsError> {
    let action: Action = serde_json::from_str(action_json).map_err(js_err)?;
    let effect = with_page(|page, now| page.handle(&action, now))?;
    effect
        .map(|e| serde_json::to_string(&e).map_err(js_err))
        .transpose()
}

/// Milliseconds until the page next changes on its own.
#[wasm_bindgen]
pub fn next_frame_in_ms() -> Result<f64, JsError> {
    with_page(|page, now| page.next_deadline(now).as_secs_f64() * 1000.0)
}

/// Render the whole page, fully revealed, as a standalone SVG document.
#[wasm_bindgen]
pub fn render_page_svg(width: f64, dark: bool) -> Result<String, JsError> {
    with_page(|page, now| {
        let live = page.theme();
        let mode = if dark { ThemeMode::Dark } else { ThemeMode::Light };
        page.set_theme(mode);
        let (commands, height) = page.export(width, now);
        page.set_theme(live);
        folio_core::svg::render_svg(&commands, width, height, mode)
    })
}
