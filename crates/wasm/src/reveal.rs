//! Scroll-reveal for DOM pages, backed by the browser's
//! `IntersectionObserver`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use folio_core::reveal::{
    EntrySink, IntersectionEntry, NodeHandle, Observer, ObserverHost, RevealTracker, Threshold,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Attribute carrying an element's node handle.
pub const NODE_ATTR: &str = "data-reveal-node";

/// Handles are unique across every section on the page.
static NEXT_NODE: AtomicU64 = AtomicU64::new(1);

type Elements = Rc<RefCell<HashMap<NodeHandle, web_sys::Element>>>;

struct WebObserverHost {
    elements: Elements,
    /// Called after entries are queued, so the page knows to `pump`.
    on_entries: Option<js_sys::Function>,
}

impl ObserverHost for WebObserverHost {
    fn connect(&self, threshold: Threshold, sink: EntrySink) -> Option<Box<dyn Observer>> {
        let window = web_sys::window()?;
        let supported = js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false);
        if !supported {
            return None;
        }

        let on_entries = self.on_entries.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: web_sys::IntersectionObserver| {
                let batch: Vec<IntersectionEntry> = entries
                    .iter()
                    .filter_map(|value| {
                        let entry: web_sys::IntersectionObserverEntry = value.dyn_into().ok()?;
                        let raw = entry.target().get_attribute(NODE_ATTR)?.parse().ok()?;
                        Some(IntersectionEntry {
                            node: NodeHandle::new(raw),
                            ratio: entry.intersection_ratio(),
                            is_intersecting: entry.is_intersecting(),
                        })
                    })
                    .collect();
                let live = forward(&sink, batch, || {
                    if let Some(wake) = &on_entries
                        && let Err(e) = wake.call0(&JsValue::NULL)
                    {
                        web_sys::console::error_1(&e);
                    }
                });
                if !live {
                    observer.disconnect();
                }
            },
        );
        let options = web_sys::IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold.fraction()));
        let observer = web_sys::IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .ok()?;
        Some(Box::new(WebObserver {
            observer,
            elements: Rc::clone(&self.elements),
            _callback: callback,
        }))
    }
}

struct WebObserver {
    observer: web_sys::IntersectionObserver,
    elements: Elements,
    _callback: Closure<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>,
}

impl Observer for WebObserver {
    fn observe(&mut self, node: NodeHandle) {
        if let Some(element) = self.elements.borrow().get(&node) {
            self.observer.observe(element);
        }
    }

    fn unobserve(&mut self, node: NodeHandle) {
        if let Some(element) = self.elements.borrow().get(&node) {
            self.observer.unobserve(element);
        }
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

/// Reveal state of one page section. Items are DOM elements; ids are the
/// content ids they render.
#[wasm_bindgen]
pub struct RevealSection {
    tracker: RevealTracker<u32>,
    elements: Elements,
}

#[wasm_bindgen]
impl RevealSection {
    /// Mount with the given threshold, default 0.1. Falls back to
    /// revealing everything when the browser has no `IntersectionObserver`.
    ///
    /// `on_entries` is called whenever observer entries are waiting for
    /// [`pump`](Self::pump).
    #[wasm_bindgen(constructor)]
    pub fn new(
        threshold: Option<f64>,
        on_entries: Option<js_sys::Function>,
    ) -> Result<RevealSection, JsError> {
        let threshold = match threshold {
            Some(t) => Threshold::new(t).map_err(|e| JsError::new(&e.to_string()))?,
            None => Threshold::default(),
        };
        let elements: Elements = Rc::default();
        let host = WebObserverHost {
            elements: Rc::clone(&elements),
            on_entries,
        };
        Ok(Self {
            tracker: RevealTracker::mount(&host, threshold),
            elements,
        })
    }

    /// Track `element` as the rendering of item `id`. Returns `false` if
    /// the element was already attached.
    pub fn attach(&mut self, id: u32, element: web_sys::Element) -> Result<bool, JsError> {
        let node = match handle_of(&element) {
            Some(node) => node,
            None => {
                let node = NodeHandle::new(NEXT_NODE.fetch_add(1, Ordering::Relaxed));
                element
                    .set_attribute(NODE_ATTR, &node.raw().to_string())
                    .map_err(|e| JsError::new(&format!("{e:?}")))?;
                node
            }
        };
        self.elements.borrow_mut().insert(node, element);
        Ok(self.tracker.attach(id, node))
    }

    /// Stop tracking `element`, e.g. when a filter removes it.
    pub fn detach(&mut self, element: &web_sys::Element) {
        if let Some(node) = handle_of(element) {
            self.tracker.detach(node);
            self.elements.borrow_mut().remove(&node);
        }
    }

    #[wasm_bindgen(js_name = isRevealed)]
    pub fn is_revealed(&self, id: u32) -> bool {
        self.tracker.is_revealed(id)
    }

    /// Apply queued observer entries. Returns the newly revealed ids.
    pub fn pump(&mut self) -> Vec<u32> {
        self.tracker.pump()
    }

    pub fn revealed(&self) -> Vec<u32> {
        self.tracker.revealed().iter().copied().collect()
    }

    #[wasm_bindgen(js_name = isFailOpen)]
    pub fn is_fail_open(&self) -> bool {
        self.tracker.is_fail_open()
    }

    /// Disconnect the observer. Later attaches are ignored.
    pub fn teardown(&mut self) {
        self.tracker.teardown();
        self.elements.borrow_mut().clear();
    }
}

/// Queue `batch` and run `wake` if anything was queued. Returns `false`
/// once the tracker is gone.
fn forward(sink: &EntrySink, batch: Vec<IntersectionEntry>, wake: impl FnOnce()) -> bool {
    if batch.is_empty() {
        return true;
    }
    if !sink.deliver(batch) {
        return false;
    }
    wake();
    true
}

fn handle_of(element: &web_sys::Element) -> Option<NodeHandle> {
    element
        .get_attribute(NODE_ATTR)?
        .parse()
        .ok()
        .map(NodeHandle::new)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn entry(raw: u64) -> IntersectionEntry {
        IntersectionEntry {
            node: NodeHandle::new(raw),
            ratio: 1.0,
            is_intersecting: true,
        }
    }

    #[test]
    fn queued_entries_wake_the_page() {
        let (sink, rx) = EntrySink::channel();
        let woke = Cell::new(0);
        assert!(forward(&sink, vec![entry(1), entry(2)], || woke.set(woke.get() + 1)));
        assert_eq!(woke.get(), 1);
        assert_eq!(rx.try_recv().map(|b| b.len()), Ok(2));
    }

    #[test]
    fn empty_batches_do_not_wake() {
        let (sink, rx) = EntrySink::channel();
        let woke = Cell::new(false);
        assert!(forward(&sink, Vec::new(), || woke.set(true)));
        assert!(!woke.get());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn gone_tracker_stops_delivery_without_waking() {
        let (sink, rx) = EntrySink::channel();
        drop(rx);
        let woke = Cell::new(false);
        assert!(!forward(&sink, vec![entry(1)], || woke.set(true)));
        assert!(!woke.get());
    }
}
