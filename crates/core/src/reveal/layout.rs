use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use folio_protocol::Rect;
use tracing::trace;

use super::observer::{EntrySink, IntersectionEntry, NodeHandle, Observer, ObserverHost, Threshold};

/// Geometry-driven observation host.
///
/// Front-ends that lay the page out themselves (egui, terminal) report node
/// bounds and the visible root rectangle here; [`flush`](Self::flush)
/// plays the part of the browser's intersection callback and delivers one
/// batch per registration.
///
/// Cloning yields another handle to the same host.
#[derive(Clone, Default)]
pub struct LayoutObserverHost {
    state: Rc<RefCell<HostState>>,
}

#[derive(Default)]
struct HostState {
    next_id: u64,
    root: Option<Rect>,
    bounds: HashMap<NodeHandle, Rect>,
    registrations: BTreeMap<u64, Registration>,
}

struct Registration {
    threshold: Threshold,
    sink: EntrySink,
    /// Last delivered entered-state per node; `None` until the initial
    /// notification has gone out.
    observed: HashMap<NodeHandle, Option<bool>>,
}

impl LayoutObserverHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the observation root (the visible viewport in page space).
    pub fn set_root(&self, root: Rect) {
        self.state.borrow_mut().root = Some(root);
    }

    pub fn set_bounds(&self, node: NodeHandle, rect: Rect) {
        self.state.borrow_mut().bounds.insert(node, rect);
    }

    /// Forget a node's layout (it is no longer rendered).
    pub fn remove_node(&self, node: NodeHandle) {
        self.state.borrow_mut().bounds.remove(&node);
    }

    /// Number of live observer registrations.
    pub fn registration_count(&self) -> usize {
        self.state.borrow().registrations.len()
    }

    /// Number of observed nodes across all registrations.
    pub fn observation_count(&self) -> usize {
        self.state
            .borrow()
            .registrations
            .values()
            .map(|r| r.observed.len())
            .sum()
    }

    /// Compute intersections against the current root and deliver changed
    /// entries. Returns the number of entries delivered.
    ///
    /// Nodes without known bounds stay pending until their layout arrives.
    /// Registrations whose tracker has gone away are dropped.
    pub fn flush(&self) -> usize {
        let mut state = self.state.borrow_mut();
        let HostState {
            root,
            bounds,
            registrations,
            ..
        } = &mut *state;
        let Some(root) = *root else {
            return 0;
        };

        let mut delivered = 0;
        registrations.retain(|id, reg| {
            let mut batch = Vec::new();
            for (node, last) in reg.observed.iter_mut() {
                let Some(rect) = bounds.get(node) else {
                    continue;
                };
                let (ratio, is_intersecting) = measure(rect, &root);
                let entry = IntersectionEntry {
                    node: *node,
                    ratio,
                    is_intersecting,
                };
                let entered = entry.entered(reg.threshold);
                if *last != Some(entered) {
                    *last = Some(entered);
                    batch.push(entry);
                }
            }
            let count = batch.len();
            if reg.sink.deliver(batch) {
                delivered += count;
                true
            } else {
                trace!(registration = id, "dropping registration with no receiver");
                false
            }
        });
        delivered
    }
}

impl ObserverHost for LayoutObserverHost {
    fn connect(&self, threshold: Threshold, sink: EntrySink) -> Option<Box<dyn Observer>> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.registrations.insert(
            id,
            Registration {
                threshold,
                sink,
                observed: HashMap::new(),
            },
        );
        Some(Box::new(LayoutObserver {
            id,
            state: Rc::downgrade(&self.state),
        }))
    }
}

/// Fraction of `rect` inside `root`, and whether the two touch at all
/// (edges included). A zero-area node touching the root is fully visible.
fn measure(rect: &Rect, root: &Rect) -> (f64, bool) {
    let touching = rect.x <= root.right()
        && root.x <= rect.right()
        && rect.y <= root.bottom()
        && root.y <= rect.bottom();
    if !touching {
        return (0.0, false);
    }
    let area = rect.area();
    if area <= 0.0 {
        return (1.0, true);
    }
    let ratio = rect
        .intersection(root)
        .map_or(0.0, |overlap| (overlap.area() / area).clamp(0.0, 1.0));
    (ratio, true)
}

struct LayoutObserver {
    id: u64,
    state: Weak<RefCell<HostState>>,
}

impl LayoutObserver {
    fn with_registration(&self, f: impl FnOnce(&mut Registration)) {
        if let Some(state) = self.state.upgrade()
            && let Some(reg) = state.borrow_mut().registrations.get_mut(&self.id)
        {
            f(reg);
        }
    }
}

impl Observer for LayoutObserver {
    fn observe(&mut self, node: NodeHandle) {
        self.with_registration(|reg| {
            reg.observed.entry(node).or_insert(None);
        });
    }

    fn unobserve(&mut self, node: NodeHandle) {
        self.with_registration(|reg| {
            reg.observed.remove(&node);
        });
    }

    fn disconnect(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().registrations.remove(&self.id);
        }
    }
}

impl Drop for LayoutObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}
