use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::mpsc::Receiver;

use tracing::{debug, warn};

use super::observer::{EntrySink, IntersectionEntry, NodeHandle, Observer, ObserverHost, Threshold};

/// Ids revealed during one mount lifetime. Grows only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilitySet<Id: Ord> {
    ids: BTreeSet<Id>,
}

impl<Id: Ord> VisibilitySet<Id> {
    fn new() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }

    fn insert(&mut self, id: Id) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.ids.iter()
    }
}

enum Link {
    Observing {
        observer: Box<dyn Observer>,
        entries: Receiver<Vec<IntersectionEntry>>,
    },
    /// Observation unavailable: every item counts as revealed.
    FailOpen,
    TornDown,
}

/// Scroll-reveal tracker for one mounted section.
///
/// Nodes are attached under an item id; the first entry of a node into the
/// observation root reveals its id for the rest of the mount lifetime.
/// Entries arrive in batches over a channel and are applied on
/// [`pump`](Self::pump). Dropping the tracker tears it down.
pub struct RevealTracker<Id: Ord> {
    threshold: Threshold,
    link: Link,
    nodes: HashMap<NodeHandle, Id>,
    revealed: VisibilitySet<Id>,
}

impl<Id> RevealTracker<Id>
where
    Id: Copy + Eq + Hash + Ord + Debug,
{
    /// Connect to `host`. Falls back to revealing everything if the host
    /// has no observation primitive.
    pub fn mount<H: ObserverHost + ?Sized>(host: &H, threshold: Threshold) -> Self {
        let (sink, entries) = EntrySink::channel();
        let link = match host.connect(threshold, sink) {
            Some(observer) => Link::Observing { observer, entries },
            None => {
                warn!("intersection observation unavailable, revealing all items");
                Link::FailOpen
            }
        };
        Self {
            threshold,
            link,
            nodes: HashMap::new(),
            revealed: VisibilitySet::new(),
        }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Register `node` under `id`. Returns `true` if the node was not
    /// attached before; re-attaching a node only updates its id.
    pub fn attach(&mut self, id: Id, node: NodeHandle) -> bool {
        if let Some(existing) = self.nodes.get_mut(&node) {
            *existing = id;
            return false;
        }
        match &mut self.link {
            Link::Observing { observer, .. } => observer.observe(node),
            Link::FailOpen => {
                self.revealed.insert(id);
            }
            Link::TornDown => return false,
        }
        self.nodes.insert(node, id);
        true
    }

    /// Stop observing `node`. Entries for it that are already queued are
    /// ignored.
    pub fn detach(&mut self, node: NodeHandle) {
        if self.nodes.remove(&node).is_none() {
            return;
        }
        if let Link::Observing { observer, .. } = &mut self.link {
            observer.unobserve(node);
        }
    }

    pub fn is_attached(&self, node: NodeHandle) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn attached_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_revealed(&self, id: Id) -> bool {
        matches!(self.link, Link::FailOpen) || self.revealed.contains(&id)
    }

    pub fn revealed(&self) -> &VisibilitySet<Id> {
        &self.revealed
    }

    pub fn is_fail_open(&self) -> bool {
        matches!(self.link, Link::FailOpen)
    }

    pub fn is_torn_down(&self) -> bool {
        matches!(self.link, Link::TornDown)
    }

    /// Apply every queued batch. Returns the ids revealed by this call, in
    /// the order they were first seen.
    pub fn pump(&mut self) -> Vec<Id> {
        let Link::Observing { entries, .. } = &self.link else {
            return Vec::new();
        };
        let mut newly = Vec::new();
        while let Ok(batch) = entries.try_recv() {
            for entry in batch {
                if !entry.entered(self.threshold) {
                    continue;
                }
                let Some(&id) = self.nodes.get(&entry.node) else {
                    continue;
                };
                if self.revealed.insert(id) {
                    debug!(?id, ratio = entry.ratio, "revealed");
                    newly.push(id);
                }
            }
        }
        newly
    }

    /// Release every observation. Later entries, however late, are never
    /// applied. Revealed state is kept for reading.
    pub fn teardown(&mut self) {
        if let Link::Observing { observer, .. } = &mut self.link {
            observer.disconnect();
        }
        self.link = Link::TornDown;
        self.nodes.clear();
    }
}

impl<Id: Ord> Drop for RevealTracker<Id> {
    fn drop(&mut self) {
        if let Link::Observing { observer, .. } = &mut self.link {
            observer.disconnect();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::reveal::observer::UnavailableHost;

    /// Host that records calls and lets the test deliver batches by hand,
    /// including after disconnect.
    #[derive(Clone, Default)]
    struct ScriptedHost {
        log: Rc<RefCell<ScriptLog>>,
    }

    #[derive(Default)]
    struct ScriptLog {
        observed: Vec<NodeHandle>,
        unobserved: Vec<NodeHandle>,
        disconnects: usize,
        sink: Option<EntrySink>,
    }

    struct ScriptedObserver {
        log: Rc<RefCell<ScriptLog>>,
    }

    impl Observer for ScriptedObserver {
        fn observe(&mut self, node: NodeHandle) {
            self.log.borrow_mut().observed.push(node);
        }
        fn unobserve(&mut self, node: NodeHandle) {
            self.log.borrow_mut().unobserved.push(node);
        }
        fn disconnect(&mut self) {
            self.log.borrow_mut().disconnects += 1;
        }
    }

    impl ObserverHost for ScriptedHost {
        fn connect(&self, _threshold: Threshold, sink: EntrySink) -> Option<Box<dyn Observer>> {
            self.log.borrow_mut().sink = Some(sink);
            Some(Box::new(ScriptedObserver {
                log: self.log.clone(),
            }))
        }
    }

    impl ScriptedHost {
        fn deliver(&self, entries: &[(u64, f64)]) -> bool {
            let batch = entries
                .iter()
                .map(|&(node, ratio)| IntersectionEntry {
                    node: NodeHandle::new(node),
                    ratio,
                    is_intersecting: ratio > 0.0,
                })
                .collect();
            let log = self.log.borrow();
            log.sink.as_ref().is_some_and(|s| s.deliver(batch))
        }
    }

    fn mounted(host: &ScriptedHost, items: &[u32]) -> RevealTracker<u32> {
        let mut tracker = RevealTracker::mount(host, Threshold::DEFAULT);
        for &id in items {
            tracker.attach(id, NodeHandle::new(u64::from(id)));
        }
        tracker
    }

    #[test]
    fn nothing_revealed_before_entries() {
        let host = ScriptedHost::default();
        let tracker = mounted(&host, &[1, 2, 3]);
        assert!((1..=3).all(|id| !tracker.is_revealed(id)));
        assert!(tracker.revealed().is_empty());
    }

    #[test]
    fn same_batch_reveals_both_items_third_waits() {
        let host = ScriptedHost::default();
        let mut tracker = mounted(&host, &[1, 2, 3]);

        host.deliver(&[(1, 0.4), (2, 0.12), (3, 0.02)]);
        assert_eq!(tracker.pump(), vec![1, 2]);
        let set: Vec<u32> = tracker.revealed().iter().copied().collect();
        assert_eq!(set, vec![1, 2]);
        assert!(!tracker.is_revealed(3));

        host.deliver(&[(3, 0.1)]);
        assert_eq!(tracker.pump(), vec![3]);
        assert!(tracker.is_revealed(3));
    }

    #[test]
    fn revealed_items_never_revert() {
        let host = ScriptedHost::default();
        let mut tracker = mounted(&host, &[1]);
        host.deliver(&[(1, 1.0)]);
        host.deliver(&[(1, 0.0)]);
        host.deliver(&[(1, 0.5)]);
        assert_eq!(tracker.pump(), vec![1]);
        assert!(tracker.is_revealed(1));
        assert_eq!(tracker.revealed().len(), 1);
    }

    #[test]
    fn repeated_entries_in_one_batch_dedupe() {
        let host = ScriptedHost::default();
        let mut tracker = mounted(&host, &[5]);
        host.deliver(&[(5, 0.3), (5, 0.9), (5, 0.5)]);
        assert_eq!(tracker.pump(), vec![5]);
        assert_eq!(tracker.revealed().len(), 1);
    }

    #[test]
    fn attaching_same_node_twice_observes_once() {
        let host = ScriptedHost::default();
        let mut tracker: RevealTracker<u32> = RevealTracker::mount(&host, Threshold::DEFAULT);
        assert!(tracker.attach(1, NodeHandle::new(10)));
        assert!(!tracker.attach(1, NodeHandle::new(10)));
        assert_eq!(host.log.borrow().observed, vec![NodeHandle::new(10)]);
        assert_eq!(tracker.attached_count(), 1);
    }

    #[test]
    fn reattach_under_new_id_retags_without_observing() {
        let host = ScriptedHost::default();
        let mut tracker: RevealTracker<u32> = RevealTracker::mount(&host, Threshold::DEFAULT);
        tracker.attach(1, NodeHandle::new(10));
        tracker.attach(2, NodeHandle::new(10));
        assert_eq!(host.log.borrow().observed.len(), 1);
        host.deliver(&[(10, 1.0)]);
        assert_eq!(tracker.pump(), vec![2]);
        assert!(!tracker.is_revealed(1));
    }

    #[test]
    fn late_entries_after_teardown_are_ignored() {
        let host = ScriptedHost::default();
        let mut tracker = mounted(&host, &[1, 2]);
        tracker.teardown();
        assert_eq!(host.log.borrow().disconnects, 1);
        assert!(tracker.is_torn_down());

        // The misbehaving host still holds its sink and fires anyway.
        let accepted = host.deliver(&[(1, 1.0), (2, 1.0)]);
        assert!(!accepted);
        assert!(tracker.pump().is_empty());
        assert!(!tracker.is_revealed(1));
        assert!(!tracker.attach(3, NodeHandle::new(3)));
    }

    #[test]
    fn teardown_keeps_revealed_state_readable() {
        let host = ScriptedHost::default();
        let mut tracker = mounted(&host, &[1]);
        host.deliver(&[(1, 1.0)]);
        tracker.pump();
        tracker.teardown();
        assert!(tracker.is_revealed(1));
    }

    #[test]
    fn drop_disconnects() {
        let host = ScriptedHost::default();
        let tracker = mounted(&host, &[1]);
        drop(tracker);
        assert_eq!(host.log.borrow().disconnects, 1);
    }

    #[test]
    fn detached_node_entries_are_ignored() {
        let host = ScriptedHost::default();
        let mut tracker = mounted(&host, &[1, 2]);
        host.deliver(&[(1, 1.0)]);
        tracker.detach(NodeHandle::new(1));
        assert_eq!(host.log.borrow().unobserved, vec![NodeHandle::new(1)]);
        assert!(tracker.pump().is_empty());
        assert!(!tracker.is_revealed(1));
    }

    #[test]
    fn unknown_nodes_are_ignored() {
        let host = ScriptedHost::default();
        let mut tracker = mounted(&host, &[1]);
        host.deliver(&[(99, 1.0)]);
        assert!(tracker.pump().is_empty());
    }

    #[test]
    fn fails_open_without_observation() {
        let mut tracker: RevealTracker<u32> =
            RevealTracker::mount(&UnavailableHost, Threshold::DEFAULT);
        assert!(tracker.is_fail_open());
        assert!(tracker.is_revealed(42));
        assert!(tracker.attach(1, NodeHandle::new(1)));
        assert!(tracker.revealed().contains(&1));
        assert!(tracker.pump().is_empty());
    }

    #[test]
    fn remount_starts_empty() {
        let host = ScriptedHost::default();
        let mut tracker = mounted(&host, &[1]);
        host.deliver(&[(1, 1.0)]);
        tracker.pump();
        drop(tracker);
        let tracker = mounted(&host, &[1]);
        assert!(!tracker.is_revealed(1));
    }
}
