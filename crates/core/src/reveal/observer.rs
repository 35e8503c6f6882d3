use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use super::RevealError;

/// Opaque handle to a rendered node that can be observed.
///
/// Two attaches with the same handle refer to the same node instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle(u64);

impl NodeHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Fraction of a node's area that must be visible for it to count as
/// entered.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Threshold(f64);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(0.1);

    pub fn new(fraction: f64) -> Result<Self, RevealError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(RevealError::InvalidThreshold(fraction));
        }
        Ok(Self(fraction))
    }

    pub fn fraction(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One intersection notification for one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub node: NodeHandle,
    /// Visible fraction of the node's area, in `[0, 1]`.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Whether this entry reports the node as inside the root. A ratio of
    /// zero only passes a zero threshold.
    pub fn entered(&self, threshold: Threshold) -> bool {
        self.is_intersecting && self.ratio >= threshold.fraction()
    }
}

/// Sending half of the entry channel handed to an observer.
///
/// Batches are delivered in arrival order; the tracker drains them on
/// `pump`.
#[derive(Debug, Clone)]
pub struct EntrySink(mpsc::Sender<Vec<IntersectionEntry>>);

impl EntrySink {
    pub fn channel() -> (EntrySink, mpsc::Receiver<Vec<IntersectionEntry>>) {
        let (tx, rx) = mpsc::channel();
        (EntrySink(tx), rx)
    }

    /// Queue a batch. Returns `false` once the receiving tracker is gone,
    /// at which point the observer should stop delivering.
    pub fn deliver(&self, batch: Vec<IntersectionEntry>) -> bool {
        if batch.is_empty() {
            return true;
        }
        self.0.send(batch).is_ok()
    }
}

/// A live observation registration.
pub trait Observer {
    /// Start observing a node. Observing an already observed node is a
    /// no-op.
    fn observe(&mut self, node: NodeHandle);

    fn unobserve(&mut self, node: NodeHandle);

    /// Release every observation; no entry is delivered afterwards.
    fn disconnect(&mut self);
}

/// The environment's intersection-observation primitive.
pub trait ObserverHost {
    /// Create an observer that reports through `sink`, or `None` when the
    /// primitive is unavailable.
    fn connect(&self, threshold: Threshold, sink: EntrySink) -> Option<Box<dyn Observer>>;
}

/// A host without intersection observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableHost;

impl ObserverHost for UnavailableHost {
    fn connect(&self, _threshold: Threshold, _sink: EntrySink) -> Option<Box<dyn Observer>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_bounds() {
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert_eq!(
            Threshold::new(1.5),
            Err(RevealError::InvalidThreshold(1.5))
        );
        assert!(Threshold::new(f64::NAN).is_err());
        assert_eq!(Threshold::default().fraction(), 0.1);
    }

    #[test]
    fn entry_must_reach_threshold() {
        let node = NodeHandle::new(1);
        let t = Threshold::DEFAULT;
        let below = IntersectionEntry {
            node,
            ratio: 0.05,
            is_intersecting: true,
        };
        let at = IntersectionEntry { ratio: 0.1, ..below };
        let outside = IntersectionEntry {
            ratio: 0.0,
            is_intersecting: false,
            ..below
        };
        assert!(!below.entered(t));
        assert!(at.entered(t));
        assert!(!outside.entered(t));
    }

    #[test]
    fn zero_threshold_accepts_touching_nodes() {
        let Ok(zero) = Threshold::new(0.0) else {
            panic!("zero is a valid threshold");
        };
        let touching = IntersectionEntry {
            node: NodeHandle::new(1),
            ratio: 0.0,
            is_intersecting: true,
        };
        assert!(touching.entered(zero));
        assert!(!touching.entered(Threshold::DEFAULT));
        let outside = IntersectionEntry {
            is_intersecting: false,
            ..touching
        };
        assert!(!outside.entered(zero));
    }

    #[test]
    fn sink_reports_dropped_receiver() {
        let (sink, rx) = EntrySink::channel();
        let entry = IntersectionEntry {
            node: NodeHandle::new(7),
            ratio: 1.0,
            is_intersecting: true,
        };
        assert!(sink.deliver(vec![entry]));
        drop(rx);
        assert!(!sink.deliver(vec![entry]));
        // Empty batches are never sent.
        assert!(sink.deliver(Vec::new()));
    }
}
