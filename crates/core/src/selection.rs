/// Per-section transient UI state: the active tab or filter and at most
/// one expanded item.
///
/// Independent of reveal state; changing either never touches a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState<Id, F> {
    filter: F,
    expanded: Option<Id>,
}

impl<Id: Copy + PartialEq, F> SelectionState<Id, F> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            expanded: None,
        }
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: F) {
        self.filter = filter;
    }

    pub fn expanded(&self) -> Option<Id> {
        self.expanded
    }

    pub fn is_expanded(&self, id: Id) -> bool {
        self.expanded == Some(id)
    }

    /// Expand `id`, or collapse it if it is the expanded item.
    pub fn toggle(&mut self, id: Id) {
        self.expanded = if self.expanded == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn expand(&mut self, id: Id) {
        self.expanded = Some(id);
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }
}

impl<Id: Copy + PartialEq, F: Default> Default for SelectionState<Id, F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_expands_and_collapses() {
        let mut sel: SelectionState<u32, ()> = SelectionState::default();
        assert_eq!(sel.expanded(), None);
        sel.toggle(3);
        assert!(sel.is_expanded(3));
        sel.toggle(5);
        assert!(sel.is_expanded(5));
        assert!(!sel.is_expanded(3));
        sel.toggle(5);
        assert_eq!(sel.expanded(), None);
    }

    #[test]
    fn filter_change_keeps_expansion() {
        let mut sel: SelectionState<u32, usize> = SelectionState::new(0);
        sel.expand(2);
        sel.set_filter(3);
        assert_eq!(*sel.filter(), 3);
        assert!(sel.is_expanded(2));
        sel.collapse();
        assert_eq!(sel.expanded(), None);
    }
}
