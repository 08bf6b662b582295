use crate::models::PhotoId;

/// Set of selected photo ids that remembers the order of selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    ids: Vec<PhotoId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symmetric difference with `{id}`. Returns whether `id` is now selected.
    pub fn toggle(&mut self, id: PhotoId) -> bool {
        if let Some(pos) = self.ids.iter().position(|x| *x == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: &PhotoId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids for which `keep` returns false
    pub fn retain(&mut self, keep: impl FnMut(&PhotoId) -> bool) {
        self.ids.retain(keep);
    }

    /// Ids in selection order
    pub fn iter(&self) -> impl Iterator<Item = &PhotoId> {
        self.ids.iter()
    }

    pub fn to_vec(&self) -> Vec<PhotoId> {
        self.ids.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_toggle_parity() {
        let ids: Vec<PhotoId> = (0..3).map(|_| Uuid::new_v4()).collect();
        // id[0] toggled 3x, id[1] 2x, id[2] 1x, interleaved
        let calls = [0, 1, 0, 2, 1, 0];

        let mut set = SelectionSet::new();
        for &i in &calls {
            set.toggle(ids[i]);
        }

        for (i, id) in ids.iter().enumerate() {
            let count = calls.iter().filter(|&&c| c == i).count();
            assert_eq!(set.contains(id), count % 2 == 1, "id #{}", i);
        }
    }

    #[test]
    fn test_double_toggle_is_identity() {
        let id = Uuid::new_v4();
        let mut set = SelectionSet::new();
        assert!(set.toggle(id));
        assert!(!set.toggle(id));
        assert!(set.is_empty());
    }

    #[test]
    fn test_iteration_follows_selection_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let mut set = SelectionSet::new();
        set.toggle(c);
        set.toggle(a);
        set.toggle(b);
        set.toggle(a);
        set.toggle(a);

        assert_eq!(set.to_vec(), vec![c, b, a]);
    }
}
