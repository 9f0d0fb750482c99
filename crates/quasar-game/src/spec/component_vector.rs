//! Sparse, 1-based component storage

/// Components indexed by id, starting at 1. Ids need not be contiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentVector<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for ComponentVector<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

fn slot_index(id: i32) -> Option<usize> {
    usize::try_from(id).ok()?.checked_sub(1)
}

impl<T> ComponentVector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `item` under `id`, replacing an existing one.
    /// Returns false if `id` is not a valid (positive) id.
    pub fn insert(&mut self, id: i32, item: T) -> bool {
        let index = match slot_index(id) {
            Some(index) => index,
            None => return false,
        };
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(item);
        true
    }

    pub fn get(&self, id: i32) -> Option<&T> {
        self.slots.get(slot_index(id)?)?.as_ref()
    }

    pub fn get_mut(&mut self, id: i32) -> Option<&mut T> {
        self.slots.get_mut(slot_index(id)?)?.as_mut()
    }

    pub fn remove(&mut self, id: i32) -> Option<T> {
        self.slots.get_mut(slot_index(id)?)?.take()
    }

    /// Highest id that may be in use
    pub fn size(&self) -> i32 {
        i32::try_from(self.slots.len()).unwrap_or(i32::MAX)
    }

    /// Smallest existing id greater than `id`
    pub fn find_next(&self, id: i32) -> Option<i32> {
        let start = usize::try_from(id).unwrap_or(0);
        self.slots
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, slot)| slot.is_some())
            .and_then(|(index, _)| i32::try_from(index + 1).ok())
    }

    pub fn first(&self) -> Option<i32> {
        self.find_next(0)
    }

    /// Existing items in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (i32, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (index as i32 + 1, item)))
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_ids() {
        let mut v = ComponentVector::new();
        assert!(v.insert(3, "c"));
        assert!(v.insert(1, "a"));
        assert!(!v.insert(0, "zero"));
        assert!(!v.insert(-1, "neg"));

        assert_eq!(v.size(), 3);
        assert_eq!(v.count(), 2);
        assert_eq!(v.get(1), Some(&"a"));
        assert_eq!(v.get(2), None);
        assert_eq!(v.get(0), None);
        assert_eq!(v.get(4), None);
    }

    #[test]
    fn test_find_next() {
        let mut v = ComponentVector::new();
        v.insert(2, 'b');
        v.insert(5, 'e');
        assert_eq!(v.first(), Some(2));
        assert_eq!(v.find_next(2), Some(5));
        assert_eq!(v.find_next(3), Some(5));
        assert_eq!(v.find_next(5), None);
        assert_eq!(v.find_next(-7), Some(2));

        v.remove(2);
        assert_eq!(v.first(), Some(5));
        let ids: Vec<i32> = v.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![5]);
    }
}
