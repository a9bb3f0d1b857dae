use crate::model::Identified;

/// Records sorted by id ascending, at most one per id.
///
/// Every mutation re-sorts, so the order never depends on the order in which
/// records arrived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewList<T> {
    items: Vec<T>,
}

impl<T> Default for ViewList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> ViewList<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn find(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(Identified::id).collect()
    }

    /// Adds `item`, replacing a record with the same id if there is one.
    pub fn append(&mut self, item: T) {
        match self.position(item.id()) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
        self.sort();
    }

    /// Replaces the record with the same id. Returns false, leaving the list
    /// untouched, if there is none.
    pub fn replace(&mut self, item: T) -> bool {
        let Some(index) = self.position(item.id()) else {
            return false;
        };
        self.items[index] = item;
        self.sort();
        true
    }

    /// Removes the record with `id`, if present.
    pub fn remove(&mut self, id: i64) -> Option<T> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        self.sort();
        Some(removed)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn sort(&mut self) {
        self.items.sort_by_key(Identified::id);
    }
}

impl<T: Identified> FromIterator<T> for ViewList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for item in iter {
            list.append(item);
        }
        list
    }
}

impl<T: Identified> Extend<T> for ViewList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.append(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a ViewList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
