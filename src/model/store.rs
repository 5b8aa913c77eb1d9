use std::time::{Duration, Instant};

/// Anything kept in a [`RecordStore`]: a cloneable value with a string ID.
pub trait Record: Clone {
    fn id(&self) -> &str;
}

/// Error type for record store mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("undo window for {0} has expired")]
    UndoExpired(String),
}

/// The value removed by the most recent delete, held until the next
/// mutation or until the undo window closes.
#[derive(Debug, Clone)]
pub struct PendingDeletion<T> {
    value: T,
    index: usize,
    /// `None` when the window is too large to represent
    expires_at: Option<Instant>,
}

impl<T> PendingDeletion<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Ordered in-memory collection of records, the source of truth for one
/// session. Insertion order is display order.
#[derive(Debug, Clone)]
pub struct RecordStore<T: Record> {
    records: Vec<T>,
    pending: Option<PendingDeletion<T>>,
    undo_window: Duration,
}

impl<T: Record> RecordStore<T> {
    pub fn new(undo_window: Duration) -> Self {
        RecordStore {
            records: Vec::new(),
            pending: None,
            undo_window,
        }
    }

    /// Build a store from existing records, rejecting duplicate IDs.
    pub fn from_records(records: Vec<T>, undo_window: Duration) -> Result<Self, StoreError> {
        let mut store = RecordStore::new(undo_window);
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn pending(&self) -> Option<&PendingDeletion<T>> {
        self.pending.as_ref()
    }

    /// Next free numeric ID: one past the largest numeric ID in the store.
    pub fn next_id(&self) -> String {
        let max = self
            .records
            .iter()
            .filter_map(|r| r.id().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }

    /// Append a record.
    pub fn insert(&mut self, record: T) -> Result<(), StoreError> {
        if self.contains(record.id()) {
            return Err(StoreError::DuplicateId(record.id().to_string()));
        }
        self.pending = None;
        self.records.push(record);
        Ok(())
    }

    /// Replace the record with the same ID, keeping its position.
    pub fn update(&mut self, record: T) -> Result<(), StoreError> {
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| StoreError::NotFound(record.id().to_string()))?;
        *slot = record;
        self.pending = None;
        Ok(())
    }

    /// Edit a record in place through a closure. Returns the edited record.
    pub fn modify(&mut self, id: &str, edit: impl FnOnce(&mut T)) -> Result<&T, StoreError> {
        let index = self.position(id)?;
        self.pending = None;
        edit(&mut self.records[index]);
        Ok(&self.records[index])
    }

    pub fn remove(&mut self, id: &str) -> Result<T, StoreError> {
        self.remove_at(id, Instant::now())
    }

    /// Remove a record and hold it as the pending deletion. Replaces any
    /// earlier pending deletion.
    pub fn remove_at(&mut self, id: &str, now: Instant) -> Result<T, StoreError> {
        let index = self.position(id)?;
        let value = self.records.remove(index);
        self.pending = Some(PendingDeletion {
            value: value.clone(),
            index,
            expires_at: now.checked_add(self.undo_window),
        });
        Ok(value)
    }

    pub fn undo(&mut self) -> Result<&T, StoreError> {
        self.undo_at(Instant::now())
    }

    /// Re-insert the pending deletion at its former position. The pending
    /// deletion is consumed whether or not it had expired.
    pub fn undo_at(&mut self, now: Instant) -> Result<&T, StoreError> {
        let pending = self.pending.take().ok_or(StoreError::NothingToUndo)?;
        if pending.is_expired(now) {
            return Err(StoreError::UndoExpired(pending.value.id().to_string()));
        }
        if self.contains(pending.value.id()) {
            return Err(StoreError::DuplicateId(pending.value.id().to_string()));
        }
        let index = pending.index.min(self.records.len());
        self.records.insert(index, pending.value);
        Ok(&self.records[index])
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        label: &'static str,
    }

    impl Record for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, label: &'static str) -> Item {
        Item {
            id: id.to_string(),
            label,
        }
    }

    fn sample_store() -> RecordStore<Item> {
        RecordStore::from_records(
            vec![item("1", "one"), item("2", "two"), item("3", "three")],
            Duration::from_secs(10),
        )
        .unwrap()
    }

    fn labels(store: &RecordStore<Item>) -> Vec<&'static str> {
        store.iter().map(|i| i.label).collect()
    }

    #[test]
    fn from_records_rejects_duplicates() {
        let err = RecordStore::from_records(
            vec![item("1", "one"), item("1", "again")],
            Duration::from_secs(10),
        )
        .unwrap_err();
        assert_eq!(err, StoreError::DuplicateId("1".into()));
    }

    #[test]
    fn next_id_is_one_past_numeric_max() {
        let mut store = sample_store();
        assert_eq!(store.next_id(), "4");
        store.insert(item("abc", "named")).unwrap();
        assert_eq!(store.next_id(), "4");
        let empty: RecordStore<Item> = RecordStore::new(Duration::from_secs(1));
        assert_eq!(empty.next_id(), "1");
    }

    #[test]
    fn update_keeps_position() {
        let mut store = sample_store();
        store.update(item("2", "TWO")).unwrap();
        assert_eq!(labels(&store), vec!["one", "TWO", "three"]);
        assert_eq!(
            store.update(item("9", "nine")),
            Err(StoreError::NotFound("9".into()))
        );
    }

    #[test]
    fn delete_then_undo_restores_position() {
        let mut store = sample_store();
        let now = Instant::now();
        let removed = store.remove_at("2", now).unwrap();
        assert_eq!(removed.label, "two");
        assert_eq!(labels(&store), vec!["one", "three"]);

        let restored = store.undo_at(now).unwrap();
        assert_eq!(restored.label, "two");
        assert_eq!(labels(&store), vec!["one", "two", "three"]);
        assert!(store.pending().is_none());
    }

    #[test]
    fn undo_without_delete_fails() {
        let mut store = sample_store();
        assert!(matches!(store.undo(), Err(StoreError::NothingToUndo)));
    }

    #[test]
    fn next_mutation_discards_pending_deletion() {
        let mut store = sample_store();
        let now = Instant::now();
        store.remove_at("1", now).unwrap();
        store.insert(item("4", "four")).unwrap();
        assert!(store.pending().is_none());
        assert!(matches!(store.undo_at(now), Err(StoreError::NothingToUndo)));
        assert_eq!(labels(&store), vec!["two", "three", "four"]);
    }

    #[test]
    fn second_delete_replaces_pending() {
        let mut store = sample_store();
        let now = Instant::now();
        store.remove_at("1", now).unwrap();
        store.remove_at("3", now).unwrap();
        assert_eq!(store.pending().unwrap().value().label, "three");
        store.undo_at(now).unwrap();
        assert_eq!(labels(&store), vec!["two", "three"]);
    }

    #[test]
    fn undo_after_window_expires() {
        let mut store = sample_store();
        let now = Instant::now();
        store.remove_at("1", now).unwrap();
        let later = now + Duration::from_secs(11);
        assert!(store.pending().unwrap().is_expired(later));
        assert!(matches!(
            store.undo_at(later),
            Err(StoreError::UndoExpired(id)) if id == "1"
        ));
        assert!(store.pending().is_none());
        assert_eq!(labels(&store), vec!["two", "three"]);
    }

    #[test]
    fn modify_edits_in_place() {
        let mut store = sample_store();
        let edited = store.modify("3", |i| i.label = "drei").unwrap();
        assert_eq!(edited.label, "drei");
        assert!(matches!(
            store.modify("7", |_| {}),
            Err(StoreError::NotFound(_))
        ));
    }
}
