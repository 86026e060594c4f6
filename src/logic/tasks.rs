use crate::db::KeyValueStore;
use crate::error::Result;
use crate::models::{HourRecord, SlotId, Tier};
use tracing::{debug, warn};

/// Why a task mutation left the records untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declined {
    UnsuitableHour,
    EmptyText,
    UnknownSlot,
    IndexOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskChange {
    Applied,
    Unchanged(Declined),
}

impl TaskChange {
    pub fn is_applied(&self) -> bool {
        matches!(self, TaskChange::Applied)
    }
}

/// Task CRUD over hour records, written through to a key-value store.
///
/// Every applied mutation persists the slot's full list before returning.
pub struct TaskStore<S> {
    store: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persisted tasks of a slot. Unreadable or corrupt entries count as empty.
    pub fn load_tasks(&self, slot_id: &SlotId) -> Vec<String> {
        let raw = match self.store.get(&slot_id.storage_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(slot = %slot_id, error = %e, "Failed to read tasks, treating slot as empty");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(slot = %slot_id, error = %e, "Stored tasks are malformed, treating slot as empty");
            Vec::new()
        })
    }

    /// Append a task. Declined for unknown slots, blank text, and unsuitable
    /// hours unless `allow_unsuitable` is set.
    pub fn add_task(
        &self,
        records: &mut [HourRecord],
        slot_id: &SlotId,
        text: &str,
        allow_unsuitable: bool,
    ) -> Result<TaskChange> {
        let Some(record) = find_slot(records, slot_id) else {
            return Ok(declined(slot_id, Declined::UnknownSlot));
        };

        if record.tier == Tier::Unsuitable && !allow_unsuitable {
            return Ok(declined(slot_id, Declined::UnsuitableHour));
        }

        let text = text.trim();
        if text.is_empty() {
            return Ok(declined(slot_id, Declined::EmptyText));
        }

        let mut updated = record.tasks.clone();
        updated.push(text.to_string());
        self.persist(slot_id, &updated)?;

        record.tasks = updated;
        record.pending_input.clear();

        debug!(slot = %slot_id, count = record.tasks.len(), "Task added");
        Ok(TaskChange::Applied)
    }

    /// Remove the task at `index` within the slot's list.
    pub fn delete_task(
        &self,
        records: &mut [HourRecord],
        slot_id: &SlotId,
        index: usize,
    ) -> Result<TaskChange> {
        let Some(record) = find_slot(records, slot_id) else {
            return Ok(declined(slot_id, Declined::UnknownSlot));
        };

        if index >= record.tasks.len() {
            return Ok(declined(slot_id, Declined::IndexOutOfRange));
        }

        let mut updated = record.tasks.clone();
        updated.remove(index);
        self.persist(slot_id, &updated)?;

        record.tasks = updated;

        debug!(slot = %slot_id, index, "Task deleted");
        Ok(TaskChange::Applied)
    }

    /// Update the transient draft of a slot. Never persisted.
    pub fn set_draft(&self, records: &mut [HourRecord], slot_id: &SlotId, text: &str) -> TaskChange {
        match find_slot(records, slot_id) {
            Some(record) => {
                record.pending_input = text.to_string();
                TaskChange::Applied
            }
            None => declined(slot_id, Declined::UnknownSlot),
        }
    }

    fn persist(&self, slot_id: &SlotId, tasks: &[String]) -> Result<()> {
        let key = slot_id.storage_key();
        if tasks.is_empty() {
            self.store.remove(&key)
        } else {
            self.store.set(&key, &serde_json::to_string(tasks)?)
        }
    }
}

fn find_slot<'a>(records: &'a mut [HourRecord], slot_id: &SlotId) -> Option<&'a mut HourRecord> {
    records.iter_mut().find(|r| &r.slot_id == slot_id)
}

fn declined(slot_id: &SlotId, reason: Declined) -> TaskChange {
    debug!(slot = %slot_id, ?reason, "Task change declined");
    TaskChange::Unchanged(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, MemoryStore};
    use crate::error::HourcastError;
    use crate::logic::normalize;
    use crate::models::{Location, RawForecast};

    /// Reads succeed, every write fails.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(HourcastError::Config("store is read-only".into()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(HourcastError::Config("store is read-only".into()))
        }
    }

    fn location() -> Location {
        Location::new("Olney", 40.04, -75.12).unwrap()
    }

    /// 09:00 good, 10:00 bad, 11:00 unsuitable (thunderstorm)
    fn sample_records<S: KeyValueStore>(tasks: &TaskStore<S>) -> Vec<HourRecord> {
        let raw = RawForecast::from_series(
            &["2024-01-01T09:00", "2024-01-01T10:00", "2024-01-01T11:00"],
            &[64.0, 42.0, 60.0],
            &[0, 61, 95],
        );
        normalize(&raw, &location(), |slot| tasks.load_tasks(slot)).unwrap()
    }

    #[test]
    fn add_task_appends_and_persists() {
        let tasks = TaskStore::new(MemoryStore::new());
        let mut records = sample_records(&tasks);
        let slot = records[0].slot_id.clone();
        tasks.set_draft(&mut records, &slot, "walk dog");

        let change = tasks.add_task(&mut records, &slot, "  walk dog  ", false).unwrap();

        assert_eq!(change, TaskChange::Applied);
        assert_eq!(records[0].tasks, vec!["walk dog"]);
        assert!(records[0].pending_input.is_empty());
        assert_eq!(
            tasks.store().get(&slot.storage_key()).unwrap().as_deref(),
            Some(r#"["walk dog"]"#)
        );
    }

    #[test]
    fn duplicate_text_is_allowed() {
        let tasks = TaskStore::new(MemoryStore::new());
        let mut records = sample_records(&tasks);
        let slot = records[1].slot_id.clone();

        tasks.add_task(&mut records, &slot, "mow", false).unwrap();
        tasks.add_task(&mut records, &slot, "mow", false).unwrap();

        assert_eq!(records[1].tasks, vec!["mow", "mow"]);
    }

    #[test]
    fn unsuitable_hour_gate() {
        let tasks = TaskStore::new(MemoryStore::new());
        let mut records = sample_records(&tasks);
        let slot = records[2].slot_id.clone();
        assert_eq!(records[2].tier, Tier::Unsuitable);

        let change = tasks.add_task(&mut records, &slot, "walk dog", false).unwrap();
        assert_eq!(change, TaskChange::Unchanged(Declined::UnsuitableHour));
        assert!(records[2].tasks.is_empty());
        assert!(tasks.store().is_empty());

        let change = tasks.add_task(&mut records, &slot, "walk dog", true).unwrap();
        assert!(change.is_applied());
        assert_eq!(records[2].tasks, vec!["walk dog"]);
        assert_eq!(
            tasks.store().get(&slot.storage_key()).unwrap().as_deref(),
            Some(r#"["walk dog"]"#)
        );
    }

    #[test]
    fn existing_unsuitable_tasks_remain_removable() {
        let tasks = TaskStore::new(MemoryStore::new());
        let mut records = sample_records(&tasks);
        let slot = records[2].slot_id.clone();
        tasks.add_task(&mut records, &slot, "a", true).unwrap();
        tasks.add_task(&mut records, &slot, "b", true).unwrap();

        // Override switched off again: tasks still show and can be deleted
        let mut reloaded = sample_records(&tasks);
        assert_eq!(reloaded[2].tasks, vec!["a", "b"]);
        let change = tasks.delete_task(&mut reloaded, &slot, 0).unwrap();
        assert!(change.is_applied());
        assert_eq!(reloaded[2].tasks, vec!["b"]);
    }

    #[test]
    fn blank_text_is_declined() {
        let tasks = TaskStore::new(MemoryStore::new());
        let mut records = sample_records(&tasks);
        let slot = records[0].slot_id.clone();
        tasks.set_draft(&mut records, &slot, "   ");

        let change = tasks.add_task(&mut records, &slot, "   ", false).unwrap();
        assert_eq!(change, TaskChange::Unchanged(Declined::EmptyText));
        assert!(records[0].tasks.is_empty());
        assert_eq!(records[0].pending_input, "   ");
    }

    #[test]
    fn unknown_slot_is_declined() {
        let tasks = TaskStore::new(MemoryStore::new());
        let mut records = sample_records(&tasks);
        let slot = SlotId::new("0.0000,0.0000", "2024-01-01T09:00");

        assert_eq!(
            tasks.add_task(&mut records, &slot, "x", true).unwrap(),
            TaskChange::Unchanged(Declined::UnknownSlot)
        );
        assert_eq!(
            tasks.delete_task(&mut records, &slot, 0).unwrap(),
            TaskChange::Unchanged(Declined::UnknownSlot)
        );
        assert_eq!(
            tasks.set_draft(&mut records, &slot, "x"),
            TaskChange::Unchanged(Declined::UnknownSlot)
        );
    }

    #[test]
    fn delete_out_of_range_is_noop() {
        let tasks = TaskStore::new(MemoryStore::new());
        let mut records = sample_records(&tasks);
        let slot = records[0].slot_id.clone();
        tasks.add_task(&mut records, &slot, "one", false).unwrap();
        tasks.add_task(&mut records, &slot, "two", false).unwrap();
        let before = records.clone();

        let change = tasks.delete_task(&mut records, &slot, 99).unwrap();

        assert_eq!(change, TaskChange::Unchanged(Declined::IndexOutOfRange));
        assert_eq!(records, before);
    }

    #[test]
    fn delete_by_position_and_remove_key_when_empty() {
        let tasks = TaskStore::new(MemoryStore::new());
        let mut records = sample_records(&tasks);
        let slot = records[0].slot_id.clone();
        tasks.add_task(&mut records, &slot, "one", false).unwrap();
        tasks.add_task(&mut records, &slot, "two", false).unwrap();

        tasks.delete_task(&mut records, &slot, 0).unwrap();
        assert_eq!(records[0].tasks, vec!["two"]);
        assert_eq!(
            tasks.store().get(&slot.storage_key()).unwrap().as_deref(),
            Some(r#"["two"]"#)
        );

        tasks.delete_task(&mut records, &slot, 0).unwrap();
        assert!(records[0].tasks.is_empty());
        assert_eq!(tasks.store().get(&slot.storage_key()).unwrap(), None);
    }

    #[test]
    fn draft_is_not_persisted() {
        let tasks = TaskStore::new(MemoryStore::new());
        let mut records = sample_records(&tasks);
        let slot = records[1].slot_id.clone();

        assert!(tasks.set_draft(&mut records, &slot, "water plants").is_applied());
        assert_eq!(records[1].pending_input, "water plants");
        assert!(tasks.store().is_empty());
    }

    #[test]
    fn corrupt_json_reads_as_empty() {
        let store = MemoryStore::new();
        let slot = SlotId::new(&location().key(), "2024-01-01T09:00");
        store.set(&slot.storage_key(), "{oops").unwrap();
        let tasks = TaskStore::new(store);

        assert!(tasks.load_tasks(&slot).is_empty());
        let records = sample_records(&tasks);
        assert!(records[0].tasks.is_empty());
    }

    #[test]
    fn tasks_reattach_after_reload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hourcast.db");

        {
            let tasks = TaskStore::new(Database::open(&path).unwrap());
            let mut records = sample_records(&tasks);
            let slot = records[1].slot_id.clone();
            tasks.add_task(&mut records, &slot, "bring umbrella", false).unwrap();
        }

        let tasks = TaskStore::new(Database::open(&path).unwrap());
        let records = sample_records(&tasks);
        assert_eq!(records[1].tasks, vec!["bring umbrella"]);
        assert!(records[0].tasks.is_empty());
    }

    #[test]
    fn failed_write_leaves_records_untouched() {
        let seeded = MemoryStore::new();
        let location = location();
        let first = SlotId::new(&location.key(), "2024-01-01T09:00");
        seeded.set(&first.storage_key(), r#"["mow"]"#).unwrap();

        let tasks = TaskStore::new(ReadOnlyStore(seeded));
        let mut records = sample_records(&tasks);
        assert_eq!(records[0].tasks, vec!["mow"]);
        tasks.set_draft(&mut records, &first, "walk dog");

        assert!(tasks.add_task(&mut records, &first, "walk dog", false).is_err());
        assert_eq!(records[0].tasks, vec!["mow"]);
        assert_eq!(records[0].pending_input, "walk dog");

        assert!(tasks.delete_task(&mut records, &first, 0).is_err());
        assert_eq!(records[0].tasks, vec!["mow"]);
        assert_eq!(tasks.load_tasks(&first), vec!["mow"]);
    }
}
