use crate::storage::Storage;
use tracing::{error, warn};

const COUNTER_KEY: &str = "task_id_counter";

/// Hands out task ids. The counter only moves forward and the next value is
/// persisted on every allocation, so ids freed by deletion are never reissued.
#[derive(Debug)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Resume from the persisted counter, or start at 1 on the first run.
    pub fn load(storage: &impl Storage) -> Self {
        let next = match storage.read(COUNTER_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(value) => value,
                Err(_) => {
                    warn!("malformed id counter {raw:?}, restarting from 1");
                    1
                }
            },
            Ok(None) => 1,
            Err(err) => {
                warn!("could not read id counter ({err}), restarting from 1");
                1
            }
        };
        Self { next }
    }

    /// Returns the next id, persisting the incremented counter before
    /// handing the id out.
    pub fn next(&mut self, storage: &impl Storage) -> u32 {
        let id = self.next;
        self.next += 1;
        if let Err(err) = storage.write(COUNTER_KEY, &self.next.to_string()) {
            error!("failed to persist id counter: {err}");
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStorage;

    #[test]
    fn first_run_starts_at_one() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());
        let mut allocator = IdAllocator::load(&storage);
        assert_eq!(allocator.next(&storage), 1);
        assert_eq!(allocator.next(&storage), 2);
        assert_eq!(allocator.next(&storage), 3);
    }

    #[test]
    fn counter_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());
        let mut allocator = IdAllocator::load(&storage);
        allocator.next(&storage);
        allocator.next(&storage);

        let mut resumed = IdAllocator::load(&storage);
        assert_eq!(resumed.next(&storage), 3);
    }

    #[test]
    fn malformed_counter_restarts_from_one() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());
        storage.write(COUNTER_KEY, "not a number").unwrap();
        let mut allocator = IdAllocator::load(&storage);
        assert_eq!(allocator.next(&storage), 1);
    }

    #[test]
    fn counter_is_persisted_as_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());
        let mut allocator = IdAllocator::load(&storage);
        allocator.next(&storage);
        assert_eq!(storage.read(COUNTER_KEY).unwrap().unwrap(), "2");
    }
}
