use std::sync::Arc;

use crate::{db::KeyValueStore, errors::AppResult, models::domain::QuestionRecord};

pub const DEFAULT_STORAGE_KEY: &str = "quiz_questions";

#[cfg_attr(test, mockall::automock)]
pub trait QuestionRepository: Send + Sync {
    /// Replaces whatever list was stored before.
    fn save(&self, records: &[QuestionRecord]) -> AppResult<()>;
    /// Missing or unreadable data comes back as an empty list.
    fn load_all(&self) -> Vec<QuestionRecord>;
    fn clear(&self) -> AppResult<()>;
}

/// Sole owner of one key in the backing store.
pub struct KeyValueQuestionRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KeyValueQuestionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl QuestionRepository for KeyValueQuestionRepository {
    fn save(&self, records: &[QuestionRecord]) -> AppResult<()> {
        let payload = serde_json::to_string(records)?;
        self.store.put(&self.key, &payload)?;
        log::info!("Saved {} question(s) under '{}'", records.len(), self.key);
        Ok(())
    }

    fn load_all(&self) -> Vec<QuestionRecord> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Could not read '{}', treating as empty: {}", self.key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<QuestionRecord>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Stored questions under '{}' are unreadable: {}", self.key, e);
                Vec::new()
            }
        }
    }

    fn clear(&self) -> AppResult<()> {
        self.store.remove(&self.key)?;
        log::info!("Cleared stored questions under '{}'", self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{InMemoryKeyValueStore, MockKeyValueStore},
        errors::AppError,
        test_utils::fixtures,
    };

    #[test]
    fn test_save_then_load_round_trips() {
        let repository = KeyValueQuestionRepository::new(Arc::new(InMemoryKeyValueStore::new()));
        let records = fixtures::sample_records();

        repository.save(&records).unwrap();

        assert_eq!(repository.load_all(), records);
    }

    #[test]
    fn test_save_replaces_previous_list() {
        let repository = KeyValueQuestionRepository::new(Arc::new(InMemoryKeyValueStore::new()));
        let records = fixtures::sample_records();

        repository.save(&records).unwrap();
        repository.save(&records[..1]).unwrap();

        assert_eq!(repository.load_all(), records[..1].to_vec());
    }

    #[test]
    fn test_load_without_data_is_empty() {
        let repository = KeyValueQuestionRepository::new(Arc::new(InMemoryKeyValueStore::new()));
        assert!(repository.load_all().is_empty());
    }

    #[test]
    fn test_corrupt_payload_is_swallowed() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        store.put(DEFAULT_STORAGE_KEY, "{ definitely not a list").unwrap();
        let repository = KeyValueQuestionRepository::new(store);

        assert!(repository.load_all().is_empty());
    }

    #[test]
    fn test_store_read_failure_is_swallowed() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(AppError::Storage("disk gone".to_string())));
        let repository = KeyValueQuestionRepository::new(Arc::new(store));

        assert!(repository.load_all().is_empty());
    }

    #[test]
    fn test_clear_removes_only_its_key() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        store.put("unrelated", "keep me").unwrap();
        let repository = KeyValueQuestionRepository::with_key(store.clone(), "quiz");

        repository.save(&fixtures::sample_records()).unwrap();
        repository.clear().unwrap();

        assert!(repository.load_all().is_empty());
        assert_eq!(store.get("unrelated").unwrap().as_deref(), Some("keep me"));
    }

    #[test]
    fn test_save_propagates_store_write_failure() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_put()
            .times(1)
            .returning(|_, _| Err(AppError::Storage("read-only".to_string())));
        let repository = KeyValueQuestionRepository::new(Arc::new(store));

        let err = repository.save(&fixtures::sample_records()).unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
