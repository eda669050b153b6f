//! Client roster repository
//!
//! Manages loading and saving the client roster to clients.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TrailError;
use crate::models::{Client, ClientId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable roster file structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RosterData {
    clients: Vec<Client>,
}

/// Repository for client persistence
pub struct RosterStore {
    path: PathBuf,
    data: RwLock<HashMap<ClientId, Client>>,
}

impl RosterStore {
    /// Create a new roster store backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load the roster from disk
    pub fn load(&self) -> Result<(), TrailError> {
        let file_data: RosterData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for client in file_data.clients {
            data.insert(client.id, client);
        }

        Ok(())
    }

    /// Save the roster to disk
    pub fn save(&self) -> Result<(), TrailError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut clients: Vec<_> = data.values().cloned().collect();
        clients.sort_by_key(|c| c.id);

        write_json_atomic(&self.path, &RosterData { clients })
    }

    /// Get a client by id
    pub fn get(&self, id: ClientId) -> Result<Option<Client>, TrailError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all clients, ordered by id
    pub fn get_all(&self) -> Result<Vec<Client>, TrailError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut clients: Vec<_> = data.values().cloned().collect();
        clients.sort_by_key(|c| c.id);
        Ok(clients)
    }

    /// Get a client by trading code (case-insensitive)
    pub fn get_by_trading_code(&self, code: &str) -> Result<Option<Client>, TrailError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let code_upper = code.trim().to_uppercase();
        Ok(data
            .values()
            .find(|c| c.trading_code.to_uppercase() == code_upper)
            .cloned())
    }

    /// Insert or update a client
    pub fn upsert(&self, client: Client) -> Result<(), TrailError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(client.id, client);
        Ok(())
    }

    /// Delete a client
    pub fn delete(&self, id: ClientId) -> Result<bool, TrailError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Check if a client exists
    pub fn exists(&self, id: ClientId) -> Result<bool, TrailError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&id))
    }

    /// Check if a trading code is already taken
    pub fn trading_code_exists(
        &self,
        code: &str,
        exclude_id: Option<ClientId>,
    ) -> Result<bool, TrailError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let code_upper = code.trim().to_uppercase();
        Ok(data
            .values()
            .any(|c| c.trading_code.to_uppercase() == code_upper && Some(c.id) != exclude_id))
    }

    /// Next free roster id: one past the highest sequence in use
    pub fn next_id(&self) -> Result<ClientId, TrailError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let max_seq = data.keys().map(|id| id.seq()).max().unwrap_or(0);
        Ok(ClientId::from_seq(max_seq + 1))
    }

    /// Count clients
    pub fn count(&self) -> Result<usize, TrailError> {
        let data = self
            .data
            .read()
            .map_err(|e| TrailError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, RosterStore) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clients.json");
        let store = RosterStore::new(path);
        (temp_dir, store)
    }

    fn client(seq: u32, code: &str) -> Client {
        Client::new(ClientId::from_seq(seq), code, format!("Client {}", seq), "01712345678")
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();

        store.upsert(client(1, "ACME")).unwrap();

        let retrieved = store.get(ClientId::from_seq(1)).unwrap().unwrap();
        assert_eq!(retrieved.trading_code, "ACME");
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, store) = create_test_store();
        store.load().unwrap();
        store.upsert(client(1, "ACME")).unwrap();
        store.save().unwrap();

        let store2 = RosterStore::new(temp_dir.path().join("clients.json"));
        store2.load().unwrap();

        let retrieved = store2.get(ClientId::from_seq(1)).unwrap().unwrap();
        assert_eq!(retrieved.trading_code, "ACME");
    }

    #[test]
    fn test_get_all_sorted_by_id() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();

        store.upsert(client(10, "TEN")).unwrap();
        store.upsert(client(2, "TWO")).unwrap();
        store.upsert(client(9, "NINE")).unwrap();

        let all = store.get_all().unwrap();
        let seqs: Vec<u32> = all.iter().map(|c| c.id.seq()).collect();
        assert_eq!(seqs, [2, 9, 10]);
    }

    #[test]
    fn test_get_by_trading_code_is_case_insensitive() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();

        store.upsert(client(1, "ACME")).unwrap();

        let found = store.get_by_trading_code("acme").unwrap();
        assert!(found.is_some());
        assert!(store.get_by_trading_code("OTHER").unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();

        store.upsert(client(1, "ACME")).unwrap();
        assert!(store.exists(ClientId::from_seq(1)).unwrap());

        assert!(store.delete(ClientId::from_seq(1)).unwrap());
        assert!(!store.exists(ClientId::from_seq(1)).unwrap());
        assert!(!store.delete(ClientId::from_seq(1)).unwrap());
    }

    #[test]
    fn test_trading_code_exists() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();

        store.upsert(client(1, "ACME")).unwrap();

        assert!(store.trading_code_exists("acme", None).unwrap());
        assert!(!store
            .trading_code_exists("acme", Some(ClientId::from_seq(1)))
            .unwrap());
        assert!(!store.trading_code_exists("OTHER", None).unwrap());
    }

    #[test]
    fn test_next_id_skips_past_highest_in_use() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();

        assert_eq!(store.next_id().unwrap(), ClientId::from_seq(1));

        store.upsert(client(1, "A")).unwrap();
        store.upsert(client(5, "B")).unwrap();
        assert_eq!(store.next_id().unwrap(), ClientId::from_seq(6));
    }
}
