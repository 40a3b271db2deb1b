pub mod file;
pub mod memory;

use std::path;
use std::sync::Arc;

use crate::domain::models::StoreBox;
use crate::domain::models::StoreName;

pub struct StoreManager {}

impl StoreManager {
    /// `file_path` only applies to the file store. An empty path uses the
    /// default cache location.
    pub fn get(name: StoreName, file_path: &str) -> StoreBox {
        if name == StoreName::Memory {
            return Arc::<memory::MemoryStore>::default();
        }

        if file_path.is_empty() {
            return Arc::<file::FileStore>::default();
        }

        return Arc::new(file::FileStore::new(path::PathBuf::from(file_path)));
    }
}
