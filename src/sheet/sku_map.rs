//! SKU display-name to catalog-id mapping, loaded once per batch and
//! injected into config building.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::store::{Sheet, SheetStore, StoreError};

const SEED_SKU_NAME: &str = "Business Starter";
const SEED_SKU_ID: &str = "1010020027";

#[derive(Debug, Clone, Default)]
pub struct SkuMap {
    entries: HashMap<String, String>,
}

impl SkuMap {
    /// Case-insensitive lookup by display name.
    pub fn resolve(&self, sku_name: &str) -> Option<&str> {
        self.entries
            .get(&sku_name.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn insert(&mut self, sku_name: &str, sku_id: &str) {
        self.entries
            .insert(sku_name.trim().to_lowercase(), sku_id.trim().to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct SkuMapStore;

impl SkuMapStore {
    /// Load the SKU map, seeding the backing file with one example entry
    /// when it does not exist yet so operators see the expected shape.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SkuMap, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            SheetStore::create(path, Self::seed_sheet())?;
        }

        let store = SheetStore::open(path)?;
        let mut map = SkuMap::default();
        for row in store.rows() {
            let name = row.get("skuName");
            let id = row.get("skuId");
            if !name.is_empty() && !id.is_empty() {
                map.insert(name, id);
            }
        }
        Ok(map)
    }

    fn seed_sheet() -> Sheet {
        let mut row = BTreeMap::new();
        row.insert("skuName".to_string(), SEED_SKU_NAME.to_string());
        row.insert("skuId".to_string(), SEED_SKU_ID.to_string());
        Sheet {
            columns: vec!["skuName".to_string(), "skuId".to_string()],
            rows: vec![row],
        }
    }
}
