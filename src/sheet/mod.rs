pub mod sku_map;
pub mod store;

pub use sku_map::{SkuMap, SkuMapStore};
pub use store::{Row, Sheet, SheetStore, StoreError, RESULT_COLUMNS};
