//! Test doubles shared across modules.

use awb_core::{OptionStore, StoreError};
use mockall::mock;

mock! {
    pub Store {}
    impl OptionStore for Store {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
        fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
        fn delete(&self, key: &str) -> Result<bool, StoreError>;
    }
}
