//! Asset management
//!
//! Provides handle-based storage for the creature models a companion can
//! be spawned with.

mod handle;
mod storage;

pub use handle::AssetHandle;
pub use storage::{Appearance, AppearanceCatalog, CreatureModel};
