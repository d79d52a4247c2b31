//! Appearance catalog
//!
//! Holds the creature models the host has made available, keyed by model
//! name. Spawning looks the configured [`Appearance`] up here.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::handle::AssetHandle;
use crate::animation::AnimationClip;

/// Selectable companion looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Appearance {
    /// Plain black cat
    BlackCat,
    /// White cat with spots
    WhiteSpottedCat,
    /// Gray tabby
    #[default]
    GrayTabbyCat,
    /// Orange tabby
    OrangeTabbyCat,
}

impl Appearance {
    /// Every appearance, in menu order
    pub const ALL: [Self; 4] = [
        Self::BlackCat,
        Self::WhiteSpottedCat,
        Self::GrayTabbyCat,
        Self::OrangeTabbyCat,
    ];

    /// Name of the rigged model backing this appearance
    #[must_use]
    pub const fn model_name(self) -> &'static str {
        match self {
            Self::BlackCat => "CatSimpleBlack_rigged",
            Self::WhiteSpottedCat => "CatSimpleWhiteSpotted_rigged",
            Self::GrayTabbyCat => "CatSimpleGray_rigged",
            Self::OrangeTabbyCat => "CatSimpleYellow_rigged",
        }
    }
}

/// A rigged creature model and the two clips the companion drives
#[derive(Debug, Clone)]
pub struct CreatureModel {
    /// Model name
    pub name: String,
    /// Clip played while standing still
    pub idle_clip: AnimationClip,
    /// Clip played while moving
    pub move_clip: AnimationClip,
}

impl CreatureModel {
    /// Create a model description
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        idle_clip: AnimationClip,
        move_clip: AnimationClip,
    ) -> Self {
        Self {
            name: name.into(),
            idle_clip,
            move_clip,
        }
    }

    /// Stock cat rig: a 2.4 s sit/groom loop and a 1 s walk cycle
    #[must_use]
    pub fn cat(name: impl Into<String>) -> Self {
        Self::new(
            name,
            AnimationClip::new("idle", 2.4),
            AnimationClip::new("move", 1.0),
        )
    }
}

/// Name-indexed storage of creature models
#[derive(Debug, Default)]
pub struct AppearanceCatalog {
    /// Models indexed by model name
    models: FxHashMap<String, AssetHandle<CreatureModel>>,
}

impl AppearanceCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the stock model for every [`Appearance`]
    #[must_use]
    pub fn with_default_cats() -> Self {
        let mut catalog = Self::new();
        for appearance in Appearance::ALL {
            catalog.add(CreatureModel::cat(appearance.model_name()));
        }
        catalog
    }

    /// Register a model, returning its handle.
    ///
    /// A model with the same name that is already registered is kept and
    /// its handle returned instead.
    pub fn add(&mut self, model: CreatureModel) -> AssetHandle<CreatureModel> {
        self.models
            .entry(model.name.clone())
            .or_insert_with(|| AssetHandle::new(model))
            .clone()
    }

    /// Look up a model by name
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<AssetHandle<CreatureModel>> {
        self.models.get(name).cloned()
    }

    /// Look up the model for an appearance
    #[must_use]
    pub fn model_for(&self, appearance: Appearance) -> Option<AssetHandle<CreatureModel>> {
        self.get_by_name(appearance.model_name())
    }

    /// Remove a model by name
    ///
    /// Returns true if the model was removed
    pub fn remove(&mut self, name: &str) -> bool {
        self.models.remove(name).is_some()
    }

    /// Get the number of stored models
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Clear all models
    pub fn clear(&mut self) {
        self.models.clear();
    }
}
