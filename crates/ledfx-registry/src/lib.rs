//! Effect registry for LedFx.
//!
//! This crate provides the lookup surface for pluggable visual effects: which
//! effect type identifiers exist and, for each one, the [`Schema`] its
//! configuration must satisfy. Configuration code consumes it through the
//! [`EffectRegistry`] trait so that tests can inject their own registries.
//!
//! # Features
//!
//! - **Effect Discovery**: List all known effect ids with metadata
//! - **Schema Introspection**: Field schemas for preset and scene sanitization
//! - **Category System**: Effects organized the way the LedFx UI groups them
//!
//! # Example
//!
//! ```rust
//! use ledfx_registry::{EffectRegistry, StaticRegistry, EffectCategory};
//!
//! let registry = StaticRegistry::new();
//!
//! assert!(registry.effect_ids().contains(&"rainbow"));
//!
//! let schema = registry.field_schema("rainbow").unwrap();
//! assert!(schema.contains("speed"));
//!
//! for effect in registry.effects_in_category(EffectCategory::NonReactive) {
//!     println!("{}: {}", effect.id, effect.name);
//! }
//! ```

mod builtin;

use ledfx_schema::Schema;

/// Lookup surface over the set of known effect types.
///
/// Implemented by [`StaticRegistry`] and by stubs in tests.
pub trait EffectRegistry {
    /// Identifiers of every registered effect type.
    fn effect_ids(&self) -> Vec<&str>;

    /// Configuration schema of the effect `id`, if registered.
    fn field_schema(&self, id: &str) -> Option<&Schema>;

    /// Whether `id` is a registered effect type.
    fn contains(&self, id: &str) -> bool {
        self.field_schema(id).is_some()
    }
}

/// Category of effect for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Effects that ignore audio input (solid colours, gradients, rainbows)
    NonReactive,
    /// Classic audio-reactive effects driven by the melbank
    Classic,
    /// Beat-synchronised effects
    Bpm,
    /// Slow, ambient audio-reactive effects
    Atmospheric,
}

impl EffectCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectCategory::NonReactive => "Non-Reactive",
            EffectCategory::Classic => "Classic",
            EffectCategory::Bpm => "BPM",
            EffectCategory::Atmospheric => "Atmospheric",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            EffectCategory::NonReactive => "Static and animated effects that do not use audio",
            EffectCategory::Classic => "Frequency-band driven audio-reactive effects",
            EffectCategory::Bpm => "Effects synchronised to the detected beat",
            EffectCategory::Atmospheric => "Slow-moving ambient audio-reactive effects",
        }
    }
}

/// Describes an effect type in the registry.
#[derive(Debug, Clone)]
pub struct EffectDescriptor {
    /// Unique identifier, as stored in presets and scenes.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the effect.
    pub description: &'static str,
    /// Category for organization.
    pub category: EffectCategory,
    /// Schema of the effect's configuration.
    pub schema: Schema,
}

/// Registry backed by a fixed list of effect descriptors.
///
/// [`StaticRegistry::new`] registers the built-in effects;
/// [`StaticRegistry::empty`] plus [`StaticRegistry::with_effect`] builds a
/// custom set.
#[derive(Debug, Clone)]
pub struct StaticRegistry {
    entries: Vec<EffectDescriptor>,
}

impl Default for StaticRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticRegistry {
    /// Create a registry with all built-in effects registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for descriptor in builtin::descriptors() {
            registry.register(descriptor);
        }
        registry
    }

    /// Create a registry with no effects.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an effect, replacing any existing effect with the same id.
    pub fn with_effect(mut self, descriptor: EffectDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Register an effect with the registry.
    pub fn register(&mut self, descriptor: EffectDescriptor) {
        self.entries.retain(|e| e.id != descriptor.id);
        self.entries.push(descriptor);
    }

    /// Returns descriptors for all registered effects.
    pub fn all_effects(&self) -> Vec<&EffectDescriptor> {
        self.entries.iter().collect()
    }

    /// Returns descriptors for effects in a specific category.
    pub fn effects_in_category(&self, category: EffectCategory) -> Vec<&EffectDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Get a descriptor by effect ID.
    pub fn get(&self, id: &str) -> Option<&EffectDescriptor> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Returns the number of registered effects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no effects are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EffectRegistry for StaticRegistry {
    fn effect_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id).collect()
    }

    fn field_schema(&self, id: &str) -> Option<&Schema> {
        self.get(id).map(|e| &e.schema)
    }
}
