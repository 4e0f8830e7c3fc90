//! The per-key action slots together with the layer and profile tables that fill them.

use thiserror::Error;

use crate::action::Action;
use crate::layer::{LayerCallback, LayerTable, LayeredKeymap, ProfiledLayers};
use crate::profile::{ProfileCallback, ProfileTable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("at least one profile with at least one layer is required")]
    Empty,
    #[error("profile {profile} has {found} layers, expected {expected}")]
    LayerCount {
        profile: usize,
        expected: usize,
        found: usize,
    },
    #[error("profile {profile} layer {layer} has {found} keys, expected {expected}")]
    KeyCount {
        profile: usize,
        layer: usize,
        expected: usize,
        found: usize,
    },
    #[error("the key reader scans {found} keys, expected {expected}")]
    ReaderKeyCount { expected: usize, found: usize },
    #[error("{found} keys do not fit a 16-bit key index")]
    TooManyKeys { found: usize },
}

/// What each key currently does.
///
/// Slots are rebound in place on every layer or profile switch. The slots start out bound to
/// layer 0 of profile 0.
pub struct Bindings<H> {
    slots: Vec<Option<Action<H>>>,
    layers: LayerTable<H>,
    profiles: ProfileTable<H>,
}

impl<H> Bindings<H> {
    /// Checks that every profile has the same number of layers and that every layer has exactly
    /// `key_count` entries.
    pub fn new(profiles: ProfiledLayers<H>, key_count: usize) -> Result<Self, LayoutError> {
        let expected_layers = match profiles.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(LayoutError::Empty),
        };
        for (p, grid) in profiles.iter().enumerate() {
            if grid.len() != expected_layers {
                return Err(LayoutError::LayerCount {
                    profile: p,
                    expected: expected_layers,
                    found: grid.len(),
                });
            }
            for (l, keymap) in grid.iter().enumerate() {
                if keymap.len() != key_count {
                    return Err(LayoutError::KeyCount {
                        profile: p,
                        layer: l,
                        expected: key_count,
                        found: keymap.len(),
                    });
                }
            }
        }

        let mut slots = vec![None; key_count];
        let mut layers = LayerTable::new(Vec::new());
        layers.install(profiles[0].clone(), &mut slots);
        log::debug!(
            "bindings for {key_count} keys, {expected_layers} layers, {} profiles",
            profiles.len()
        );
        Ok(Self {
            slots,
            layers,
            profiles: ProfileTable::new(profiles),
        })
    }

    /// A single-profile layout.
    pub fn from_layers(layers: LayeredKeymap<H>, key_count: usize) -> Result<Self, LayoutError> {
        Self::new(vec![layers], key_count)
    }

    pub fn on_layer_change(&mut self, f: impl FnMut(usize) + 'static) {
        let cb: LayerCallback = Box::new(f);
        self.layers.set_callback(Some(cb));
    }

    pub fn on_profile_change(&mut self, f: impl FnMut(&LayeredKeymap<H>) + 'static) {
        let cb: ProfileCallback<H> = Box::new(f);
        self.profiles.set_callback(Some(cb));
    }

    pub fn set_layer(&mut self, layer: usize) {
        self.layers.set(layer, &mut self.slots);
    }

    pub fn reset_layer(&mut self) {
        self.layers.reset(&mut self.slots);
    }

    pub fn layer(&self) -> usize {
        self.layers.get()
    }

    pub fn previous_layer(&self) -> usize {
        self.layers.previous()
    }

    pub fn set_profile(&mut self, profile: usize) {
        self.profiles.set(profile, &mut self.layers, &mut self.slots);
    }

    pub fn reset_profile(&mut self) {
        self.profiles.reset(&mut self.layers, &mut self.slots);
    }

    pub fn profile(&self) -> usize {
        self.profiles.get()
    }

    pub fn previous_profile(&self) -> usize {
        self.profiles.previous()
    }

    /// The action bound to key `index`, if any.
    pub fn slot(&self, index: usize) -> Option<&Action<H>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Binds an action directly, until the next layer or profile switch.
    pub fn bind(&mut self, index: usize, action: Action<H>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(action);
        }
    }

    pub fn unbind(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    pub fn key_count(&self) -> usize {
        self.slots.len()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    /// The layer grid of the active profile.
    pub fn layers(&self) -> &LayeredKeymap<H> {
        self.layers.layers()
    }
}
