//! Layers: alternate binding grids, one of which is active at a time.

use crate::action::Action;

/// One binding per key, indexed by key index. `None` is an unbound key.
pub type Keymap<H> = Vec<Option<Action<H>>>;

/// One [`Keymap`] per layer.
pub type LayeredKeymap<H> = Vec<Keymap<H>>;

/// One [`LayeredKeymap`] per profile.
pub type ProfiledLayers<H> = Vec<LayeredKeymap<H>>;

pub type LayerCallback = Box<dyn FnMut(usize)>;

/// The layer grid of the active profile, with the active layer and the one before it.
///
/// The history is a single slot, not a stack: after two [`set`](LayerTable::set) calls,
/// [`reset`](LayerTable::reset) goes back to the first call's target.
pub struct LayerTable<H> {
    layers: LayeredKeymap<H>,
    active: usize,
    previous: usize,
    on_change: Option<LayerCallback>,
}

impl<H> LayerTable<H> {
    pub fn new(layers: LayeredKeymap<H>) -> Self {
        Self {
            layers,
            active: 0,
            previous: 0,
            on_change: None,
        }
    }

    pub fn set_callback(&mut self, on_change: Option<LayerCallback>) {
        self.on_change = on_change;
    }

    /// Activates `layer` and rebinds every slot to it. Out of range layers are ignored.
    pub fn set(&mut self, layer: usize, slots: &mut [Option<Action<H>>]) {
        let Some(keymap) = self.layers.get(layer) else {
            log::debug!(
                "ignoring switch to layer {layer}, only {} exist",
                self.layers.len()
            );
            return;
        };
        self.previous = self.active;
        self.active = layer;
        bind_all(slots, keymap);
        log::info!("layer {} -> {}", self.previous, self.active);
        if let Some(on_change) = &mut self.on_change {
            on_change(layer);
        }
    }

    /// Goes back to the layer that was active before the last [`set`](LayerTable::set).
    pub fn reset(&mut self, slots: &mut [Option<Action<H>>]) {
        self.set(self.previous, slots);
    }

    /// Replaces the whole grid and rebinds the slots to the active layer of the new grid.
    ///
    /// The active/previous indexes are kept; no layer notification is sent.
    pub(crate) fn install(&mut self, layers: LayeredKeymap<H>, slots: &mut [Option<Action<H>>]) {
        self.layers = layers;
        if self.active >= self.layers.len() {
            self.active = 0;
        }
        if self.previous >= self.layers.len() {
            self.previous = 0;
        }
        if let Some(keymap) = self.layers.get(self.active) {
            bind_all(slots, keymap);
        }
    }

    pub fn get(&self) -> usize {
        self.active
    }

    pub fn previous(&self) -> usize {
        self.previous
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &LayeredKeymap<H> {
        &self.layers
    }
}

fn bind_all<H>(slots: &mut [Option<Action<H>>], keymap: &Keymap<H>) {
    for (slot, binding) in slots.iter_mut().zip(keymap.iter()) {
        slot.clone_from(binding);
    }
}
