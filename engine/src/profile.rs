//! Profiles: complete alternate sets of layers.

use crate::action::Action;
use crate::layer::{LayerTable, LayeredKeymap, ProfiledLayers};

pub type ProfileCallback<H> = Box<dyn FnMut(&LayeredKeymap<H>)>;

/// All profiles, with the active one and the one before it (single-slot history, like
/// [`LayerTable`]).
pub struct ProfileTable<H> {
    profiles: ProfiledLayers<H>,
    active: usize,
    previous: usize,
    on_change: Option<ProfileCallback<H>>,
}

impl<H> ProfileTable<H> {
    pub fn new(profiles: ProfiledLayers<H>) -> Self {
        Self {
            profiles,
            active: 0,
            previous: 0,
            on_change: None,
        }
    }

    pub fn set_callback(&mut self, on_change: Option<ProfileCallback<H>>) {
        self.on_change = on_change;
    }

    /// Activates `profile`: its grid is installed into `layers`, which rebinds every slot.
    /// Out of range profiles are ignored.
    pub fn set(
        &mut self,
        profile: usize,
        layers: &mut LayerTable<H>,
        slots: &mut [Option<Action<H>>],
    ) {
        let Some(grid) = self.profiles.get(profile) else {
            log::debug!(
                "ignoring switch to profile {profile}, only {} exist",
                self.profiles.len()
            );
            return;
        };
        self.previous = self.active;
        self.active = profile;
        layers.install(grid.clone(), slots);
        log::info!("profile {} -> {}", self.previous, self.active);
        if let Some(on_change) = &mut self.on_change {
            on_change(grid);
        }
    }

    pub fn reset(&mut self, layers: &mut LayerTable<H>, slots: &mut [Option<Action<H>>]) {
        self.set(self.previous, layers, slots);
    }

    pub fn get(&self) -> usize {
        self.active
    }

    pub fn previous(&self) -> usize {
        self.previous
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
