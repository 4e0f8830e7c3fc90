//! The tick loop tying scanning, classification, actions and deferred tasks together.

use crate::action::{Ctx, Deferred};
use crate::bindings::{Bindings, LayoutError};
use crate::key::{Event, Key, Thresholds, Timestamp};
use crate::layer::{LayeredKeymap, ProfiledLayers};
use crate::matrix::{KeyBits, KeyReader};
use crate::scheduler::DeferredScheduler;

/// A macro pad: `R` scans the keys, `H` is the host that actions send their output to.
///
/// Each [`tick`](MacroPad::tick) runs three phases in a fixed order:
///
/// 1. every key is updated with its raw sample,
/// 2. every key's bound action is invoked,
/// 3. deferred tasks that are due are run.
///
/// All keys are classified before any action runs, so an action always sees this tick's state
/// of its sibling keys. An action that switches layers during phase 2 changes what the keys
/// after it dispatch in the same tick.
pub struct MacroPad<R, H> {
    reader: R,
    keys: Vec<Key>,
    thresholds: Thresholds,
    bindings: Bindings<H>,
    scheduler: DeferredScheduler<Deferred<H>>,
    host: H,
    now: Timestamp,
}

impl<R: KeyReader, H> MacroPad<R, H> {
    /// Builds the pad on profile 0, layer 0. Every keymap must have one entry per key the
    /// reader scans.
    pub fn new(
        reader: R,
        host: H,
        thresholds: Thresholds,
        profiles: ProfiledLayers<H>,
    ) -> Result<Self, LayoutError> {
        let bindings = Bindings::new(profiles, reader.key_count())?;
        Self::with_bindings(reader, host, thresholds, bindings)
    }

    pub fn with_bindings(
        reader: R,
        host: H,
        thresholds: Thresholds,
        bindings: Bindings<H>,
    ) -> Result<Self, LayoutError> {
        let key_count = reader.key_count();
        if bindings.key_count() != key_count {
            return Err(LayoutError::ReaderKeyCount {
                expected: bindings.key_count(),
                found: key_count,
            });
        }
        let keys = (0..key_count)
            .map(|i| {
                let index = u16::try_from(i)
                    .map_err(|_| LayoutError::TooManyKeys { found: key_count })?;
                let mut key = Key::new();
                key.set_index(index);
                Ok(key)
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;
        log::debug!("macro pad with {key_count} keys, {thresholds:?}");
        Ok(Self {
            reader,
            keys,
            thresholds,
            bindings,
            scheduler: DeferredScheduler::new(),
            host,
            now: 0,
        })
    }

    /// Scans the keys and runs one tick at `now`.
    ///
    /// A scan error aborts the tick before any key is touched.
    pub fn tick(&mut self, now: Timestamp) -> Result<(), R::Error> {
        let raw = self.reader.read()?;
        self.tick_with(&raw, now);
        Ok(())
    }

    /// Runs one tick at `now` with samples that were obtained elsewhere.
    pub fn tick_with(&mut self, raw: &KeyBits, now: Timestamp) {
        self.now = now;
        for (i, key) in self.keys.iter_mut().enumerate() {
            key.update(raw.get(i), now, &self.thresholds);
        }
        for i in 0..self.keys.len() {
            self.invoke(i);
        }
        self.service();
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

impl<R, H> MacroPad<R, H> {
    /// Calls the action bound to key `index` with the key's current state. Unbound keys and
    /// out of range indexes do nothing.
    pub fn invoke(&mut self, index: usize) {
        let Some(key) = self.keys.get(index).copied() else {
            return;
        };
        let Some(action) = self.bindings.slot(index).cloned() else {
            return;
        };
        let mut ctx = Ctx::new(
            self.now,
            &mut self.host,
            &mut self.bindings,
            &mut self.scheduler,
        );
        action(&key, &mut ctx);
    }

    fn service(&mut self) {
        let Self {
            host,
            bindings,
            scheduler,
            now,
            ..
        } = self;
        let now = *now;
        scheduler.service(now, |task, scheduler| {
            let mut ctx = Ctx::new(now, &mut *host, &mut *bindings, scheduler);
            task(&mut ctx);
        });
    }

    /// Runs `task` once `delay` milliseconds have passed since the last tick.
    pub fn schedule(&mut self, delay: u32, task: impl FnOnce(&mut Ctx<'_, H>) + 'static) {
        self.scheduler.schedule(self.now, delay, Box::new(task));
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Marks `event` as occurred on key `index` for the current tick. Call
    /// [`invoke`](MacroPad::invoke) to have the key's action see it.
    pub fn emulate(&mut self, index: usize, event: Event) {
        if let Some(key) = self.keys.get_mut(index) {
            key.emulate(event);
        }
    }

    pub fn key(&self, index: usize) -> Option<&Key> {
        self.keys.get(index)
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// The timestamp of the last tick.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
    }

    pub fn layer(&self) -> usize {
        self.bindings.layer()
    }

    pub fn set_layer(&mut self, layer: usize) {
        self.bindings.set_layer(layer);
    }

    pub fn reset_layer(&mut self) {
        self.bindings.reset_layer();
    }

    pub fn profile(&self) -> usize {
        self.bindings.profile()
    }

    pub fn set_profile(&mut self, profile: usize) {
        self.bindings.set_profile(profile);
    }

    pub fn reset_profile(&mut self) {
        self.bindings.reset_profile();
    }

    pub fn on_layer_change(&mut self, f: impl FnMut(usize) + 'static) {
        self.bindings.on_layer_change(f);
    }

    pub fn on_profile_change(&mut self, f: impl FnMut(&LayeredKeymap<H>) + 'static) {
        self.bindings.on_profile_change(f);
    }

    pub fn bindings(&self) -> &Bindings<H> {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings<H> {
        &mut self.bindings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
