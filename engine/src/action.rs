//! Actions bound to keys, the context they run in, and builders for the common ones.
//!
//! An [`Action`] is called once per tick for the key it is bound to, with a snapshot of that
//! key. It decides what to do from the key's events, e.g. [`press_to`] presses a host key on
//! the rising edge and releases it on the falling edge.

use std::rc::Rc;

use crate::bindings::Bindings;
use crate::key::{Event, Key, Timestamp};
use crate::scheduler::DeferredScheduler;

/// Something a key does. `H` is the host the action talks to (e.g. a HID report builder).
pub type Action<H> = Rc<dyn Fn(&Key, &mut Ctx<'_, H>)>;

/// A one-shot task run later by the [`DeferredScheduler`].
pub type Deferred<H> = Box<dyn FnOnce(&mut Ctx<'_, H>)>;

/// Host side of "press this key": whatever turns key codes into reports.
pub trait KeyOutput {
    type Code: Clone + 'static;

    fn press(&mut self, code: Self::Code);
    fn release(&mut self, code: Self::Code);
}

/// Everything an action may touch while it runs.
pub struct Ctx<'a, H> {
    now: Timestamp,
    host: &'a mut H,
    bindings: &'a mut Bindings<H>,
    scheduler: &'a mut DeferredScheduler<Deferred<H>>,
}

impl<'a, H> Ctx<'a, H> {
    pub fn new(
        now: Timestamp,
        host: &'a mut H,
        bindings: &'a mut Bindings<H>,
        scheduler: &'a mut DeferredScheduler<Deferred<H>>,
    ) -> Self {
        Self {
            now,
            host,
            bindings,
            scheduler,
        }
    }

    /// The timestamp of the tick being processed.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn host(&mut self) -> &mut H {
        self.host
    }

    /// Runs `f` once `delay` milliseconds have passed. It always runs in a later scheduler pass
    /// than the current one, even with a zero delay.
    pub fn after(&mut self, delay: u32, f: impl FnOnce(&mut Ctx<'_, H>) + 'static) {
        self.scheduler.schedule(self.now, delay, Box::new(f));
    }

    /// Number of tasks waiting in the scheduler.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
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

    pub fn bindings(&mut self) -> &mut Bindings<H> {
        self.bindings
    }
}

/// Wraps a closure into an [`Action`].
pub fn action<H, F>(f: F) -> Action<H>
where
    F: Fn(&Key, &mut Ctx<'_, H>) + 'static,
{
    Rc::new(f)
}

/// Runs `f` on every tick in which `event` occurred.
pub fn on<H, F>(event: Event, f: F) -> Action<H>
where
    F: Fn(&mut Ctx<'_, H>) + 'static,
{
    action(move |key, ctx| {
        if key.has_occurred(event) {
            f(ctx);
        }
    })
}

/// Holds the host key `code` down for as long as the key is pressed.
pub fn press_to<H: KeyOutput>(code: H::Code) -> Action<H> {
    action(move |key, ctx: &mut Ctx<'_, H>| {
        if key.has_occurred(Event::RisingEdge) {
            ctx.host().press(code.clone());
        } else if key.has_occurred(Event::FallingEdge) {
            ctx.host().release(code.clone());
        }
    })
}

/// Switches to `layer` when the key goes down.
pub fn layer_to<H>(layer: usize) -> Action<H> {
    on(Event::RisingEdge, move |ctx| ctx.set_layer(layer))
}

/// Switches to `layer` when the key comes back up.
pub fn layer_back<H>(layer: usize) -> Action<H> {
    on(Event::FallingEdge, move |ctx| ctx.set_layer(layer))
}

/// Returns to the previous layer when the key goes down.
pub fn layer_reset<H>() -> Action<H> {
    on(Event::RisingEdge, |ctx| ctx.reset_layer())
}

/// Switches to `profile` when the key goes down.
pub fn profile_to<H>(profile: usize) -> Action<H> {
    on(Event::RisingEdge, move |ctx| ctx.set_profile(profile))
}

/// Returns to the previous profile when the key goes down.
pub fn profile_reset<H>() -> Action<H> {
    on(Event::RisingEdge, |ctx| ctx.reset_profile())
}

/// Runs every action in order with the same key snapshot.
pub fn multi<H: 'static>(actions: Vec<Action<H>>) -> Action<H> {
    action(move |key, ctx| {
        for a in actions.iter() {
            a(key, ctx);
        }
    })
}
