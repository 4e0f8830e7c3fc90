//! What a configured key does, before it is turned into an engine action.

use macropad_engine::Event;

/// One entry of a `deflayer`. Layer and profile references are already resolved to indexes
/// and key names to their canonical spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// `_` or `XX`.
    Unbound,
    /// A bare key name: held on the host for as long as the physical key is held.
    PressTo(&'static str),
    LayerTo(usize),
    LayerBack(usize),
    LayerReset,
    ProfileTo(usize),
    ProfileReset,
    /// Runs the command in every tick in which the event occurred.
    On(Event, Command),
    Multi(Vec<KeyAction>),
}

/// A single step run by `on` or `after`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tap(&'static str),
    Press(&'static str),
    Release(&'static str),
    Layer(usize),
    LayerReset,
    Profile(usize),
    ProfileReset,
    /// Runs the inner command this many milliseconds later.
    After(u16, Box<Command>),
}
