//! Per-key debounce and gesture classification.
//!
//! A [`Key`] is fed one raw sample per tick through [`Key::update`] and turns the stream of
//! samples into [`Events`]: level events (`Pressed`/`Released`), edges, and the derived gestures
//! `Tap`, `Hold`, `Single`, `Long` and `Double`.
//!
//! The event mask is rebuilt from scratch on every update, so an action only ever sees what
//! happened during the current tick.

use bitflags::bitflags;

/// Milliseconds on a free-running, wrapping clock.
///
/// All comparisons between timestamps go through `wrapping_sub`, so the clock may overflow.
pub type Timestamp = u32;

/// A gesture kind recognized within one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Every tick the key is held (after debounce).
    Pressed,
    /// Every tick the key is not held (after debounce).
    Released,
    /// The key went from open to closed.
    RisingEdge,
    /// The key went from closed to open.
    FallingEdge,
    /// Either edge.
    ChangeInput,
    /// A press released before the hold threshold.
    Tap,
    /// A press that reached the hold threshold.
    Hold,
    /// One click, confirmed once the double-click window closed.
    Single,
    /// A press held past the long threshold.
    Long,
    /// A second press within the double-click window.
    Double,
}

impl Event {
    pub const ALL: [Event; 10] = [
        Event::Pressed,
        Event::Released,
        Event::RisingEdge,
        Event::FallingEdge,
        Event::ChangeInput,
        Event::Tap,
        Event::Hold,
        Event::Single,
        Event::Long,
        Event::Double,
    ];

    /// The single-bit [`Events`] value of this event.
    pub const fn bit(self) -> Events {
        match self {
            Event::Pressed => Events::PRESSED,
            Event::Released => Events::RELEASED,
            Event::RisingEdge => Events::RISING_EDGE,
            Event::FallingEdge => Events::FALLING_EDGE,
            Event::ChangeInput => Events::CHANGE_INPUT,
            Event::Tap => Events::TAP,
            Event::Hold => Events::HOLD,
            Event::Single => Events::SINGLE,
            Event::Long => Events::LONG,
            Event::Double => Events::DOUBLE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Event::Pressed => "pressed",
            Event::Released => "released",
            Event::RisingEdge => "rising-edge",
            Event::FallingEdge => "falling-edge",
            Event::ChangeInput => "change-input",
            Event::Tap => "tap",
            Event::Hold => "hold",
            Event::Single => "single",
            Event::Long => "long",
            Event::Double => "double",
        }
    }

    pub fn from_name(name: &str) -> Option<Event> {
        Event::ALL.into_iter().find(|ev| ev.name() == name)
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// The set of [`Event`]s that occurred for one key in the current tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Events: u16 {
        const PRESSED = 1 << 0;
        const RELEASED = 1 << 1;
        const RISING_EDGE = 1 << 2;
        const FALLING_EDGE = 1 << 3;
        const CHANGE_INPUT = 1 << 4;
        const TAP = 1 << 5;
        const HOLD = 1 << 6;
        const SINGLE = 1 << 7;
        const LONG = 1 << 8;
        const DOUBLE = 1 << 9;
    }
}

impl Events {
    pub fn has(self, event: Event) -> bool {
        self.contains(event.bit())
    }

    /// Iterates the contained events in declaration order.
    pub fn events(self) -> impl Iterator<Item = Event> {
        Event::ALL.into_iter().filter(move |ev| self.has(*ev))
    }
}

impl From<Event> for Events {
    fn from(ev: Event) -> Self {
        ev.bit()
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct KeyFlags: u8 {
        /// Debounced level seen on the previous update.
        const PRESS_BAK = 1 << 0;
        /// `Long` or `Double` already fired in this press-release cycle.
        const HANDLED = 1 << 1;
        const LONG_HANDLED = 1 << 2;
        const HOLD_HANDLED = 1 << 3;
        const INITIALIZED = 1 << 4;
    }
}

/// Timing configuration shared by every key of a pad. All values are in milliseconds.
///
/// `hold_threshold <= long_threshold` is the intended relationship but it is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub long_threshold: u32,
    pub double_threshold: u32,
    pub hold_threshold: u32,
    pub debounce_time: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            long_threshold: 500,
            double_threshold: 200,
            hold_threshold: 200,
            debounce_time: 20,
        }
    }
}

impl Thresholds {
    pub const fn init(
        long_threshold: u32,
        double_threshold: u32,
        hold_threshold: u32,
        debounce_time: u32,
    ) -> Self {
        Self {
            long_threshold,
            double_threshold,
            hold_threshold,
            debounce_time,
        }
    }

    pub const fn with_long_threshold(mut self, ms: u32) -> Self {
        self.long_threshold = ms;
        self
    }

    pub const fn with_double_threshold(mut self, ms: u32) -> Self {
        self.double_threshold = ms;
        self
    }

    pub const fn with_hold_threshold(mut self, ms: u32) -> Self {
        self.hold_threshold = ms;
        self
    }

    pub const fn with_debounce_time(mut self, ms: u32) -> Self {
        self.debounce_time = ms;
        self
    }
}

/// One physical key: debounce filter plus gesture classifier.
///
/// `Key` is `Copy`; actions receive a snapshot of it for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Key {
    index: u16,
    /// Time of the most recent accepted edge. `None` until the first edge, which is therefore
    /// never debounce-gated.
    last_transition: Option<Timestamp>,
    last_update: Timestamp,
    click_count: u8,
    flags: KeyFlags,
    events: Events,
}

impl Key {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    /// Sets the key index. Only the first call has an effect.
    pub fn set_index(&mut self, index: u16) {
        if self.flags.contains(KeyFlags::INITIALIZED) {
            log::debug!("key {} already has an index, ignoring {index}", self.index);
            return;
        }
        self.index = index;
        self.flags.insert(KeyFlags::INITIALIZED);
    }

    /// Feeds the raw sample for this tick.
    ///
    /// Samples taken while `now` is within `debounce_time` of the last accepted edge are
    /// dropped entirely, so the next accepted tick compares against the last debounced level.
    pub fn update(&mut self, pressed: bool, now: Timestamp, thresholds: &Thresholds) {
        self.events = Events::empty();
        self.last_update = now;

        let elapsed = self.elapsed_since_transition(now);
        if elapsed < thresholds.debounce_time {
            return;
        }
        if pressed {
            self.on_press(now, thresholds);
        } else {
            self.on_release(now, elapsed, thresholds);
        }
        self.flags.set(KeyFlags::PRESS_BAK, pressed);
    }

    fn on_press(&mut self, now: Timestamp, th: &Thresholds) {
        self.emit(Event::Pressed);

        if !self.flags.contains(KeyFlags::PRESS_BAK) {
            self.on_rising_edge(now);
        }

        let held = self.elapsed_since_transition(now);
        if held >= th.hold_threshold && !self.flags.contains(KeyFlags::HOLD_HANDLED) {
            self.emit(Event::Hold);
            self.flags.insert(KeyFlags::HOLD_HANDLED);
        }

        if !self.flags.contains(KeyFlags::HANDLED) && held > th.long_threshold {
            self.emit(Event::Long);
            self.flags.insert(KeyFlags::HANDLED | KeyFlags::LONG_HANDLED);
        }
    }

    fn on_release(&mut self, now: Timestamp, elapsed: u32, th: &Thresholds) {
        self.emit(Event::Released);

        if self.flags.contains(KeyFlags::PRESS_BAK) {
            self.on_falling_edge(now, elapsed, th);
        } else if elapsed > th.double_threshold {
            // Double-click window closed, measured from the release.
            if self.click_count == 1 {
                self.emit(Event::Single);
            }
            self.click_count = 0;
        }

        self.flags.remove(KeyFlags::HANDLED);
    }

    fn on_rising_edge(&mut self, now: Timestamp) {
        self.emit(Event::RisingEdge);
        self.emit(Event::ChangeInput);

        self.last_transition = Some(now);

        if self.click_count == 1 && !self.flags.contains(KeyFlags::HANDLED) {
            self.emit(Event::Double);
            self.flags.insert(KeyFlags::HANDLED);
        }

        // Reaches 2 after a double-click, which keeps it from turning into a Single later.
        self.click_count = self.click_count.saturating_add(1);
    }

    fn on_falling_edge(&mut self, now: Timestamp, press_duration: u32, th: &Thresholds) {
        self.emit(Event::FallingEdge);
        self.emit(Event::ChangeInput);

        if press_duration < th.hold_threshold {
            self.emit(Event::Tap);
        }

        // A long press consumes the click.
        if self.flags.contains(KeyFlags::LONG_HANDLED) {
            self.click_count = 0;
        }

        self.last_transition = Some(now);
        self.flags.remove(KeyFlags::LONG_HANDLED | KeyFlags::HOLD_HANDLED);
    }

    fn elapsed_since_transition(&self, now: Timestamp) -> u32 {
        match self.last_transition {
            Some(t) => now.wrapping_sub(t),
            None => u32::MAX,
        }
    }

    fn emit(&mut self, event: Event) {
        self.events.insert(event.bit());
    }

    /// Marks `event` as occurred in the current tick, bypassing debounce and classification.
    pub fn emulate(&mut self, event: Event) {
        self.emit(event);
    }

    /// Removes `event` from the current tick.
    pub fn clear(&mut self, event: Event) {
        self.events.remove(event.bit());
    }

    pub fn has_occurred(&self, event: Event) -> bool {
        self.events.has(event)
    }

    /// Everything that occurred in the current tick.
    pub fn events(&self) -> Events {
        self.events
    }

    pub fn is_pressed(&self) -> bool {
        self.has_occurred(Event::Pressed)
    }

    /// Time spent in the current debounced state, as of the last update.
    pub fn state_duration(&self) -> u32 {
        match self.last_transition {
            Some(t) => self.last_update.wrapping_sub(t),
            None => 0,
        }
    }

    /// How long the key has been held, or 0 when it is not pressed this tick.
    pub fn press_time(&self) -> u32 {
        if self.is_pressed() {
            self.state_duration()
        } else {
            0
        }
    }

    pub fn click_count(&self) -> u8 {
        self.click_count
    }
}
