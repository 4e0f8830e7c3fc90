//! Host output that records what would be sent instead of talking to a HID device.
//!
//! Every press and release becomes one line in [`KbdOut::outputs`]. When time has passed since
//! the previous line, a `t:<ms>ms` line is written first, so a recording reads like:
//!
//! ```text
//! press:a
//! t:50ms
//! release:a
//! ```

use macropad_engine::{KeyOutput, Timestamp};
use rustc_hash::FxHashSet as HashSet;

/// Handle for writing keys to the (simulated) host.
#[derive(Debug, Default)]
pub struct KbdOut {
    pub outputs: Vec<String>,
    held: HashSet<&'static str>,
    now: Timestamp,
    last_output: Timestamp,
}

impl KbdOut {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time that subsequent outputs are recorded at.
    pub fn set_time(&mut self, now: Timestamp) {
        self.now = now;
    }

    /// Presses and immediately releases `key`.
    pub fn tap(&mut self, key: &'static str) {
        self.press(key);
        self.release(key);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// The held keys, sorted by name.
    pub fn held_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.held.iter().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Removes and returns everything recorded so far.
    pub fn take_outputs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outputs)
    }

    fn write(&mut self, line: String) {
        let gap = self.now.wrapping_sub(self.last_output);
        if gap > 0 {
            self.outputs.push(format!("t:{gap}ms"));
            self.last_output = self.now;
        }
        log::debug!("out {line}");
        self.outputs.push(line);
    }
}

impl KeyOutput for KbdOut {
    type Code = &'static str;

    fn press(&mut self, key: &'static str) {
        if !self.held.insert(key) {
            log::trace!("{key} is already held");
            return;
        }
        self.write(format!("press:{key}"));
    }

    fn release(&mut self, key: &'static str) {
        if !self.held.remove(key) {
            log::trace!("{key} is not held, nothing to release");
            return;
        }
        self.write(format!("release:{key}"));
    }
}
