//! Input engine for macro pads and small custom keyboards.
//!
//! A [`MacroPad`] is ticked once per millisecond (or at any other steady rate). Each tick it
//! reads one raw sample per key from a [`KeyReader`], runs every [`Key`] through debounce and
//! gesture classification, calls the [`Action`] bound to each key by the active layer and
//! profile, and finally runs the deferred tasks that came due.
//!
//! ```
//! use macropad_engine::action::{layer_to, press_to, KeyOutput};
//! use macropad_engine::matrix::StaticReader;
//! use macropad_engine::{MacroPad, Thresholds};
//!
//! #[derive(Default)]
//! struct Report(Vec<char>);
//!
//! impl KeyOutput for Report {
//!     type Code = char;
//!     fn press(&mut self, code: char) {
//!         self.0.push(code);
//!     }
//!     fn release(&mut self, code: char) {
//!         self.0.retain(|c| *c != code);
//!     }
//! }
//!
//! let layers = vec![
//!     vec![Some(press_to('a')), Some(layer_to(1))],
//!     vec![Some(press_to('b')), Some(layer_to(0))],
//! ];
//! let mut pad = MacroPad::new(
//!     StaticReader::new(2),
//!     Report::default(),
//!     Thresholds::default(),
//!     vec![layers],
//! )
//! .unwrap();
//!
//! pad.reader_mut().press(0);
//! pad.tick(0).unwrap();
//! assert_eq!(pad.host().0, vec!['a']);
//! ```

pub mod action;
pub mod bindings;
pub mod key;
pub mod layer;
pub mod matrix;
pub mod pad;
pub mod profile;
pub mod scheduler;

pub use action::{Action, Ctx, KeyOutput};
pub use bindings::{Bindings, LayoutError};
pub use key::{Event, Events, Key, Thresholds, Timestamp};
pub use layer::{Keymap, LayeredKeymap, ProfiledLayers};
pub use matrix::{KeyBits, KeyReader};
pub use pad::MacroPad;
pub use scheduler::DeferredScheduler;
