//! A parser for the configuration language of macropad, a macro pad input engine.

pub mod cfg;
pub mod key_action;
pub mod keys;
