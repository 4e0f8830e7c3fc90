//! Drives a [`Macropad`] from a simulation string.
//!
//! A simulation is a whitespace separated list of items:
//!
//! - `d:KEY` / `down:KEY`: close the contact of KEY
//! - `u:KEY` / `up:KEY`: open it again
//! - `t:MS` / `tick:MS`: run MS ticks, one per millisecond
//!
//! KEY is a `defsrc` name or a key index. Everything after `;;` on a line is a comment.

use anyhow::{Result, anyhow, bail};

use crate::macropad::Macropad;

/// Runs every item of `sim` and returns the host output recorded meanwhile.
pub fn simulate(mp: &mut Macropad, sim: &str) -> Result<Vec<String>> {
    for item in sim
        .lines()
        .map(|l| l.split(";;").next().unwrap_or(""))
        .flat_map(str::split_whitespace)
    {
        run_item(mp, item)?;
    }
    Ok(mp.kbd_out_mut().take_outputs())
}

fn run_item(mp: &mut Macropad, item: &str) -> Result<()> {
    let Some((kind, val)) = item.split_once(':') else {
        bail!("invalid simulation item {item}, expected e.g. d:KEY, u:KEY or t:MS");
    };
    match kind {
        "t" | "tick" => {
            let ms = val
                .parse::<u32>()
                .map_err(|_| anyhow!("invalid tick count in {item}"))?;
            mp.tick_ms(ms)
        }
        "d" | "down" => {
            let key = key_param(mp, item, val)?;
            mp.handle_input(key, true)
        }
        "u" | "up" => {
            let key = key_param(mp, item, val)?;
            mp.handle_input(key, false)
        }
        _ => bail!("invalid simulation item {item}, unknown kind {kind}"),
    }
}

fn key_param(mp: &Macropad, item: &str, val: &str) -> Result<usize> {
    mp.key_index(val).ok_or_else(|| {
        anyhow!(
            "unknown key in {item}, expected one of: {}",
            mp.key_names().join(" ")
        )
    })
}
