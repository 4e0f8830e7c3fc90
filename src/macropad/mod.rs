//! Runs a parsed configuration on a macro pad whose keys are fed in by software.

use anyhow::{Result, bail};
use log::info;
use macropad_engine::matrix::StaticReader;
use macropad_engine::{MacroPad, ProfiledLayers, Timestamp};
use macropad_parser::cfg::{self, Cfg};
use std::path::Path;

use crate::kbd_out::KbdOut;

mod actions;

pub struct Macropad {
    pub pad: MacroPad<StaticReader, KbdOut>,
    /// `defsrc` names in key index order.
    key_names: Vec<String>,
    profile_names: Vec<String>,
    /// Layer names of every profile.
    layer_names: Vec<Vec<String>>,
    prev_layer: usize,
    prev_profile: usize,
    log_layer_changes: bool,
    /// Timestamp of the next tick.
    now: Timestamp,
}

impl Macropad {
    /// Create a new runtime from a configuration file.
    pub fn new(cfg_path: &Path) -> Result<Self> {
        let cfg = match cfg::new_from_file(cfg_path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("{e:?}");
                bail!("failed to parse file");
            }
        };
        Self::from_cfg(cfg)
    }

    pub fn new_from_str(cfg_text: &str) -> Result<Self> {
        let cfg = match cfg::new_from_str(cfg_text) {
            Ok(c) => c,
            Err(e) => {
                log::error!("{e:?}");
                bail!("failed to parse configuration");
            }
        };
        Self::from_cfg(cfg)
    }

    pub fn from_cfg(cfg: Cfg) -> Result<Self> {
        let profiles: ProfiledLayers<KbdOut> = cfg
            .profiles
            .iter()
            .map(|p| {
                p.layers
                    .iter()
                    .map(|l| actions::build_keymap(&l.actions))
                    .collect()
            })
            .collect();
        let reader = StaticReader::new(cfg.keys.len());
        let pad = MacroPad::new(reader, KbdOut::new(), cfg.options.thresholds, profiles)?;
        let rt = Self {
            pad,
            profile_names: cfg.profiles.iter().map(|p| p.name.clone()).collect(),
            layer_names: cfg
                .profiles
                .iter()
                .map(|p| p.layers.iter().map(|l| l.name.clone()).collect())
                .collect(),
            key_names: cfg.keys,
            prev_layer: 0,
            prev_profile: 0,
            log_layer_changes: cfg.options.log_layer_changes,
            now: 0,
        };
        if rt.log_layer_changes {
            info!(
                "starting in profile {}, layer {}",
                rt.profile_name(0),
                rt.layer_name(0, 0)
            );
        }
        Ok(rt)
    }

    /// Finds a key by its `defsrc` name or index.
    pub fn key_index(&self, key: &str) -> Option<usize> {
        self.key_names.iter().position(|k| k == key).or_else(|| {
            key.parse::<usize>()
                .ok()
                .filter(|&i| i < self.key_names.len())
        })
    }

    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    /// Sets the raw level of a key; it is picked up by the next tick.
    pub fn handle_input(&mut self, key: usize, closed: bool) -> Result<()> {
        if key >= self.key_names.len() {
            bail!(
                "key {key} does not exist, there are {} keys",
                self.key_names.len()
            );
        }
        log::trace!(
            "{} {}",
            if closed { "down" } else { "up" },
            self.key_names[key]
        );
        self.pad.reader_mut().set(key, closed);
        Ok(())
    }

    /// Runs `ms` ticks, one per millisecond.
    pub fn tick_ms(&mut self, ms: u32) -> Result<()> {
        for _ in 0..ms {
            self.pad.host_mut().set_time(self.now);
            let Ok(()) = self.pad.tick(self.now);
            self.check_handle_layer_change();
            self.now = self.now.wrapping_add(1);
        }
        Ok(())
    }

    /// Timestamp the next tick will run at.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn kbd_out(&self) -> &KbdOut {
        self.pad.host()
    }

    pub fn kbd_out_mut(&mut self) -> &mut KbdOut {
        self.pad.host_mut()
    }

    pub fn profile_name(&self, profile: usize) -> &str {
        self.profile_names
            .get(profile)
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn layer_name(&self, profile: usize, layer: usize) -> &str {
        self.layer_names
            .get(profile)
            .and_then(|layers| layers.get(layer))
            .map(String::as_str)
            .unwrap_or("?")
    }

    fn check_handle_layer_change(&mut self) {
        let cur_profile = self.pad.profile();
        let cur_layer = self.pad.layer();
        if cur_profile != self.prev_profile {
            self.prev_profile = cur_profile;
            if self.log_layer_changes {
                info!("Entered profile: {}", self.profile_name(cur_profile));
            }
        }
        if cur_layer != self.prev_layer {
            self.prev_layer = cur_layer;
            if self.log_layer_changes {
                info!(
                    "Entered layer: {}",
                    self.layer_name(cur_profile, cur_layer)
                );
            }
        }
    }
}
