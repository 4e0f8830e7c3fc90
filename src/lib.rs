use std::path::PathBuf;

pub mod kbd_out;
pub mod macropad;
pub mod sim;

pub use kbd_out::KbdOut;
pub use macropad::Macropad;


pub struct ValidatedArgs {
    pub cfg_path: PathBuf,
    /// Simulation file to run. Without one, simulation items are read from stdin.
    pub sim_path: Option<PathBuf>,
}

pub fn default_cfg() -> Vec<PathBuf> {
    let mut cfgs = Vec::new();

    let default = PathBuf::from("macropad.kbd");
    if default.is_file() {
        cfgs.push(default);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let fallback = config_dir.join("macropad").join("macropad.kbd");
        if fallback.is_file() {
            cfgs.push(fallback);
        }
    }

    cfgs
}
