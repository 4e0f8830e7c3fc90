use anyhow::{Result, bail};
use clap::Parser;
use log::info;
use macropad::{Macropad, ValidatedArgs, default_cfg, sim};
use macropad_parser::cfg;
use simplelog::*;
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, verbatim_doc_comment)]
/// macropad: a gesture-aware macro pad input engine
///
/// macropad classifies key presses into taps, holds, long presses, single and
/// double clicks, and runs the action bound to each key on the active layer
/// and profile. Keys are driven by a simulation: either a file passed with
/// --sim or items typed on stdin, e.g.
///
///     d:k0 t:50 u:k0 t:300
///
/// The keys the host would receive are printed to stdout.
struct Args {
    // Display different platform specific paths based on the target OS
    #[cfg_attr(
        target_os = "windows",
        doc = r"Configuration file to use with macropad. If not specified, defaults to
macropad.kbd in the current working directory and
'C:\Users\user\AppData\Roaming\macropad\macropad.kbd'"
    )]
    #[cfg_attr(
        target_os = "macos",
        doc = "Configuration file to use with macropad. If not specified, defaults to
macropad.kbd in the current working directory and
'$HOME/Library/Application Support/macropad/macropad.kbd.'"
    )]
    #[cfg_attr(
        not(any(target_os = "macos", target_os = "windows")),
        doc = "Configuration file to use with macropad. If not specified, defaults to
macropad.kbd in the current working directory and
'$XDG_CONFIG_HOME/macropad/macropad.kbd'"
    )]
    #[arg(short, long, verbatim_doc_comment)]
    cfg: Option<PathBuf>,

    /// Simulation file to run. Items are whitespace separated:
    /// d:KEY (key down), u:KEY (key up), t:MS (run MS one-millisecond ticks).
    /// If not specified, items are read from stdin line by line.
    #[arg(short, long, verbatim_doc_comment)]
    sim: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging; implies --debug as well.
    #[arg(short, long)]
    trace: bool,

    /// Validate configuration file and exit
    #[arg(long, verbatim_doc_comment)]
    check: bool,
}

/// Parse CLI arguments and initialize logging.
fn cli_init() -> Result<ValidatedArgs> {
    let args = Args::parse();

    let cfg_path = args.cfg.or_else(|| default_cfg().into_iter().next());

    let log_lvl = match (args.debug, args.trace) {
        (_, true) => LevelFilter::Trace,
        (true, false) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    };

    let mut log_cfg = ConfigBuilder::new();
    if let Err(e) = log_cfg.set_time_offset_to_local() {
        eprintln!("WARNING: could not set log TZ to local: {e:?}");
    };
    log_cfg.set_time_format_rfc3339();
    CombinedLogger::init(vec![TermLogger::new(
        log_lvl,
        log_cfg.build(),
        TerminalMode::Stderr,
        ColorChoice::AlwaysAnsi,
    )])
    .expect("logger can init");

    log::info!("macropad v{} starting", env!("CARGO_PKG_VERSION"));

    let Some(cfg_path) = cfg_path else {
        bail!("No config file provided\nFor more info, pass the `-h` or `--help` flags.");
    };
    if !cfg_path.exists() {
        bail!(
            "Could not find the config file ({})\nFor more info, pass the `-h` or `--help` flags.",
            cfg_path.display()
        )
    }

    if args.check {
        log::info!("validating config only and exiting");
        let status = match cfg::new_from_file(&cfg_path) {
            Ok(_) => 0,
            Err(e) => {
                log::error!("{e:?}");
                1
            }
        };
        std::process::exit(status);
    }

    if let Some(sim_path) = &args.sim {
        if !sim_path.is_file() {
            bail!("Could not find the simulation file ({})", sim_path.display())
        }
    }

    Ok(ValidatedArgs {
        cfg_path,
        sim_path: args.sim,
    })
}

fn print_outputs(outputs: &[String]) {
    for line in outputs {
        println!("{line}");
    }
}

fn main_impl() -> Result<()> {
    let args = cli_init()?;
    let mut mp = Macropad::new(&args.cfg_path)?;

    if let Some(sim_path) = &args.sim_path {
        info!("running simulation {}", sim_path.display());
        let text = std::fs::read_to_string(sim_path)?;
        print_outputs(&sim::simulate(&mut mp, &text)?);
        return Ok(());
    }

    info!("reading simulation items from stdin, end with Ctrl-D");
    for line in std::io::stdin().lock().lines() {
        match sim::simulate(&mut mp, &line?) {
            Ok(outputs) => print_outputs(&outputs),
            Err(e) => log::error!("{e}"),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let ret = main_impl();
    if let Err(ref e) = ret {
        log::error!("{e}\n");
    }
    ret
}
