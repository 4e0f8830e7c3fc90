//! This parses the configuration language into the key names, options and per-profile layers
//! that the runtime builds a `MacroPad` from.
//!
//! A configuration looks like:
//!
//! (defcfg hold-threshold 250)
//!
//! (defsrc k0 k1 k2)
//!
//! (deflayer base
//!     a    (layer-to nav)    (on double (tap esc))
//! )
//!
//! (deflayer nav
//!     left (layer-back base) right
//! )
//!
//! Each `deflayer` has exactly one entry per `defsrc` key, in the same order. Layers may also
//! be grouped into profiles:
//!
//! (defprofile work (deflayer base ...) (deflayer nav ...))
//! (defprofile game (deflayer base ...) (deflayer nav ...))
//!
//! in which case every profile must have the same number of layers. Top-level `deflayer`s form
//! a single profile named `default`.

pub mod sexpr;

mod defcfg;
pub use defcfg::*;

mod error;
pub use error::*;

use crate::key_action::*;
use crate::keys::str_to_key;
use macropad_engine::Event;
use sexpr::*;
use std::path::Path;

type HashSet<T> = rustc_hash::FxHashSet<T>;
type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(test)]
mod tests;

#[macro_export]
macro_rules! bail {
    ($err:expr $(,)?) => {
        return Err($crate::cfg::ParseError::from(anyhow::anyhow!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::cfg::ParseError::from(anyhow::anyhow!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! bail_expr {
    ($expr:expr, $fmt:expr $(,)?) => {
        return Err($crate::cfg::ParseError::from_expr($expr, format!($fmt)))
    };
    ($expr:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::cfg::ParseError::from_expr($expr, format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! bail_span {
    ($expr:expr, $fmt:expr $(,)?) => {
        return Err($crate::cfg::ParseError::from_spanned($expr, format!($fmt)))
    };
    ($expr:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::cfg::ParseError::from_spanned($expr, format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! anyhow_expr {
    ($expr:expr, $fmt:expr $(,)?) => {
        $crate::cfg::ParseError::from_expr($expr, format!($fmt))
    };
    ($expr:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::cfg::ParseError::from_expr($expr, format!($fmt, $($arg)*))
    };
}

const DEFCFG: &str = "defcfg";
const DEFSRC: &str = "defsrc";
const DEFLAYER: &str = "deflayer";
const DEFPROFILE: &str = "defprofile";

/// Name of the profile formed by top-level `deflayer`s.
pub const DEFAULT_PROFILE: &str = "default";

const LAYER_TO: &str = "layer-to";
const LAYER_BACK: &str = "layer-back";
const LAYER_RESET: &str = "layer-reset";
const PROFILE_TO: &str = "profile-to";
const PROFILE_RESET: &str = "profile-reset";
const ON: &str = "on";
const MULTI: &str = "multi";

fn is_list_action(ac: &str) -> bool {
    const LIST_ACTIONS: &[&str] = &[
        LAYER_TO,
        LAYER_BACK,
        LAYER_RESET,
        PROFILE_TO,
        PROFILE_RESET,
        ON,
        MULTI,
    ];
    LIST_ACTIONS.contains(&ac)
}

#[derive(Debug, Clone)]
pub struct Cfg {
    /// Configuration items in `defcfg`.
    pub options: CfgOptions,
    /// Names of the physical keys from `defsrc`, in key index order.
    pub keys: Vec<String>,
    pub profiles: Vec<ProfileCfg>,
}

#[derive(Debug, Clone)]
pub struct ProfileCfg {
    pub name: String,
    pub layers: Vec<LayerCfg>,
}

#[derive(Debug, Clone)]
pub struct LayerCfg {
    pub name: String,
    /// One entry per key.
    pub actions: Vec<KeyAction>,
}

impl Cfg {
    /// Looks a physical key up by its `defsrc` name, falling back to a numeric index.
    pub fn key_index(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key).or_else(|| {
            key.parse::<usize>()
                .ok()
                .filter(|&i| i < self.keys.len())
        })
    }

    pub fn layer_count(&self) -> usize {
        self.profiles.first().map(|p| p.layers.len()).unwrap_or(0)
    }
}

/// Parse a new configuration from a file.
pub fn new_from_file(p: &Path) -> MResult<Cfg> {
    let text = std::fs::read_to_string(p)
        .map_err(|e| miette::miette!("Failed to read {}: {e}", p.display()))?;
    parse_cfg_raw_string(&text, &p.to_string_lossy()).map_err(error_with_source)
}

pub fn new_from_str(cfg_text: &str) -> MResult<Cfg> {
    parse_cfg_raw_string(cfg_text, "configuration").map_err(error_with_source)
}

pub fn parse_cfg_raw_string(
    text: &str,
    file_name: &str,
) -> std::result::Result<Cfg, CfgError> {
    let spanned_root_exprs = sexpr::parse(text, file_name)?;
    let cfg = parse_root_exprs(&spanned_root_exprs)?;
    log::info!(
        "config file is valid: {} keys, {} profiles of {} layers",
        cfg.keys.len(),
        cfg.profiles.len(),
        cfg.layer_count()
    );
    Ok(cfg)
}

fn parse_root_exprs(exprs: &[TopLevel]) -> Result<Cfg> {
    error_on_unknown_top_level_atoms(exprs)?;

    let defcfgs: Vec<_> = exprs.iter().filter(gen_first_atom_filter(DEFCFG)).collect();
    if let Some(extra) = defcfgs.get(1) {
        bail_span!(*extra, "Only one defcfg is allowed, found more. Delete the extras.");
    }
    let options = match defcfgs.first() {
        Some(expr) => parse_defcfg(&expr.t)?,
        None => CfgOptions::default(),
    };

    let defsrcs: Vec<_> = exprs.iter().filter(gen_first_atom_filter(DEFSRC)).collect();
    let Some(src_expr) = defsrcs.first() else {
        bail!("Exactly one defsrc must exist; found none");
    };
    if let Some(extra) = defsrcs.get(1) {
        bail_span!(*extra, "Exactly one defsrc is allowed, found more. Delete the extras.");
    }
    let keys = parse_defsrc(src_expr)?;

    let deflayers: Vec<_> = exprs.iter().filter(gen_first_atom_filter(DEFLAYER)).collect();
    let defprofiles: Vec<_> = exprs
        .iter()
        .filter(gen_first_atom_filter(DEFPROFILE))
        .collect();
    let raw_profiles = match (deflayers.is_empty(), defprofiles.first()) {
        (true, None) => bail!("No deflayer found. At least one layer is required."),
        (false, Some(profile)) => bail_span!(
            *profile,
            "deflayer cannot be used at the top level together with defprofile. \
             Move the top-level deflayers into a defprofile."
        ),
        (false, None) => vec![RawProfile {
            name: DEFAULT_PROFILE.to_string(),
            name_expr: None,
            layers: deflayers.iter().map(|l| &l.t[..]).collect(),
        }],
        (true, Some(_)) => defprofiles
            .iter()
            .map(|p| parse_defprofile(p))
            .collect::<Result<Vec<_>>>()?,
    };

    let profile_indexes = parse_profile_indexes(&raw_profiles)?;
    let mut profiles = Vec::with_capacity(raw_profiles.len());
    for raw in raw_profiles.iter() {
        let s = ParserState {
            key_count: keys.len(),
            layer_count: raw.layers.len(),
            layer_indexes: parse_layer_indexes(raw, keys.len())?,
            profile_indexes: &profile_indexes,
            profile_count: raw_profiles.len(),
        };
        let layers = raw
            .layers
            .iter()
            .map(|layer| parse_layer(layer, &s))
            .collect::<Result<Vec<_>>>()?;
        profiles.push(ProfileCfg {
            name: raw.name.clone(),
            layers,
        });
    }

    Ok(Cfg {
        options,
        keys,
        profiles,
    })
}

/// Everything needed to resolve names while parsing the layers of one profile.
struct ParserState<'a> {
    key_count: usize,
    layer_count: usize,
    layer_indexes: HashMap<String, usize>,
    profile_indexes: &'a HashMap<String, usize>,
    profile_count: usize,
}

struct RawProfile<'a> {
    name: String,
    name_expr: Option<&'a SExpr>,
    layers: Vec<&'a [SExpr]>,
}

fn error_on_unknown_top_level_atoms(exprs: &[TopLevel]) -> Result<()> {
    for expr in exprs {
        let Some(first) = expr.t.first() else {
            bail_span!(
                expr,
                "Found empty list as a configuration item, you should delete this"
            );
        };
        match first.atom() {
            Some(DEFCFG | DEFSRC | DEFLAYER | DEFPROFILE) => {}
            Some(_) => bail_span!(expr, "Found unknown configuration item"),
            None => bail_expr!(
                first,
                "Invalid: found list as first item in a configuration item"
            ),
        }
    }
    Ok(())
}

/// Return a closure that filters a root expression by the content of the first element. The
/// closure returns true if the first element is an atom that matches the input `a` and false
/// otherwise.
fn gen_first_atom_filter(a: &str) -> impl Fn(&&TopLevel) -> bool + '_ {
    move |expr| matches!(expr.t.first(), Some(SExpr::Atom(atom)) if atom.t == a)
}

/// Consumes the first element and returns the rest of the iterator. Returns `Ok` if the first
/// element is an atom and equals `expected_first`.
fn check_first_expr<'a>(
    mut exprs: impl Iterator<Item = &'a SExpr>,
    expected_first: &str,
) -> Result<impl Iterator<Item = &'a SExpr>> {
    let first_atom = exprs
        .next()
        .ok_or_else(|| anyhow::anyhow!("Passed empty list to {expected_first}"))?
        .atom()
        .ok_or_else(|| {
            anyhow::anyhow!("First entry is expected to be an atom for {expected_first}")
        })?;
    if first_atom != expected_first {
        bail!("Passed non-{expected_first} expression to {expected_first}: {first_atom}");
    }
    Ok(exprs)
}

/// Parse the physical key names from an expression starting with defsrc. The number of names
/// is the number of entries every layer must have.
fn parse_defsrc(expr: &TopLevel) -> Result<Vec<String>> {
    let exprs = check_first_expr(expr.t.iter(), DEFSRC)?;
    let mut seen = HashSet::default();
    let mut keys = Vec::new();
    for key_expr in exprs {
        let Some(name) = key_expr.atom() else {
            bail_expr!(key_expr, "No lists allowed in defsrc");
        };
        if !seen.insert(name) {
            bail_expr!(key_expr, "Repeat declaration of key in defsrc: \"{}\"", name);
        }
        keys.push(name.to_string());
    }
    if keys.is_empty() {
        bail_span!(expr, "defsrc must name at least one key");
    }
    log::debug!("defsrc: {keys:?}");
    Ok(keys)
}

/// Parse `(defprofile name (deflayer ...) ...)`.
fn parse_defprofile(expr: &TopLevel) -> Result<RawProfile<'_>> {
    let mut exprs = check_first_expr(expr.t.iter(), DEFPROFILE)?;
    let name_expr = match exprs.next() {
        Some(e) => e,
        None => bail_span!(expr, "defprofile requires a name"),
    };
    let Some(name) = name_expr.atom() else {
        bail_expr!(name_expr, "Profile name must be an atom, not a list");
    };
    let mut layers = Vec::new();
    for layer_expr in exprs {
        match layer_expr.list() {
            Some(l) if matches!(l.first().and_then(SExpr::atom), Some(DEFLAYER)) => {
                layers.push(l)
            }
            _ => bail_expr!(layer_expr, "Only deflayer is allowed inside defprofile"),
        }
    }
    if layers.is_empty() {
        bail_span!(expr, "Profile {name} has no layers. Add at least one deflayer.");
    }
    Ok(RawProfile {
        name: name.to_string(),
        name_expr: Some(name_expr),
        layers,
    })
}

/// Checks that profile names are unique and that every profile has as many layers as the first
/// one. Returns the profile indexes by name.
fn parse_profile_indexes(profiles: &[RawProfile]) -> Result<HashMap<String, usize>> {
    let mut indexes = HashMap::default();
    let expected_layers = profiles.first().map(|p| p.layers.len()).unwrap_or(0);
    for (i, p) in profiles.iter().enumerate() {
        let name_expr = p.name_expr;
        if indexes.insert(p.name.clone(), i).is_some() {
            match name_expr {
                Some(e) => bail_expr!(e, "Duplicate profile name: {}", p.name),
                None => bail!("Duplicate profile name: {}", p.name),
            }
        }
        if p.layers.len() != expected_layers {
            let msg = format!(
                "Profile {} has {} layers but profile {} has {}. \
                 Every profile must have the same number of layers.",
                p.name,
                p.layers.len(),
                profiles[0].name,
                expected_layers
            );
            match name_expr {
                Some(e) => bail_expr!(e, "{msg}"),
                None => bail!(msg),
            }
        }
    }
    Ok(indexes)
}

/// Returns layer names and their indexes within a profile. This also checks that:
/// - Every layer has a name and the same number of items as the defsrc,
/// - There are no duplicate layer names in the profile.
fn parse_layer_indexes(profile: &RawProfile, key_count: usize) -> Result<HashMap<String, usize>> {
    let mut indexes = HashMap::default();
    for (i, layer) in profile.layers.iter().enumerate() {
        let mut exprs = check_first_expr(layer.iter(), DEFLAYER)?;
        let Some(name_expr) = exprs.next() else {
            bail!("deflayer requires a name in profile {}", profile.name);
        };
        let Some(name) = name_expr.atom() else {
            bail_expr!(name_expr, "Layer name must be an atom, not a list");
        };
        if indexes.insert(name.to_string(), i).is_some() {
            bail_expr!(name_expr, "Duplicate layer name in profile {}: {}", profile.name, name);
        }
        let item_count = exprs.count();
        if item_count != key_count {
            bail_expr!(
                name_expr,
                "Layer {} has {} item(s), but defsrc has {} key(s). They must match.",
                name,
                item_count,
                key_count
            );
        }
    }
    Ok(indexes)
}

fn parse_layer(layer: &[SExpr], s: &ParserState) -> Result<LayerCfg> {
    // Names and lengths were checked by parse_layer_indexes.
    let name = layer
        .get(1)
        .and_then(SExpr::atom)
        .unwrap_or_default()
        .to_string();
    let actions = layer[2..]
        .iter()
        .map(|ac| parse_action(ac, s))
        .collect::<Result<Vec<_>>>()?;
    debug_assert_eq!(actions.len(), s.key_count);
    Ok(LayerCfg { name, actions })
}

fn parse_action(expr: &SExpr, s: &ParserState) -> Result<KeyAction> {
    let action = match expr {
        SExpr::Atom(a) => parse_action_atom(a),
        SExpr::List(l) => parse_action_list(&l.t, s),
    };
    action.map_err(|mut e| {
        if e.span.is_none() {
            e.span = Some(expr.span())
        };
        e
    })
}

fn parse_action_atom(ac_span: &Spanned<String>) -> Result<KeyAction> {
    let ac = ac_span.t.as_str();
    if is_list_action(ac) {
        bail_span!(
            ac_span,
            "This is a list action and must be in parentheses: ({ac} ...)"
        );
    }
    match ac {
        "_" | "XX" => Ok(KeyAction::Unbound),
        _ => match str_to_key(ac) {
            Some(key) => Ok(KeyAction::PressTo(key)),
            None => bail_span!(ac_span, "Unknown key/action: {ac}"),
        },
    }
}

fn parse_action_list(ac: &[SExpr], s: &ParserState) -> Result<KeyAction> {
    if ac.is_empty() {
        return Ok(KeyAction::Unbound);
    }
    let ac_type = match &ac[0] {
        SExpr::Atom(a) => &a.t,
        _ => bail!("All list actions must start with string and not a list"),
    };
    if !is_list_action(ac_type) {
        bail_expr!(&ac[0], "Unknown action type: {ac_type}");
    }
    let params = &ac[1..];
    match ac_type.as_str() {
        LAYER_TO => Ok(KeyAction::LayerTo(layer_idx(params, s, LAYER_TO)?)),
        LAYER_BACK => Ok(KeyAction::LayerBack(layer_idx(params, s, LAYER_BACK)?)),
        LAYER_RESET => no_params(params, LAYER_RESET).map(|_| KeyAction::LayerReset),
        PROFILE_TO => Ok(KeyAction::ProfileTo(profile_idx(params, s, PROFILE_TO)?)),
        PROFILE_RESET => no_params(params, PROFILE_RESET).map(|_| KeyAction::ProfileReset),
        ON => parse_on(params, s),
        MULTI => parse_multi(params, s),
        _ => unreachable!("checked by is_list_action"),
    }
}

fn no_params(params: &[SExpr], label: &str) -> Result<()> {
    match params.first() {
        Some(extra) => bail_expr!(extra, "{label} does not take any parameters"),
        None => Ok(()),
    }
}

fn single_param<'a>(params: &'a [SExpr], label: &str, what: &str) -> Result<&'a SExpr> {
    match params {
        [p] => Ok(p),
        [] => bail!("{label} expects one parameter: {what}"),
        [_, extra, ..] => bail_expr!(extra, "{label} expects only one parameter: {what}"),
    }
}

fn layer_idx(params: &[SExpr], s: &ParserState, label: &str) -> Result<usize> {
    let expr = single_param(params, label, "a layer name or index")?;
    let Some(name) = expr.atom() else {
        bail_expr!(expr, "{label}: layer name must be an atom, not a list");
    };
    resolve(name, &s.layer_indexes, s.layer_count)
        .ok_or_else(|| anyhow_expr!(expr, "{label}: unknown layer name or index {name}"))
}

fn profile_idx(params: &[SExpr], s: &ParserState, label: &str) -> Result<usize> {
    let expr = single_param(params, label, "a profile name or index")?;
    let Some(name) = expr.atom() else {
        bail_expr!(expr, "{label}: profile name must be an atom, not a list");
    };
    resolve(name, s.profile_indexes, s.profile_count)
        .ok_or_else(|| anyhow_expr!(expr, "{label}: unknown profile name or index {name}"))
}

/// A name takes priority over an index with the same spelling.
fn resolve(name: &str, indexes: &HashMap<String, usize>, count: usize) -> Option<usize> {
    indexes.get(name).copied().or_else(|| {
        name.parse::<usize>().ok().filter(|&i| i < count)
    })
}

fn parse_on(params: &[SExpr], s: &ParserState) -> Result<KeyAction> {
    const ERR_MSG: &str = "on expects two parameters: an event and a command";
    let (event_expr, command_expr) = match params {
        [ev, cmd] => (ev, cmd),
        [_, _, extra, ..] => bail_expr!(extra, "{ERR_MSG}. Use multi to react to more."),
        _ => bail!(ERR_MSG),
    };
    let event = event_expr
        .atom()
        .and_then(Event::from_name)
        .ok_or_else(|| {
            let names: Vec<_> = Event::ALL.iter().map(|e| e.name()).collect();
            anyhow_expr!(event_expr, "Unknown event. Valid events: {}", names.join(" "))
        })?;
    Ok(KeyAction::On(event, parse_command(command_expr, s)?))
}

fn parse_multi(params: &[SExpr], s: &ParserState) -> Result<KeyAction> {
    if params.is_empty() {
        bail!("multi expects at least one item after it")
    }
    let actions = params
        .iter()
        .map(|ac| parse_action(ac, s))
        .collect::<Result<Vec<_>>>()?;
    Ok(KeyAction::Multi(actions))
}

fn parse_command(expr: &SExpr, s: &ParserState) -> Result<Command> {
    let Some(list) = expr.list() else {
        bail_expr!(expr, "A command must be in parentheses, e.g. (tap a)");
    };
    let Some((cmd_type, params)) = list.split_first() else {
        bail_expr!(expr, "Found an empty command");
    };
    let Some(cmd_type) = cmd_type.atom() else {
        bail_expr!(cmd_type, "Commands must start with a name and not a list");
    };
    let command = match cmd_type {
        "tap" => Command::Tap(key_param(params, "tap")?),
        "press" => Command::Press(key_param(params, "press")?),
        "release" => Command::Release(key_param(params, "release")?),
        "layer" => Command::Layer(layer_idx(params, s, "layer")?),
        LAYER_RESET => {
            no_params(params, LAYER_RESET)?;
            Command::LayerReset
        }
        "profile" => Command::Profile(profile_idx(params, s, "profile")?),
        PROFILE_RESET => {
            no_params(params, PROFILE_RESET)?;
            Command::ProfileReset
        }
        "after" => {
            const ERR_MSG: &str = "after expects two parameters: milliseconds and a command";
            let (ms_expr, inner) = match params {
                [ms, inner] => (ms, inner),
                [_, _, extra, ..] => bail_expr!(extra, "{ERR_MSG}"),
                _ => bail_expr!(expr, "{ERR_MSG}"),
            };
            let ms = ms_expr
                .atom()
                .and_then(|a| a.parse::<u16>().ok())
                .ok_or_else(|| anyhow_expr!(ms_expr, "after: delay must be 0-65535"))?;
            Command::After(ms, Box::new(parse_command(inner, s)?))
        }
        _ => bail_expr!(
            &list[0],
            "Unknown command: {cmd_type}. Valid commands: \
             tap press release layer layer-reset profile profile-reset after"
        ),
    };
    Ok(command)
}

fn key_param(params: &[SExpr], label: &str) -> Result<&'static str> {
    let expr = single_param(params, label, "a key name")?;
    expr.atom()
        .and_then(str_to_key)
        .ok_or_else(|| anyhow_expr!(expr, "{label}: unknown key"))
}
