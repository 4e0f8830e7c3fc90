use macropad_engine::Thresholds;

use super::error::*;
use super::sexpr::SExpr;
use super::HashSet;
use crate::cfg::check_first_expr;
use crate::{anyhow_expr, bail_expr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgOptions {
    pub thresholds: Thresholds,
    pub log_layer_changes: bool,
}

impl Default for CfgOptions {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            log_layer_changes: true,
        }
    }
}

/// Parse configuration entries from an expression starting with defcfg.
pub fn parse_defcfg(expr: &[SExpr]) -> Result<CfgOptions> {
    let mut seen_keys = HashSet::default();
    let mut cfg = CfgOptions::default();
    let mut exprs = check_first_expr(expr.iter(), "defcfg")?;
    // Read k-v pairs from the configuration
    loop {
        let key = match exprs.next() {
            Some(k) => k,
            None => return Ok(cfg),
        };
        let val = match exprs.next() {
            Some(v) => v,
            None => bail_expr!(key, "Found a defcfg option missing a value"),
        };
        let SExpr::Atom(k) = key else {
            bail_expr!(key, "Lists are not allowed as defcfg option names");
        };
        if !seen_keys.insert(k.t.as_str()) {
            bail_expr!(key, "Duplicate defcfg option {}", k.t);
        }
        let th = &mut cfg.thresholds;
        match k.t.as_str() {
            label @ "long-threshold" => {
                th.long_threshold = parse_cfg_val_u16(val, label)?.into();
            }
            label @ "double-threshold" => {
                th.double_threshold = parse_cfg_val_u16(val, label)?.into();
            }
            label @ "hold-threshold" => {
                th.hold_threshold = parse_cfg_val_u16(val, label)?.into();
            }
            label @ "debounce-time" => {
                th.debounce_time = parse_cfg_val_u16(val, label)?.into();
            }
            label @ "log-layer-changes" => {
                cfg.log_layer_changes = parse_defcfg_val_bool(val, label)?;
            }
            _ => bail_expr!(key, "Unknown defcfg option {}", k.t),
        }
    }
}

pub const FALSE_VALUES: [&str; 3] = ["no", "false", "0"];
pub const TRUE_VALUES: [&str; 3] = ["yes", "true", "1"];
pub const BOOLEAN_VALUES: [&str; 6] = ["yes", "true", "1", "no", "false", "0"];

fn parse_defcfg_val_bool(expr: &SExpr, label: &str) -> Result<bool> {
    match &expr {
        SExpr::Atom(v) => {
            let val = v.t.trim_matches('"').to_ascii_lowercase();
            if TRUE_VALUES.contains(&val.as_str()) {
                Ok(true)
            } else if FALSE_VALUES.contains(&val.as_str()) {
                Ok(false)
            } else {
                bail_expr!(
                    expr,
                    "The value for {label} must be one of: {}",
                    BOOLEAN_VALUES.join(", ")
                );
            }
        }
        SExpr::List(_) => {
            bail_expr!(
                expr,
                "The value for {label} cannot be a list, it must be one of: {}",
                BOOLEAN_VALUES.join(", "),
            )
        }
    }
}

fn parse_cfg_val_u16(expr: &SExpr, label: &str) -> Result<u16> {
    match &expr {
        SExpr::Atom(v) => v
            .t
            .trim_matches('"')
            .parse::<u16>()
            .map_err(|_| anyhow_expr!(expr, "{label} must be 0-65535")),
        SExpr::List(_) => {
            bail_expr!(
                expr,
                "The value for {label} cannot be a list, it must be a number 0-65535",
            )
        }
    }
}
