use super::*;

fn init_log() {
    use simplelog::*;
    use std::sync::OnceLock;
    static LOG_INIT: OnceLock<()> = OnceLock::new();
    LOG_INIT.get_or_init(|| {
        let mut log_cfg = ConfigBuilder::new();
        log_cfg.set_time_format_rfc3339();
        let _ = CombinedLogger::init(vec![TermLogger::new(
            // Note: set to a different level to see logs in tests.
            LevelFilter::Off,
            log_cfg.build(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )]);
    });
}

fn parse_str(source: &str) -> Result<Cfg> {
    init_log();
    let exprs = sexpr::parse(source, "test").expect("valid syntax");
    parse_root_exprs(&exprs)
}

fn parse_err(source: &str) -> ParseError {
    parse_str(source).expect_err("should fail")
}

/// The source text the error points at.
fn err_text(source: &str) -> String {
    let e = parse_err(source);
    let span = e.span.unwrap_or_else(|| panic!("no span for: {}", e.msg));
    source[span.start()..span.end()].to_string()
}

#[test]
fn parse_simple() {
    let cfg = parse_str(
        "
(defcfg
  hold-threshold 250
  debounce-time 5
  log-layer-changes no)
(defsrc k0 k1 k2)
(deflayer base a (layer-to fn) XX)
(deflayer fn ret (layer-back base) _)
",
    )
    .unwrap();
    assert_eq!(cfg.keys, vec!["k0", "k1", "k2"]);
    assert_eq!(cfg.options.thresholds.hold_threshold, 250);
    assert_eq!(cfg.options.thresholds.debounce_time, 5);
    assert_eq!(cfg.options.thresholds.long_threshold, 500);
    assert!(!cfg.options.log_layer_changes);
    assert_eq!(cfg.profiles.len(), 1);
    assert_eq!(cfg.profiles[0].name, DEFAULT_PROFILE);
    let layers = &cfg.profiles[0].layers;
    assert_eq!(layers[0].name, "base");
    assert_eq!(
        layers[0].actions,
        vec![
            KeyAction::PressTo("a"),
            KeyAction::LayerTo(1),
            KeyAction::Unbound
        ]
    );
    assert_eq!(
        layers[1].actions,
        vec![
            KeyAction::PressTo("ret"),
            KeyAction::LayerBack(0),
            KeyAction::Unbound
        ]
    );
}

#[test]
fn defcfg_is_optional() {
    let cfg = parse_str("(defsrc k0) (deflayer base a)").unwrap();
    assert_eq!(cfg.options, CfgOptions::default());
}

#[test]
fn gestures_and_commands() {
    let cfg = parse_str(
        "
(defsrc k0)
(deflayer base
  (multi
    a
    (on double (tap esc))
    (on long (after 300 (layer 1)))
    (on hold (profile 0))
    (on single (layer-reset))
    (on tap (press lsft))
    (on falling-edge (release lshift))
    (layer-reset)
    (profile-to default)
    (profile-reset)))
(deflayer other _)
",
    )
    .unwrap();
    use Command::*;
    assert_eq!(
        cfg.profiles[0].layers[0].actions[0],
        KeyAction::Multi(vec![
            KeyAction::PressTo("a"),
            KeyAction::On(Event::Double, Tap("esc")),
            KeyAction::On(Event::Long, After(300, Box::new(Layer(1)))),
            KeyAction::On(Event::Hold, Profile(0)),
            KeyAction::On(Event::Single, LayerReset),
            KeyAction::On(Event::Tap, Press("lsft")),
            KeyAction::On(Event::FallingEdge, Release("lsft")),
            KeyAction::LayerReset,
            KeyAction::ProfileTo(0),
            KeyAction::ProfileReset,
        ])
    );
}

#[test]
fn profiles() {
    let cfg = parse_str(
        "
(defsrc k0 k1)
(defprofile work
  (deflayer base a (profile-to game))
  (deflayer nav left (layer-to base)))
(defprofile game
  (deflayer main w (profile-to work))
  (deflayer alt s (layer-to 0)))
",
    )
    .unwrap();
    assert_eq!(cfg.profiles.len(), 2);
    assert_eq!(cfg.layer_count(), 2);
    assert_eq!(cfg.profiles[1].name, "game");
    assert_eq!(cfg.profiles[0].layers[0].actions[1], KeyAction::ProfileTo(1));
    assert_eq!(cfg.profiles[1].layers[0].actions[1], KeyAction::ProfileTo(0));
    assert_eq!(cfg.profiles[1].layers[1].actions[1], KeyAction::LayerTo(0));
}

#[test]
fn layer_names_are_per_profile() {
    let source = "
(defsrc k0)
(defprofile one (deflayer base (layer-to base)))
(defprofile two (deflayer main (layer-to base)))
";
    assert_eq!(err_text(source), "base");
    assert!(parse_err(source).msg.contains("unknown layer"));
}

#[test]
fn key_index_by_name_or_number() {
    let cfg = parse_str("(defsrc left mid right) (deflayer base _ _ _)").unwrap();
    assert_eq!(cfg.key_index("mid"), Some(1));
    assert_eq!(cfg.key_index("2"), Some(2));
    assert_eq!(cfg.key_index("3"), None);
    assert_eq!(cfg.key_index("nope"), None);
}

#[test]
fn layer_length_must_match_defsrc() {
    let source = "(defsrc k0 k1) (deflayer short a)";
    assert_eq!(err_text(source), "short");
    assert!(parse_err(source).msg.contains("1 item(s), but defsrc has 2"));
}

#[test]
fn profiles_need_equal_layer_counts() {
    let source = "
(defsrc k0)
(defprofile one (deflayer a _) (deflayer b _))
(defprofile two (deflayer a _))
";
    assert_eq!(err_text(source), "two");
}

#[test]
fn top_level_layers_and_profiles_do_not_mix() {
    let source = "(defsrc k0) (deflayer a _) (defprofile p (deflayer b _))";
    assert_eq!(err_text(source), "(defprofile p (deflayer b _))");
}

#[test]
fn duplicates_are_rejected() {
    assert_eq!(err_text("(defsrc k0 k0) (deflayer a _ _)"), "k0");
    assert_eq!(err_text("(defsrc k0) (deflayer a _) (deflayer a _)"), "a");
    assert_eq!(
        err_text("(defsrc k0) (defprofile p (deflayer a _)) (defprofile p (deflayer a _))"),
        "p"
    );
    let source = "(defcfg debounce-time 1 debounce-time 2) (defsrc k0) (deflayer a _)";
    assert!(parse_err(source).msg.contains("Duplicate defcfg option"));
    assert!(parse_err("(defsrc k0) (defsrc k1) (deflayer a _)")
        .msg
        .contains("Exactly one defsrc"));
}

#[test]
fn bad_defcfg_values() {
    assert_eq!(
        err_text("(defcfg hold-threshold -1) (defsrc k0) (deflayer a _)"),
        "-1"
    );
    assert_eq!(
        err_text("(defcfg log-layer-changes maybe) (defsrc k0) (deflayer a _)"),
        "maybe"
    );
    assert_eq!(
        err_text("(defcfg repeat-rate 30) (defsrc k0) (deflayer a _)"),
        "repeat-rate"
    );
    assert!(parse_err("(defcfg hold-threshold) (defsrc k0) (deflayer a _)")
        .msg
        .contains("missing a value"));
}

#[test]
fn bad_actions_point_at_the_culprit() {
    let base = |action: &str| format!("(defsrc k0) (deflayer a {action})");
    assert_eq!(err_text(&base("bogus")), "bogus");
    assert_eq!(err_text(&base("layer-to")), "layer-to");
    assert_eq!(err_text(&base("(frobnicate 1)")), "frobnicate");
    assert_eq!(err_text(&base("(layer-to 1)")), "1");
    assert_eq!(err_text(&base("(layer-to)")), "(layer-to)");
    assert_eq!(err_text(&base("(layer-reset now)")), "now");
    assert_eq!(err_text(&base("(on twice (tap a))")), "twice");
    assert_eq!(err_text(&base("(on tap a)")), "a");
    assert_eq!(err_text(&base("(on tap (tap a) (tap b))")), "(tap b)");
    assert_eq!(err_text(&base("(on tap (jump a))")), "jump");
    assert_eq!(err_text(&base("(on tap (tap nokey))")), "nokey");
    assert_eq!(err_text(&base("(on tap (after soon (tap a)))")), "soon");
    assert_eq!(err_text(&base("(multi)")), "(multi)");
    assert_eq!(err_text(&base("(profile-to work)")), "work");
}

#[test]
fn unknown_top_level_items() {
    assert_eq!(
        err_text("(defsrc k0) (deflayer a _) (defalias x y)"),
        "(defalias x y)"
    );
    assert!(parse_err("(defsrc k0)").msg.contains("No deflayer found"));
    assert!(parse_err("(deflayer a _)").msg.contains("defsrc"));
}

#[test]
fn cfg_error_carries_the_source() {
    let source = "(defsrc k0) (deflayer a bogus)";
    let err = parse_cfg_raw_string(source, "test.kbd").unwrap_err();
    assert!(err.help_msg.starts_with("Unknown key/action: bogus"));
    assert_eq!(err.file_name.as_deref(), Some("test.kbd"));
    assert_eq!(err.file_content.as_deref(), Some(source));
    let span = err.err_span.expect("span");
    assert_eq!(&source[span.offset()..span.offset() + span.len()], "bogus");
    assert!(new_from_str(source).is_err());
    assert!(new_from_str("(defsrc k0) (deflayer a b)").is_ok());
}
