use super::*;

mod delay_tests;
mod gesture_sim_tests;
mod layer_sim_tests;
mod profile_sim_tests;

fn simulate(cfg: &str, sim: &str) -> String {
    init_log();
    let mut mp = Macropad::new_from_str(cfg).expect("failed to parse cfg");
    sim::simulate(&mut mp, sim)
        .expect("simulation runs")
        .join("\n")
}

#[test]
fn press_follows_the_key() {
    let result = simulate("(defsrc k0) (deflayer base a)", "d:k0 t:50 u:k0 t:50");
    assert_eq!("press:a\nt:50ms\nrelease:a", result);
}

#[test]
fn keys_by_index() {
    let result = simulate("(defsrc k0 k1) (deflayer base a b)", "d:1 t:30 u:1 t:30");
    assert_eq!("press:b\nt:30ms\nrelease:b", result);
}

#[test]
fn bounce_is_filtered() {
    let result = simulate(
        "(defsrc k0) (deflayer base a)",
        "d:k0 t:5 u:k0 t:3 d:k0 t:40 u:k0 t:50",
    );
    assert_eq!("press:a\nt:48ms\nrelease:a", result);
}

#[test]
fn release_inside_debounce_window_is_not_lost() {
    let result = simulate("(defsrc k0) (deflayer base a)", "d:k0 t:10 u:k0 t:1000");
    assert_eq!("press:a\nt:20ms\nrelease:a", result);
}

#[test]
fn quick_repress_is_not_lost() {
    let result = simulate(
        "(defsrc k0) (deflayer base a)",
        "d:k0 t:100 u:k0 t:10 d:k0 t:300 u:k0 t:100",
    );
    assert_eq!(
        "press:a\nt:100ms\nrelease:a\nt:20ms\npress:a\nt:290ms\nrelease:a",
        result
    );
}

#[test]
fn unbound_keys_do_nothing() {
    let result = simulate("(defsrc k0 k1) (deflayer base _ XX)", "d:k0 d:k1 t:600 u:k0 u:k1 t:600");
    assert_eq!("", result);
}

#[test]
fn thresholds_come_from_defcfg() {
    let result = simulate(
        "(defcfg hold-threshold 100 debounce-time 5)
         (defsrc k0)
         (deflayer base (on hold (tap h)))",
        "d:k0 t:150 u:k0 t:10",
    );
    assert_eq!("t:100ms\npress:h\nrelease:h", result);
}

#[test]
fn comments_in_simulations() {
    let result = simulate(
        "(defsrc k0) (deflayer base a)",
        "d:k0 t:10 ;; u:k0 t:10
         tick:10 up:k0 tick:10",
    );
    assert_eq!("press:a\nt:20ms\nrelease:a", result);
}

#[test]
fn bad_simulations_are_errors() {
    init_log();
    let mut mp = Macropad::new_from_str("(defsrc k0) (deflayer base a)").unwrap();
    assert!(sim::simulate(&mut mp, "d:k9").is_err());
    assert!(sim::simulate(&mut mp, "d:1").is_err());
    assert!(sim::simulate(&mut mp, "t:ten").is_err());
    assert!(sim::simulate(&mut mp, "x:k0").is_err());
    assert!(sim::simulate(&mut mp, "k0").is_err());
    assert!(sim::simulate(&mut mp, "d:k0 t:10").is_ok());
}

#[test]
fn bad_configs_are_errors() {
    init_log();
    assert!(Macropad::new_from_str("(defsrc k0) (deflayer base a b)").is_err());
    assert!(Macropad::new_from_str("(defsrc k0)").is_err());
}
