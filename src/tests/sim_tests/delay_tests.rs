use super::*;

#[test]
fn after_taps_later() {
    let result = simulate(
        "(defsrc k0) (deflayer base (on rising-edge (after 100 (tap x))))",
        "d:k0 t:50 u:k0 t:100",
    );
    assert_eq!("t:100ms\npress:x\nrelease:x", result);
}

#[test]
fn nested_after() {
    let result = simulate(
        "(defsrc k0) (deflayer base (on tap (after 50 (after 50 (tap x)))))",
        "d:k0 t:50 u:k0 t:200",
    );
    assert_eq!("t:150ms\npress:x\nrelease:x", result);
}

#[test]
fn zero_delay_runs_next_tick() {
    let result = simulate(
        "(defsrc k0) (deflayer base (on rising-edge (after 0 (after 0 (tap x)))))",
        "d:k0 t:5",
    );
    assert_eq!("t:1ms\npress:x\nrelease:x", result);
}

#[test]
fn pending_tasks_wait_for_ticks() {
    init_log();
    let mut mp =
        Macropad::new_from_str("(defsrc k0) (deflayer base (on rising-edge (after 10 (tap x))))")
            .unwrap();
    let out = sim::simulate(&mut mp, "d:k0 t:5").unwrap();
    assert!(out.is_empty());
    assert_eq!(mp.pad.pending_tasks(), 1);
    let out = sim::simulate(&mut mp, "t:10").unwrap();
    assert_eq!(out, ["t:10ms", "press:x", "release:x"]);
    assert_eq!(mp.pad.pending_tasks(), 0);
}
