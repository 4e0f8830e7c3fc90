use super::*;

const GESTURES: &str = "(defsrc k0) \
     (deflayer base (multi (on single (tap s)) (on double (tap d)) (on long (tap l))))";

#[test]
fn tap_and_hold() {
    let result = simulate(
        "(defsrc k0 k1) (deflayer base (on tap (tap x)) (on hold (tap y)))",
        "d:k0 t:50 u:k0 t:50 d:k1 t:300 u:k1 t:50",
    );
    assert_eq!("t:50ms\npress:x\nrelease:x\nt:250ms\npress:y\nrelease:y", result);
}

#[test]
fn hold_fires_once_per_press() {
    let result = simulate(
        "(defsrc k0) (deflayer base (on hold (tap y)))",
        "d:k0 t:1000 u:k0 t:50 d:k0 t:250 u:k0 t:10",
    );
    assert_eq!("t:200ms\npress:y\nrelease:y\nt:1050ms\npress:y\nrelease:y", result);
}

#[test]
fn single_click_waits_for_the_double_window() {
    let result = simulate(GESTURES, "d:k0 t:50 u:k0 t:300");
    assert_eq!("t:251ms\npress:s\nrelease:s", result);
}

#[test]
fn double_click() {
    let result = simulate(GESTURES, "d:k0 t:50 u:k0 t:50 d:k0 t:50 u:k0 t:300");
    assert_eq!("t:100ms\npress:d\nrelease:d", result);
}

#[test]
fn double_click_after_a_slow_first_press() {
    let result = simulate(GESTURES, "d:k0 t:250 u:k0 t:50 d:k0 t:50 u:k0 t:400");
    assert_eq!("t:300ms\npress:d\nrelease:d", result);
}

#[test]
fn single_window_is_measured_from_the_release() {
    let result = simulate(GESTURES, "d:k0 t:250 u:k0 t:300");
    assert_eq!("t:451ms\npress:s\nrelease:s", result);
}

#[test]
fn slow_second_click_is_two_singles() {
    let result = simulate(GESTURES, "d:k0 t:50 u:k0 t:300 d:k0 t:50 u:k0 t:300");
    assert_eq!(
        "t:251ms\npress:s\nrelease:s\nt:350ms\npress:s\nrelease:s",
        result
    );
}

#[test]
fn long_press_blocks_single() {
    let result = simulate(GESTURES, "d:k0 t:600 u:k0 t:300");
    assert_eq!("t:501ms\npress:l\nrelease:l", result);
}

#[test]
fn edges_and_levels() {
    let result = simulate(
        "(defsrc k0)
         (deflayer base
           (multi (on rising-edge (press lsft)) (on falling-edge (release lsft))
                  (on change-input (tap c))))",
        "d:k0 t:30 u:k0 t:30",
    );
    assert_eq!(
        "press:lsft\npress:c\nrelease:c\nt:30ms\nrelease:lsft\npress:c\nrelease:c",
        result
    );
}
