use super::*;

const PROFILES: &str = "(defsrc k0 k1)
     (defprofile work (deflayer base a (profile-to game)))
     (defprofile game (deflayer base b (profile-reset)))";

#[test]
fn profile_to_and_reset() {
    let result = simulate(
        PROFILES,
        "d:k0 t:30 u:k0 t:30 d:k1 t:30 u:k1 t:30
         d:k0 t:30 u:k0 t:30 d:k1 t:30 u:k1 t:30
         d:k0 t:30 u:k0 t:30",
    );
    assert_eq!(
        "press:a\nt:30ms\nrelease:a\nt:90ms\npress:b\nt:30ms\nrelease:b\n\
         t:90ms\npress:a\nt:30ms\nrelease:a",
        result
    );
}

#[test]
fn profile_switch_keeps_the_layer_index() {
    init_log();
    let mut mp = Macropad::new_from_str(
        "(defsrc k0 k1 k2)
         (defprofile one
           (deflayer base a (layer-to fn) _)
           (deflayer fn b _ (profile-to two)))
         (defprofile two
           (deflayer main c _ _)
           (deflayer extra d _ (profile-to one)))",
    )
    .unwrap();
    let out = sim::simulate(&mut mp, "d:k1 t:30 u:k1 t:30 d:k2 t:30 u:k2 t:30 d:k0 t:30 u:k0 t:30")
        .unwrap();
    assert_eq!(out, ["t:120ms", "press:d", "t:30ms", "release:d"]);
    assert_eq!(mp.pad.profile(), 1);
    assert_eq!(mp.pad.layer(), 1);
    assert_eq!(mp.layer_name(1, 1), "extra");
    assert_eq!(mp.profile_name(1), "two");
}

#[test]
fn profile_command_after_a_delay() {
    let result = simulate(
        "(defsrc k0 k1)
         (defprofile work (deflayer base (on tap (after 100 (profile game))) a))
         (defprofile game (deflayer base _ b))",
        "d:k0 t:30 u:k0 t:30 d:k1 t:30 u:k1 t:100 d:k1 t:30 u:k1 t:30",
    );
    assert_eq!(
        "t:60ms\npress:a\nt:30ms\nrelease:a\nt:100ms\npress:b\nt:30ms\nrelease:b",
        result
    );
}
