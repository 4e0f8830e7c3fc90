use super::*;

#[test]
fn layer_to_and_back() {
    let result = simulate(
        "(defsrc k0 k1)
         (deflayer base a (layer-to nav))
         (deflayer nav b (layer-back base))",
        "d:k0 t:30 u:k0 t:30 d:k1 t:30 d:k0 t:30 u:k0 t:30 u:k1 t:30 d:k0 t:30 u:k0 t:30",
    );
    assert_eq!(
        "press:a\nt:30ms\nrelease:a\nt:60ms\npress:b\nt:30ms\nrelease:b\n\
         t:60ms\npress:a\nt:30ms\nrelease:a",
        result
    );
}

#[test]
fn layer_reset_goes_back_one_step() {
    let result = simulate(
        "(defsrc k0 k1 k2)
         (deflayer base a (layer-to one) _)
         (deflayer one b (layer-to two) _)
         (deflayer two c _ (layer-reset))",
        "d:k1 t:30 u:k1 t:30 d:k1 t:30 u:k1 t:30 d:k2 t:30 u:k2 t:30 d:k0 t:30 u:k0 t:30",
    );
    assert_eq!("t:180ms\npress:b\nt:30ms\nrelease:b", result);
}

#[test]
fn layers_by_index() {
    let result = simulate(
        "(defsrc k0 k1)
         (deflayer base a (layer-to 1))
         (deflayer nav b (layer-back 0))",
        "d:k1 t:30 d:k0 t:30 u:k0 t:30 u:k1 t:30 d:k0 t:30 u:k0 t:30",
    );
    assert_eq!("t:30ms\npress:b\nt:30ms\nrelease:b\nt:60ms\npress:a\nt:30ms\nrelease:a", result);
}

#[test]
fn release_goes_to_the_new_layer() {
    init_log();
    let mut mp = Macropad::new_from_str(
        "(defsrc k0 k1)
         (deflayer base a (layer-to nav))
         (deflayer nav b XX)",
    )
    .unwrap();
    let out = sim::simulate(&mut mp, "d:k0 t:30 d:k1 t:30 u:k0 t:30").unwrap();
    assert_eq!(out, ["press:a"]);
    assert!(mp.kbd_out().is_held("a"));
    assert_eq!(mp.pad.layer(), 1);
}

#[test]
fn layer_command_from_a_gesture() {
    let result = simulate(
        "(defsrc k0 k1)
         (deflayer base (on double (layer nav)) a)
         (deflayer nav (on long (layer-reset)) b)",
        "d:k0 t:30 u:k0 t:30 d:k0 t:30 u:k0 t:30 d:k1 t:30 u:k1 t:30",
    );
    assert_eq!("t:120ms\npress:b\nt:30ms\nrelease:b", result);
}
