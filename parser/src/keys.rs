//! Names of the host keys that actions can press.
//!
//! Every accepted spelling maps to one canonical name, which is what the runtime passes to the
//! host output.

/// Returns the canonical name of the key `s`, or `None` if `s` is not a known key.
pub fn str_to_key(s: &str) -> Option<&'static str> {
    Some(match s {
        "a" => "a",
        "b" => "b",
        "c" => "c",
        "d" => "d",
        "e" => "e",
        "f" => "f",
        "g" => "g",
        "h" => "h",
        "i" => "i",
        "j" => "j",
        "k" => "k",
        "l" => "l",
        "m" => "m",
        "n" => "n",
        "o" => "o",
        "p" => "p",
        "q" => "q",
        "r" => "r",
        "s" => "s",
        "t" => "t",
        "u" => "u",
        "v" => "v",
        "w" => "w",
        "x" => "x",
        "y" => "y",
        "z" => "z",
        "1" => "1",
        "2" => "2",
        "3" => "3",
        "4" => "4",
        "5" => "5",
        "6" => "6",
        "7" => "7",
        "8" => "8",
        "9" => "9",
        "0" => "0",
        "grv" | "grave" => "grv",
        "min" | "minus" => "min",
        "eql" | "equal" => "eql",
        "lbrc" | "[" => "lbrc",
        "rbrc" | "]" => "rbrc",
        "bksl" | "backslash" => "bksl",
        "scln" | "semicolon" => "scln",
        "apo" | "apos" | "quote" => "apo",
        "comm" | "comma" => "comm",
        "." | "dot" | "period" => ".",
        "/" | "slash" => "/",
        "esc" | "escape" => "esc",
        "tab" => "tab",
        "caps" | "capslock" => "caps",
        "spc" | "space" => "spc",
        "ret" | "return" | "ent" | "enter" => "ret",
        "bspc" | "bks" | "backspace" => "bspc",
        "del" | "delete" => "del",
        "ins" | "insert" => "ins",
        "home" => "home",
        "end" => "end",
        "pgup" | "pageup" => "pgup",
        "pgdn" | "pagedown" => "pgdn",
        "left" | "lft" => "left",
        "right" | "rght" => "right",
        "up" => "up",
        "down" => "down",
        "lsft" | "lshift" | "sft" | "shift" => "lsft",
        "rsft" | "rshift" => "rsft",
        "lctl" | "lctrl" | "ctl" | "ctrl" => "lctl",
        "rctl" | "rctrl" => "rctl",
        "lalt" | "alt" => "lalt",
        "ralt" | "altgr" => "ralt",
        "lmet" | "lmeta" | "lgui" | "lwin" | "met" => "lmet",
        "rmet" | "rmeta" | "rgui" | "rwin" => "rmet",
        "menu" | "comp" => "menu",
        "prnt" | "print" | "sys" => "prnt",
        "slck" | "scrolllock" => "slck",
        "pause" => "pause",
        "nlck" | "numlock" => "nlck",
        "kp0" => "kp0",
        "kp1" => "kp1",
        "kp2" => "kp2",
        "kp3" => "kp3",
        "kp4" => "kp4",
        "kp5" => "kp5",
        "kp6" => "kp6",
        "kp7" => "kp7",
        "kp8" => "kp8",
        "kp9" => "kp9",
        "kp/" => "kp/",
        "kp*" => "kp*",
        "kp-" => "kp-",
        "kp+" => "kp+",
        "kp." => "kp.",
        "kprt" | "kpenter" => "kprt",
        "f1" => "f1",
        "f2" => "f2",
        "f3" => "f3",
        "f4" => "f4",
        "f5" => "f5",
        "f6" => "f6",
        "f7" => "f7",
        "f8" => "f8",
        "f9" => "f9",
        "f10" => "f10",
        "f11" => "f11",
        "f12" => "f12",
        "f13" => "f13",
        "f14" => "f14",
        "f15" => "f15",
        "f16" => "f16",
        "f17" => "f17",
        "f18" => "f18",
        "f19" => "f19",
        "f20" => "f20",
        "f21" => "f21",
        "f22" => "f22",
        "f23" => "f23",
        "f24" => "f24",
        "mute" => "mute",
        "volu" | "volumeup" => "volu",
        "voldwn" | "vold" | "volumedown" => "voldwn",
        "pp" | "playpause" => "pp",
        "next" | "nexttrack" => "next",
        "prev" | "previoustrack" => "prev",
        "brup" | "brightnessup" => "brup",
        "brdown" | "brdwn" | "brightnessdown" => "brdown",
        _ => return None,
    })
}
