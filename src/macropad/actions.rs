//! Turns parsed key actions into engine actions that drive [`KbdOut`].

use macropad_engine::action::{self, Ctx};
use macropad_engine::{Action, KeyOutput, Keymap};
use macropad_parser::key_action::{Command, KeyAction};

use crate::kbd_out::KbdOut;

pub(crate) fn build_keymap(actions: &[KeyAction]) -> Keymap<KbdOut> {
    actions.iter().map(build_action).collect()
}

/// `None` for an unbound key.
pub(crate) fn build_action(ac: &KeyAction) -> Option<Action<KbdOut>> {
    use KeyAction::*;
    Some(match ac {
        Unbound => return None,
        PressTo(k) => action::press_to(*k),
        LayerTo(l) => action::layer_to(*l),
        LayerBack(l) => action::layer_back(*l),
        LayerReset => action::layer_reset(),
        ProfileTo(p) => action::profile_to(*p),
        ProfileReset => action::profile_reset(),
        On(event, cmd) => {
            let cmd = cmd.clone();
            action::on(*event, move |ctx| run_command(&cmd, ctx))
        }
        Multi(acs) => action::multi(acs.iter().filter_map(build_action).collect()),
    })
}

fn run_command(cmd: &Command, ctx: &mut Ctx<'_, KbdOut>) {
    match cmd {
        Command::Tap(k) => ctx.host().tap(*k),
        Command::Press(k) => ctx.host().press(*k),
        Command::Release(k) => ctx.host().release(*k),
        Command::Layer(l) => ctx.set_layer(*l),
        Command::LayerReset => ctx.reset_layer(),
        Command::Profile(p) => ctx.set_profile(*p),
        Command::ProfileReset => ctx.reset_profile(),
        Command::After(delay, inner) => {
            let inner = (**inner).clone();
            log::trace!("deferring {inner:?} by {delay}ms");
            ctx.after(u32::from(*delay), move |ctx| run_command(&inner, ctx));
        }
    }
}
