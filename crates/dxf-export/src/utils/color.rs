use std::io::IsTerminal;

/// Colour is off when asked for (`--no-color`, `NO_COLOR`) or when stdout is
/// piped into another program
pub fn color_enabled(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

pub fn init_color(no_color_flag: bool) {
    if !color_enabled(no_color_flag) {
        colored::control::set_override(false);
    }
}
