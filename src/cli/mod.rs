use clap::Parser;

/// Routes an action name to its handler.
pub mod dispatcher;
/// One handler per action.
pub mod handlers;

const HELP_TEMPLATE: &str = "\
<title>switchcraft</title> {version}
Run your own shell commands whenever the desktop switches between light and dark mode.

<title>USAGE:</title>
    switchcraft <cmd><action></cmd> [args...]

<group>MONITOR</group>
    <cmd>watch</cmd>                           Run commands on every theme change <dim>(alias: --background)</dim>
    <cmd>apply</cmd> [light|dark]              Run a theme's commands right now <dim>(default: current theme)</dim>
    <cmd>status</cmd>                          Show the current theme, configuration and autostart state

<group>COMMANDS</group>
    <cmd>list</cmd> [light|dark]               List commands with their position <dim>(alias: ls)</dim>
    <cmd>add</cmd> <theme> [--disabled] <cmd...>   Append a command to a theme
    <cmd>edit</cmd> <theme> <n> <cmd...>         Replace the command at position <hl>n</hl>
    <cmd>enable</cmd> | <cmd>disable</cmd> <theme> <n>     Toggle the command at position <hl>n</hl>
    <cmd>remove</cmd> <theme> <n> [--yes]        <err>Delete</err> the command at position <hl>n</hl> <dim>(alias: rm)</dim>

<group>CONSTANTS</group>
    <cmd>const list</cmd>                      List constants
    <cmd>const set</cmd> <NAME> <value>          Define a constant, usable as <hl>$NAME</hl> or <hl>${NAME}</hl>
    <cmd>const rename</cmd> <OLD> <NEW>          Rename a constant
    <cmd>const unset</cmd> <NAME> [--yes]        <err>Delete</err> a constant

<group>SESSION</group>
    <cmd>autostart</cmd> on|off|status          Start the monitor automatically at login

<dim>Logging is controlled with SWITCHCRAFT_LOG (e.g. SWITCHCRAFT_LOG=debug).
The configuration directory can be moved with SWITCHCRAFT_CONFIG_DIR.</dim>
";

/// Builds the color-aware full help string at runtime.
pub fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let err = if use_colors { "\x1b[91m" } else { "" }; // Bright Red
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = HELP_TEMPLATE
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<err>", err)
        .replace("</err>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// switchcraft: run shell commands when the desktop theme changes.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The action followed by its arguments. Each handler parses its own arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
