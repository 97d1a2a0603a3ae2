// src/core/expander.rs

use crate::models::{Constants, Environment};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CONSTANT_NAME: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("constant name pattern is valid");
}

/// A constant name must be usable as a shell variable name.
pub fn is_valid_constant_name(name: &str) -> bool {
    CONSTANT_NAME.is_match(name)
}

/// Substitutes every `$NAME` and `${NAME}` in `command` with the constant's value.
///
/// This is plain text replacement with no quoting and no awareness of shell syntax. Names are
/// applied longest first (ties broken alphabetically), so `$FOOBAR` is not clobbered by a
/// constant called `FOO`. A value that itself contains a later constant's reference will be
/// substituted again by that later pass; callers should not rely on either behaviour.
pub fn expand(command: &str, constants: &Constants) -> String {
    if !command.contains('$') || constants.is_empty() {
        return command.to_string();
    }

    let mut names: Vec<&String> = constants.keys().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut expanded = command.to_string();
    for name in names {
        let Some(value) = constants.get(name) else {
            continue;
        };
        expanded = expanded
            .replace(&format!("${{{}}}", name), value)
            .replace(&format!("${}", name), value);
    }
    expanded
}

/// Returns `base` with every constant exported as an environment variable, overwriting any
/// existing variable of the same name.
pub fn build_environment(base: &Environment, constants: &Constants) -> Environment {
    let mut env = base.clone();
    env.extend(
        constants
            .iter()
            .map(|(name, value)| (name.into(), value.into())),
    );
    env
}
