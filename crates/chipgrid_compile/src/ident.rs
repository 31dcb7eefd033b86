//! Identifiers in generated program text.
//!
//! Every chip id, port, and constant name is folded into a valid identifier
//! by collapsing each run of characters other than ASCII letters and digits
//! into a single `_`. Variables are then named
//! `<kind>_<chip>_<port>`: `I_` for inputs, `O_` for outputs, `C_` for
//! constants.

use chipgrid_ir::{ChipId, Pin, TypeName};

/// Collapses runs of non-alphanumeric characters into `_`.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

fn var(kind: &str, chip: &str, name: &str) -> String {
    format!("{kind}_{}_{}", sanitize(chip), sanitize(name))
}

/// Input variable of a port.
pub fn input_var(chip: &str, port: &str) -> String {
    var("I", chip, port)
}

/// Output variable of a port.
pub fn output_var(chip: &str, port: &str) -> String {
    var("O", chip, port)
}

/// Constant variable of a chip or type.
pub fn constant_var(chip: &str, name: &str) -> String {
    var("C", chip, name)
}

/// Variable that carries the value at `pin`.
pub fn pin_var(pin: &Pin) -> String {
    if pin.output {
        output_var(pin.chip.as_str(), &pin.name)
    } else {
        input_var(pin.chip.as_str(), &pin.name)
    }
}

/// Field holding the compiled object of a custom child.
pub fn chip_object(chip: &ChipId) -> String {
    format!("CHIP_{}", sanitize(chip.as_str()))
}

/// Name of the compiled class of a chip type.
pub fn type_class(name: &TypeName) -> String {
    let base = sanitize(name.as_str());
    if base.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{base}Chip")
    } else {
        format!("{base}Chip")
    }
}
