//! Turns raw property readings into display strings using the definition blob
//! the controller embeds alongside each property.
//!
//! Definitions come in two shapes:
//!
//! * enum style, a list of options: `[{"value":"0","en_title":"OFF"},{"value":"1","en_title":"ON"}]`
//! * range style, a list of titled attributes, one of which names the unit:
//!   `[{"title":"最小值","value":"0"},{"title":"单位","value":"V"}]`
//!
//! Option values are compared to the raw reading in string form, so `1` and
//! `"1"` are the same value. Firmware mixes both.

use crate::prelude::*;
use crate::controller::message::OptionDescriptor;

use serde::Deserialize;

const TEMPERATURE_KEY: &str = "temperature";
const CELSIUS: &str = "°C";

/// String form of a raw JSON value as shown to the user.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Renders `raw` for display. Never fails: anything that cannot be understood
/// falls back to the raw value's string form.
pub fn interpret(raw: &Value, definition: Option<&Value>, unikey: &str) -> String {
    let raw_string = value_to_string(raw);

    let definition = match definition {
        None | Some(Value::Null) => return raw_string,
        Some(Value::String(s)) if s.trim().is_empty() => return raw_string,
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(parsed) => parsed,
            Err(err) => {
                trace!("{}: unparsable definition {:?}: {}", unikey, s, err);
                return raw_string;
            }
        },
        Some(other) => other.clone(),
    };

    let Value::Array(entries) = definition else {
        return raw_string;
    };

    let descriptors: Vec<OptionDescriptor> = entries
        .iter()
        .filter(|entry| entry.is_object())
        .filter_map(|entry| OptionDescriptor::deserialize(entry).ok())
        .collect();

    // the last unit entry wins
    if let Some(marker) = descriptors.iter().rev().find(|d| d.is_unit_marker()) {
        let unit = value_to_string(&marker.value);
        return with_unit(raw_string, &unit, unikey);
    }

    if descriptors.len() == entries.len() {
        return from_options(raw, raw_string, &descriptors);
    }

    raw_string
}

fn with_unit(raw_string: String, unit: &str, unikey: &str) -> String {
    if unit.is_empty() {
        raw_string
    } else if unikey == TEMPERATURE_KEY {
        format!("{} {}", raw_string, CELSIUS)
    } else {
        format!("{} {}", raw_string, unit)
    }
}

fn from_options(raw: &Value, raw_string: String, options: &[OptionDescriptor]) -> String {
    if is_binary(options) {
        if let Some(option) = options.iter().find(|o| o.matches(raw)) {
            let status = option.display_title().unwrap_or_else(|| {
                let literal = if raw_string == "1" { "ON" } else { "OFF" };
                literal.to_owned()
            });
            return format!("{} ({})", status, raw_string);
        }
    }

    options
        .iter()
        .filter(|o| o.matches(raw))
        .find_map(|o| o.display_title())
        .map(|title| format!("{} ({})", title, raw_string))
        .unwrap_or(raw_string)
}

/// Exactly two options valued "0" and "1", in either order.
fn is_binary(options: &[OptionDescriptor]) -> bool {
    let has = |wanted: &str| options.iter().any(|o| value_to_string(&o.value) == wanted);
    options.len() == 2 && has("0") && has("1")
}
