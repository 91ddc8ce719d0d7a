use crate::prelude::*;

const ID_WIDTH: usize = 4;
const MIN_KEY_WIDTH: usize = 20;
const NAME_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 30;
const RAW_WIDTH: usize = 10;

pub const NO_INFORMATION: &str = "No information available";

/// Renders properties as the fixed width table printed by `get-info`.
///
/// Columns are padded, never truncated, so an over-long value pushes the
/// rest of its row to the right.
pub fn format_table(properties: &[PropertyRecord]) -> String {
    if properties.is_empty() {
        return NO_INFORMATION.to_string();
    }

    let key_width = properties
        .iter()
        .map(|p| p.unikey.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_KEY_WIDTH);

    let separator = "-".repeat(ID_WIDTH + key_width + NAME_WIDTH + VALUE_WIDTH + RAW_WIDTH + 12);

    let mut lines = vec![
        String::new(),
        separator.clone(),
        format!(
            "{:<ID_WIDTH$} | {:<key_width$} | {:<NAME_WIDTH$} | {:<VALUE_WIDTH$} | {:<RAW_WIDTH$}",
            "ID", "Property Key", "Human Name", "Value", "Raw Value"
        ),
        separator.clone(),
    ];

    for property in properties {
        lines.push(format!(
            "{:>ID_WIDTH$} | {:<key_width$} | {:<NAME_WIDTH$} | {:<VALUE_WIDTH$} | {:<RAW_WIDTH$}",
            property.property_id,
            property.unikey,
            property.human_name(),
            property.interpreted_value(),
            property.raw_value(),
        ));
    }

    lines.push(separator);
    lines.push(String::new());

    lines.join("\n")
}
