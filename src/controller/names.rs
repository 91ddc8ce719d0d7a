/// Human readable name for a property `unikey`, if we know one.
pub fn human_name(unikey: &str) -> Option<&'static str> {
    let name = match unikey {
        "solar_model_type" => "Device type",
        "dianya" => "Battery voltage",
        "cddl" => "Charging current",
        "fddl" => "Discharge current",
        "temperature" => "Temperature",
        "solar_status" => "Solar panel status",
        "work_status" => "Load status",
        "power_status" => "Wind power status",
        "total_power" => "Total energy recharged",
        "total_power_num" => "Energy reset count",
        "battery_type" => "Battery type",
        "timing_hour" => "Timer hours",
        "timing_min" => "Timer minutes",
        "cm_voltage" => "Floating voltage",
        "output_mode" => "Mode",
        "jz_voltage" => "Cutoff voltage",
        "fz_output" => "Output status",
        "voltage_monitor_selected" => "Battery voltage detection",
        "hf_out_voltage" => "Restore discharge voltage",
        _ => return None,
    };

    Some(name)
}

/// Like [`human_name`], but falls back to the key itself.
pub fn display_name(unikey: &str) -> &str {
    human_name(unikey).unwrap_or(unikey)
}
