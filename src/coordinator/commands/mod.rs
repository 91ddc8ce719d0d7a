pub mod format_info;
pub mod get_all_info;
pub mod machine_info;
pub mod monitor;
pub mod read_property;
pub mod set_charge_mode;
