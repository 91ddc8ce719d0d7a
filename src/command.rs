use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetInfo,
    SetChargeMode(ChargeMode),
    GetChargeMode,
    GetLoadState,
    Monitor,
}

impl Command {
    pub const NAMES: [&'static str; 5] = [
        "get-info",
        "set-charge-mode",
        "get-charge-mode",
        "get-load-state",
        "monitor",
    ];

    /// Builds a command from its CLI name and the optional `--value`.
    pub fn parse(name: &str, value: Option<i64>) -> Result<Self> {
        use Command::*;

        let command = match name {
            "get-info" => GetInfo,
            "set-charge-mode" => {
                let value = value.ok_or_else(|| file_error!("set-charge-mode requires --value"))?;
                SetChargeMode(ChargeMode::try_from(value)?)
            }
            "get-charge-mode" => GetChargeMode,
            "get-load-state" => GetLoadState,
            "monitor" => Monitor,
            other => return Err(file_error!("Unknown command: {}", other)),
        };

        if value.is_some() && !matches!(command, SetChargeMode(_)) {
            debug!("ignoring --value for {}", command);
        }

        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        use Command::*;

        match self {
            GetInfo => "get-info",
            SetChargeMode(_) => "set-charge-mode",
            GetChargeMode => "get-charge-mode",
            GetLoadState => "get-load-state",
            Monitor => "monitor",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::SetChargeMode(mode) => write!(f, "{} {} ({})", self.name(), mode, u8::from(*mode)),
            _ => write!(f, "{}", self.name()),
        }
    }
}
