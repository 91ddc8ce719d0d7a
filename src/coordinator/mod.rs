use crate::prelude::*;
use crate::controller::message::{PROPERTY_CHARGE_MODE, PROPERTY_LOAD_STATE};

pub mod commands;

/// Maps the CLI operations onto a [`Session`].
///
/// The individual operations assume the session is already connected;
/// [`Coordinator::run`] wraps one of them with connect and disconnect.
pub struct Coordinator {
    session: Session,
    channels: Channels,
}

impl Coordinator {
    pub fn new(session: Session, channels: Channels) -> Self {
        Self {
            session,
            channels,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Connects using the session's own timeouts and attempt limit.
    pub async fn connect(&mut self) -> bool {
        let timeouts = self.session.timeouts();
        self.session.connect(timeouts.connect, timeouts.max_attempts).await
    }

    pub async fn disconnect(&mut self) {
        self.session.disconnect().await;
    }

    /// Parses and runs one command on a fresh connection.
    pub async fn run(&mut self, name: &str, value: Option<i64>) -> bool {
        let command = match Command::parse(name, value) {
            Ok(command) => command,
            Err(err) => {
                error!("{}", err);
                return false;
            }
        };

        self.run_command(command).await
    }

    pub async fn run_command(&mut self, command: Command) -> bool {
        if !self.connect().await {
            error!("Failed to connect to server");
            return false;
        }

        debug!("running {}", command);
        let result = self.process_command(command).await;

        self.disconnect().await;

        result
    }

    async fn process_command(&mut self, command: Command) -> bool {
        match command {
            Command::GetInfo => {
                println!("{}", self.get_formatted_info().await);
                true
            }
            Command::SetChargeMode(mode) => self.set_charge_mode(mode).await,
            Command::GetChargeMode => self.get_charge_mode().await.is_some(),
            Command::GetLoadState => self.get_load_state().await.is_some(),
            Command::Monitor => self.monitor().await,
        }
    }

    /// Both info dumps merged and ordered by property id. Failures are logged
    /// and yield an empty list.
    pub async fn get_all_info(&mut self) -> Vec<PropertyRecord> {
        match commands::get_all_info::GetAllInfo::new(&mut self.session).run().await {
            Ok(properties) => properties,
            Err(err) => {
                error!("Error getting machine info: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn get_formatted_info(&mut self) -> String {
        let properties = self.get_all_info().await;
        commands::format_info::format_table(&properties)
    }

    pub async fn get_machine_info(&mut self) -> Option<Response> {
        match commands::machine_info::MachineInfo::new(&mut self.session).run().await {
            Ok(response) => Some(response),
            Err(err) => {
                error!("Error getting machine info: {}", err);
                None
            }
        }
    }

    pub async fn set_charge_mode(&mut self, mode: ChargeMode) -> bool {
        match commands::set_charge_mode::SetChargeMode::new(&mut self.session, mode)
            .run()
            .await
        {
            Ok(response) => {
                info!("Charge mode set to {} ({})", mode, u8::from(mode));
                debug!("set charge mode response: {:?}", response);
                true
            }
            Err(err) => {
                error!("Error setting charge mode: {}", err);
                false
            }
        }
    }

    /// `None` when the property is missing or the query failed.
    pub async fn get_charge_mode(&mut self) -> Option<Value> {
        let value = self.read_property(PROPERTY_CHARGE_MODE, "charge mode").await?;
        info!("Current charge mode: {}", ChargeMode::describe(&value));
        Some(value)
    }

    /// `None` when the property is missing or the query failed.
    pub async fn get_load_state(&mut self) -> Option<Value> {
        let value = self.read_property(PROPERTY_LOAD_STATE, "load state").await?;
        info!("Current load state: {}", controller::interpreter::value_to_string(&value));
        Some(value)
    }

    async fn read_property(&mut self, property_id: i64, what: &str) -> Option<Value> {
        match commands::read_property::ReadProperty::new(&mut self.session, property_id)
            .run()
            .await
        {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                error!("Could not find {} property ({}) in response", what, property_id);
                None
            }
            Err(err) => {
                error!("Error getting {}: {}", what, err);
                None
            }
        }
    }

    /// Prints unsolicited frames until shutdown or the server closes.
    pub async fn monitor(&mut self) -> bool {
        match commands::monitor::Monitor::new(&mut self.session, self.channels.clone())
            .run()
            .await
        {
            Ok(count) => {
                info!("Monitor stopped after {} messages", count);
                true
            }
            Err(err) => {
                error!("Monitor failed: {}", err);
                false
            }
        }
    }
}
