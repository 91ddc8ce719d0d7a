use crate::prelude::*;
use crate::controller::message::{Request, PROPERTY_CHARGE_MODE};

pub struct SetChargeMode<'a> {
    session: &'a mut Session,
    mode: ChargeMode,
}

impl<'a> SetChargeMode<'a> {
    pub fn new(session: &'a mut Session, mode: ChargeMode) -> Self {
        Self { session, mode }
    }

    pub async fn run(self) -> Result<Response> {
        info!("Setting charge mode to {} ({})", self.mode, u8::from(self.mode));

        let request = Request::set_property(PROPERTY_CHARGE_MODE, u8::from(self.mode));
        let response = self.session.send_request(request).await?;

        if !response.is_ok() {
            bail!(
                "failed to set charge mode to {}: server replied with code {}",
                self.mode,
                response.code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string())
            );
        }

        Ok(response)
    }
}
