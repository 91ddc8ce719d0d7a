use crate::prelude::*;
use crate::controller::message::Request;

/// Single `getMachinInfoTwo` query. Its payload carries the charge mode (35)
/// and load state (37) properties.
pub struct MachineInfo<'a> {
    session: &'a mut Session,
}

impl<'a> MachineInfo<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    pub async fn run(self) -> Result<Response> {
        let response = self.session.send_request(Request::machine_info_two()).await?;
        Ok(response)
    }
}
