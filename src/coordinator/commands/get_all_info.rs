use crate::prelude::*;
use crate::controller::message::Request;

/// Reads both partial property dumps and merges them into one list ordered
/// by property id.
pub struct GetAllInfo<'a> {
    session: &'a mut Session,
}

impl<'a> GetAllInfo<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    pub async fn run(self) -> Result<Vec<PropertyRecord>> {
        let info_one = self.session.send_request(Request::machine_info_one()).await?;
        let info_two = self.session.send_request(Request::machine_info_two()).await?;

        let mut properties = info_one.properties()?;
        properties.extend(info_two.properties()?);
        debug!("merged {} properties", properties.len());

        Ok(merge(properties))
    }
}

/// Stable sort by property id, so duplicates keep their response order.
pub fn merge(mut properties: Vec<PropertyRecord>) -> Vec<PropertyRecord> {
    properties.sort_by_key(|p| p.property_id);
    properties
}
