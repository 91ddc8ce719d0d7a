use crate::prelude::*;
use crate::coordinator::commands::machine_info::MachineInfo;

/// Looks up one property in the machine info dump.
///
/// `Ok(None)` means the device did not report the property at all, while a
/// reported null comes back as `Ok(Some(Value::Null))`.
pub struct ReadProperty<'a> {
    session: &'a mut Session,
    property_id: i64,
}

impl<'a> ReadProperty<'a> {
    pub fn new(session: &'a mut Session, property_id: i64) -> Self {
        Self {
            session,
            property_id,
        }
    }

    pub async fn run(self) -> Result<Option<Value>> {
        let response = MachineInfo::new(self.session).run().await?;

        let value = response
            .find_property(self.property_id)?
            .map(|record| record.value);

        Ok(value)
    }
}
