use crate::prelude::*;
use crate::controller::{interpreter, names};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::Map;

pub const STATUS_OK: i64 = 200;

pub const PROPERTY_CHARGE_MODE: i64 = 35;
pub const PROPERTY_LOAD_STATE: i64 = 37;

// Action {{{
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    GetMachinInfoOne,
    GetMachinInfoTwo,
    SetPropertyData,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::GetMachinInfoOne => "getMachinInfoOne",
            Action::GetMachinInfoTwo => "getMachinInfoTwo",
            Action::SetPropertyData => "setPropertyData",
            Action::Other(action) => action,
        }
    }
}

impl From<&str> for Action {
    fn from(action: &str) -> Self {
        match action {
            "getMachinInfoOne" => Action::GetMachinInfoOne,
            "getMachinInfoTwo" => Action::GetMachinInfoTwo,
            "setPropertyData" => Action::SetPropertyData,
            other => Action::Other(other.to_owned()),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
} // }}}

// Handshake {{{
/// First frame the server sends after the socket opens.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Handshake {
    pub code: Option<i64>,
    pub client_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Handshake {
    /// Validates a handshake frame and returns the assigned client id.
    pub fn parse(text: &str) -> Result<String, ClientError> {
        let handshake: Handshake = serde_json::from_str(text)
            .map_err(|err| ClientError::HandshakeInvalid(format!("{} ({})", text, err)))?;

        match (handshake.code, handshake.client_id) {
            (Some(STATUS_OK), Some(client_id)) => Ok(interpreter::value_to_string(&client_id)),
            _ => Err(ClientError::HandshakeInvalid(text.to_owned())),
        }
    }
} // }}}

// Request {{{
/// One outgoing command. `params` is an open map so unanticipated action
/// arguments can be passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub action: Action,
    pub params: Map<String, Value>,
}

impl Request {
    pub fn new<A: Into<Action>>(action: A) -> Self {
        Self {
            action: action.into(),
            params: Map::new(),
        }
    }

    pub fn with_params<A: Into<Action>>(action: A, params: Map<String, Value>) -> Self {
        Self {
            action: action.into(),
            params,
        }
    }

    pub fn param<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.params.insert(key.to_owned(), value.into());
        self
    }

    pub fn machine_info_one() -> Self {
        Self::new(Action::GetMachinInfoOne)
    }

    pub fn machine_info_two() -> Self {
        Self::new(Action::GetMachinInfoTwo)
    }

    pub fn set_property<V: Into<Value>>(id: i64, value: V) -> Self {
        Self::new(Action::SetPropertyData)
            .param("id", id)
            .param("value", value)
    }

    /// Builds the wire object. `mac` is only filled in when the caller has not
    /// supplied one explicitly.
    pub fn envelope(&self, mac: &str) -> Map<String, Value> {
        let mut command = Map::new();
        command.insert("Action".to_owned(), Value::String(self.action.to_string()));
        command.extend(self.params.clone());

        if !command.contains_key("mac") {
            command.insert("mac".to_owned(), Value::String(mac.to_owned()));
        }

        command
    }
} // }}}

// Response {{{
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.code == Some(STATUS_OK)
    }

    /// Property records carried in `data`. A response without `data` has none;
    /// a single object is a plain payload, not a property list. Entries that
    /// cannot be decoded are skipped so one bad record does not hide the rest.
    pub fn properties(&self) -> Result<Vec<PropertyRecord>, ClientError> {
        Ok(self
            .entries()?
            .iter()
            .filter_map(|item| match PropertyRecord::deserialize(item) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!("skipping undecodable property {}: {}", item, err);
                    None
                }
            })
            .collect())
    }

    /// Scans `data` for `property_id`, decoding only the matching entry.
    pub fn find_property(&self, property_id: i64) -> Result<Option<PropertyRecord>, ClientError> {
        let entry = self
            .entries()?
            .iter()
            .filter(|item| item.is_object())
            .find(|item| property_id_of(item.get("property_id").unwrap_or(&Value::Null)) == Some(property_id));

        match entry {
            Some(item) => Ok(Some(PropertyRecord::deserialize(item)?)),
            None => Ok(None),
        }
    }

    fn entries(&self) -> Result<&[Value], ClientError> {
        match &self.data {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(ClientError::Decode(format!(
                "expected a list of properties, got {}",
                other
            ))),
        }
    }
} // }}}

// PropertyRecord {{{
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(default, deserialize_with = "de_property_id")]
    pub property_id: i64,
    #[serde(default, deserialize_with = "de_unikey")]
    pub unikey: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub definition: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PropertyRecord {
    pub fn human_name(&self) -> &str {
        names::display_name(&self.unikey)
    }

    pub fn interpreted_value(&self) -> String {
        interpreter::interpret(&self.value, self.definition.as_ref(), &self.unikey)
    }

    pub fn raw_value(&self) -> String {
        interpreter::value_to_string(&self.value)
    }
}

// firmware is not consistent about sending ids as numbers
fn property_id_of(value: &Value) -> Option<i64> {
    match value {
        Value::Null => Some(0),
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn de_property_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    property_id_of(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid property_id {}", value)))
}

// nor about keys being strings
fn de_unikey<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(interpreter::value_to_string(&Value::deserialize(deserializer)?))
}
// }}}

// OptionDescriptor {{{
/// One entry of a definition list: either an enum option or, for range style
/// definitions, a titled attribute such as the unit.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OptionDescriptor {
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub en_title: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub unit: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OptionDescriptor {
    const UNIT_TITLES: [&'static str; 2] = ["单位", "unit"];

    pub fn matches(&self, raw: &Value) -> bool {
        interpreter::value_to_string(&self.value) == interpreter::value_to_string(raw)
    }

    /// English title, falling back to the generic one. Empty titles count as missing.
    pub fn display_title(&self) -> Option<String> {
        non_empty(&self.en_title).or_else(|| non_empty(&self.title))
    }

    pub fn is_unit_marker(&self) -> bool {
        matches!(&self.title, Some(Value::String(t)) if Self::UNIT_TITLES.contains(&t.as_str()))
    }
}

fn non_empty(value: &Option<Value>) -> Option<String> {
    value
        .as_ref()
        .filter(|v| !v.is_null())
        .map(interpreter::value_to_string)
        .filter(|s| !s.is_empty())
} // }}}

// ChargeMode {{{
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ChargeMode {
    Manual = 0,
    Auto = 1,
    Timing = 2,
    StraightOut = 3,
}

impl ChargeMode {
    pub fn name(&self) -> &'static str {
        match self {
            ChargeMode::Manual => "manual",
            ChargeMode::Auto => "auto",
            ChargeMode::Timing => "timing",
            ChargeMode::StraightOut => "straight out",
        }
    }

    /// Human description of a raw property 35 value, e.g. `timing (2)`.
    pub fn describe(raw: &Value) -> String {
        let mode = raw
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .and_then(|v| ChargeMode::try_from(v).ok());

        match mode {
            Some(mode) => format!("{} ({})", mode.name(), raw),
            None => format!("unknown ({})", interpreter::value_to_string(raw)),
        }
    }
}

impl TryFrom<i64> for ChargeMode {
    type Error = anyhow::Error;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .and_then(|v| ChargeMode::try_from(v).ok())
            .ok_or_else(|| anyhow!("invalid charge mode {} (0: manual, 1: auto, 2: timing, 3: straight out)", value))
    }
}

impl std::fmt::Display for ChargeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
} // }}}
