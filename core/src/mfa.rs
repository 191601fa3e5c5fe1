//! Multi-factor authentication challenges and responses.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One raw challenge entry, e.g. `{"question": "What is your pet's name?"}`
/// or `{"mask": "xxx-xxx-5309", "type": "phone"}`.
pub type ChallengeItem = Map<String, Value>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MfaType {
    /// Security questions.
    Questions,
    /// Devices the user may pick to receive a code.
    List,
    /// A code was sent to a device.
    Device,
}

impl MfaType {
    /// Unrecognised type strings yield `None`.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "questions" => Some(Self::Questions),
            "list"      => Some(Self::List),
            "device"    => Some(Self::Device),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Questions => "questions",
            Self::List      => "list",
            Self::Device    => "device",
        }
    }
}

/// A challenge issued mid-login. Consumed by one `submit_mfa` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "mfa", rename_all = "snake_case")]
pub enum MfaChallenge {
    Questions(Vec<ChallengeItem>),
    List(Vec<ChallengeItem>),
    Device(Vec<ChallengeItem>),
}

impl MfaChallenge {
    pub fn new(kind: MfaType, items: Vec<ChallengeItem>) -> Self {
        match kind {
            MfaType::Questions => Self::Questions(items),
            MfaType::List      => Self::List(items),
            MfaType::Device    => Self::Device(items),
        }
    }

    pub fn kind(&self) -> MfaType {
        match self {
            Self::Questions(_) => MfaType::Questions,
            Self::List(_)      => MfaType::List,
            Self::Device(_)    => MfaType::Device,
        }
    }

    pub fn items(&self) -> &[ChallengeItem] {
        match self {
            Self::Questions(items) | Self::List(items) | Self::Device(items) => items,
        }
    }

    /// Human-readable prompts: question text, device masks, or the device message.
    pub fn prompts(&self) -> Vec<&str> {
        let key = match self {
            Self::Questions(_) => "question",
            Self::List(_)      => "mask",
            Self::Device(_)    => "message",
        };
        self.items()
            .iter()
            .filter_map(|item| item.get(key).and_then(Value::as_str))
            .collect()
    }
}

/// The four ways a challenge can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MfaResponse {
    /// Code received on a device.
    Code(String),
    /// Answer to a security question.
    Answer(String),
    /// Ask for the code to be sent to a device type, e.g. `"phone"`.
    DeviceType(String),
    /// Ask for the code to be sent to a specific device mask.
    DeviceMask(String),
}

impl MfaResponse {
    /// The form parameter this response becomes, before percent-encoding.
    /// Codes and answers are sent as a plain `mfa` value; device choices
    /// become a `send_method` option object.
    pub fn to_param(&self) -> (&'static str, String) {
        match self {
            Self::Code(v) | Self::Answer(v) => ("mfa", v.clone()),
            Self::DeviceType(v) => ("options", json!({ "send_method": { "type": v } }).to_string()),
            Self::DeviceMask(v) => ("options", json!({ "send_method": { "mask": v } }).to_string()),
        }
    }
}
