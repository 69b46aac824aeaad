//! Messages exchanged between entities and their components.
//!
//! In-process delivery uses [`Message`] directly. The text form
//! `TAG:::payload` (payload is JSON) exists for senders that only hold
//! strings, such as scripted input or debug tooling.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::app::{Direction, State};
use crate::geometry::Vec2;

pub const MESSAGE_TOKEN: &str = ":::";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTag {
    SetStartPosition,
    SetState,
    SetDirection,
    BeginSelection,
    EntitySelected,
    EntityDeselected,
}

impl MessageTag {
    pub const ALL: [MessageTag; 6] = [
        MessageTag::SetStartPosition,
        MessageTag::SetState,
        MessageTag::SetDirection,
        MessageTag::BeginSelection,
        MessageTag::EntitySelected,
        MessageTag::EntityDeselected,
    ];

    pub fn as_token(self) -> &'static str {
        match self {
            Self::SetStartPosition => "INIT_START_POSITION",
            Self::SetState => "CURRENT_STATE",
            Self::SetDirection => "CURRENT_DIRECTION",
            Self::BeginSelection => "INIT_SELECT_ENTITY",
            Self::EntitySelected => "ENTITY_SELECTED",
            Self::EntityDeselected => "ENTITY_DESELECTED",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_token().eq_ignore_ascii_case(token))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    SetStartPosition(Vec2),
    SetState(State),
    SetDirection(Direction),
    /// Cursor position in screen pixels (y-down).
    BeginSelection(Vec2),
    EntitySelected,
    EntityDeselected,
}

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message {tag} requires a payload")]
    MissingPayload { tag: &'static str },
    #[error("message {tag} does not take a payload")]
    UnexpectedPayload { tag: &'static str },
    #[error("malformed payload for {tag}: {source}")]
    MalformedPayload {
        tag: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Message {
    pub fn tag(&self) -> MessageTag {
        match self {
            Self::SetStartPosition(_) => MessageTag::SetStartPosition,
            Self::SetState(_) => MessageTag::SetState,
            Self::SetDirection(_) => MessageTag::SetDirection,
            Self::BeginSelection(_) => MessageTag::BeginSelection,
            Self::EntitySelected => MessageTag::EntitySelected,
            Self::EntityDeselected => MessageTag::EntityDeselected,
        }
    }

    pub fn encode(&self) -> String {
        let tag = self.tag().as_token();
        match self {
            Self::SetStartPosition(position) | Self::BeginSelection(position) => {
                with_payload(tag, position)
            }
            Self::SetState(state) => with_payload(tag, state),
            Self::SetDirection(direction) => with_payload(tag, direction),
            Self::EntitySelected | Self::EntityDeselected => tag.to_string(),
        }
    }

    /// Returns `Ok(None)` for empty input and unknown tags.
    pub fn decode(raw: &str) -> Result<Option<Self>, MessageError> {
        if raw.is_empty() {
            return Ok(None);
        }
        let (token, payload) = match raw.split_once(MESSAGE_TOKEN) {
            Some((token, payload)) => (token, Some(payload)),
            None => (raw, None),
        };
        let Some(tag) = MessageTag::from_token(token) else {
            return Ok(None);
        };

        let message = match tag {
            MessageTag::SetStartPosition => Self::SetStartPosition(parse_payload(tag, payload)?),
            MessageTag::SetState => Self::SetState(parse_payload(tag, payload)?),
            MessageTag::SetDirection => Self::SetDirection(parse_payload(tag, payload)?),
            MessageTag::BeginSelection => Self::BeginSelection(parse_payload(tag, payload)?),
            MessageTag::EntitySelected => {
                reject_payload(tag, payload)?;
                Self::EntitySelected
            }
            MessageTag::EntityDeselected => {
                reject_payload(tag, payload)?;
                Self::EntityDeselected
            }
        };
        Ok(Some(message))
    }
}

fn with_payload<T: Serialize>(tag: &str, payload: &T) -> String {
    // Payloads are plain vectors and unit enums; serde_json cannot fail on them.
    let json = serde_json::to_string(payload).expect("message payloads always serialize");
    format!("{tag}{MESSAGE_TOKEN}{json}")
}

fn parse_payload<T: DeserializeOwned>(
    tag: MessageTag,
    payload: Option<&str>,
) -> Result<T, MessageError> {
    let payload = payload.ok_or(MessageError::MissingPayload {
        tag: tag.as_token(),
    })?;
    serde_json::from_str(payload).map_err(|source| MessageError::MalformedPayload {
        tag: tag.as_token(),
        source,
    })
}

fn reject_payload(tag: MessageTag, payload: Option<&str>) -> Result<(), MessageError> {
    match payload {
        Some(extra) if !extra.is_empty() => Err(MessageError::UnexpectedPayload {
            tag: tag.as_token(),
        }),
        _ => Ok(()),
    }
}
