//! Match state updates.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{ProtoError, Result};

/// Kind of match state change announced by the scorekeeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateType {
    /// A match was loaded onto the field
    MatchLoad,
    /// The match started
    MatchStart,
    /// The match was aborted
    MatchAbort,
    /// Scores were committed by the referees
    MatchCommit,
    /// Results were posted
    MatchPost,
}

impl UpdateType {
    /// Every update type, in match order.
    pub const ALL: [Self; 5] =
        [Self::MatchLoad, Self::MatchStart, Self::MatchAbort, Self::MatchCommit, Self::MatchPost];

    /// Wire spelling of this update type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MatchLoad => "MATCH_LOAD",
            Self::MatchStart => "MATCH_START",
            Self::MatchAbort => "MATCH_ABORT",
            Self::MatchCommit => "MATCH_COMMIT",
            Self::MatchPost => "MATCH_POST",
        }
    }
}

impl FromStr for UpdateType {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ProtoError::UnknownUpdateType(s.to_string()))
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single update decoded from the event stream.
///
/// Only `updateType` is required. Unknown values are preserved; call
/// [`MatchUpdate::kind`] to classify them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchUpdate {
    /// Raw `updateType` as sent by the scorekeeper
    #[serde(rename = "updateType")]
    pub update_type: String,
}

impl MatchUpdate {
    /// Build an update for a known type.
    pub fn new(kind: UpdateType) -> Self {
        Self { update_type: kind.as_str().to_string() }
    }

    /// Decode one text frame.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the frame is not a JSON object with a string
    /// `updateType` field. An unknown update type is NOT an error here.
    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode as a text frame.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Classify the raw update type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownUpdateType` for anything outside [`UpdateType::ALL`].
    pub fn kind(&self) -> Result<UpdateType> {
        self.update_type.parse()
    }
}

impl From<UpdateType> for MatchUpdate {
    fn from(kind: UpdateType) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn decode_scorekeeper_frame() {
        let text = r#"{"updateTime":1700000000000,"updateType":"MATCH_START","payload":{"number":3,"shortName":"Q3","field":1}}"#;
        let update = MatchUpdate::decode(text).unwrap();
        assert_eq!(update.update_type, "MATCH_START");
        assert_eq!(update.kind().unwrap(), UpdateType::MatchStart);
    }

    #[test]
    fn unknown_type_decodes_but_does_not_classify() {
        let update = MatchUpdate::decode(r#"{"updateType":"SHOW_PREVIEW"}"#).unwrap();
        assert!(matches!(update.kind(), Err(ProtoError::UnknownUpdateType(t)) if t == "SHOW_PREVIEW"));
    }

    #[test]
    fn match_wait_is_not_a_wire_type() {
        assert!("MATCH_WAIT".parse::<UpdateType>().is_err());
    }

    #[test]
    fn missing_update_type_is_malformed() {
        assert!(matches!(MatchUpdate::decode(r#"{"payload":{}}"#), Err(ProtoError::Malformed(_))));
        assert!(matches!(MatchUpdate::decode("pong"), Err(ProtoError::Malformed(_))));
        assert!(matches!(MatchUpdate::decode(r#"{"updateType":7}"#), Err(ProtoError::Malformed(_))));
    }

    #[test]
    fn encode_uses_wire_field_name() {
        let text = MatchUpdate::new(UpdateType::MatchPost).encode().unwrap();
        assert_eq!(text, r#"{"updateType":"MATCH_POST"}"#);
    }

    #[test]
    fn display_matches_wire_spelling() {
        for kind in UpdateType::ALL {
            assert_eq!(kind.to_string().parse::<UpdateType>().unwrap(), kind);
        }
    }

    proptest! {
        #[test]
        fn decode_never_panics(text in ".*") {
            let _ = MatchUpdate::decode(&text);
        }
    }
}
