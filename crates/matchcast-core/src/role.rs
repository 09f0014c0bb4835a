//! Logical scene roles.

use std::fmt;

use matchcast_proto::UpdateType;

/// One of the six logical states a broadcast moves through.
///
/// Each role maps to a configurable scene name (see
/// [`crate::config::SceneNames`]). Five roles are reachable from scorekeeper
/// updates; [`SceneRole::MatchWait`] is only entered by the post-match timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneRole {
    /// Match loaded, teams on the field
    MatchLoad,
    /// Match running
    MatchStart,
    /// Match aborted
    MatchAbort,
    /// Scores committed
    MatchCommit,
    /// Results on screen
    MatchPost,
    /// Between matches
    MatchWait,
}

impl SceneRole {
    /// All roles, in the order they are presented to operators.
    pub const ALL: [Self; 6] = [
        Self::MatchLoad,
        Self::MatchStart,
        Self::MatchAbort,
        Self::MatchCommit,
        Self::MatchPost,
        Self::MatchWait,
    ];

    /// Role driven by a scorekeeper update.
    pub fn for_update(kind: UpdateType) -> Self {
        match kind {
            UpdateType::MatchLoad => Self::MatchLoad,
            UpdateType::MatchStart => Self::MatchStart,
            UpdateType::MatchAbort => Self::MatchAbort,
            UpdateType::MatchCommit => Self::MatchCommit,
            UpdateType::MatchPost => Self::MatchPost,
        }
    }

    /// Settings key for this role.
    pub fn key(self) -> &'static str {
        match self {
            Self::MatchLoad => "match_load",
            Self::MatchStart => "match_start",
            Self::MatchAbort => "match_abort",
            Self::MatchCommit => "match_commit",
            Self::MatchPost => "match_post",
            Self::MatchWait => "match_wait",
        }
    }

    /// Human-readable label, also the default scene name.
    pub fn label(self) -> &'static str {
        match self {
            Self::MatchLoad => "Match Load",
            Self::MatchStart => "Match Start",
            Self::MatchAbort => "Match Abort",
            Self::MatchCommit => "Match Commit",
            Self::MatchPost => "Match Post",
            Self::MatchWait => "Match Wait",
        }
    }
}

impl fmt::Display for SceneRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
