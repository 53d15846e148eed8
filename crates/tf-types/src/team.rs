use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::participant::ParticipantRequest;

/// An ordered group of participants. Member order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Team {
    pub members: Vec<ParticipantRequest>,
}

impl Team {
    pub fn new(members: Vec<ParticipantRequest>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.members.iter().any(|m| m.username == username)
    }

    /// Sorted member usernames, handy for display and comparisons.
    pub fn usernames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.members.iter().map(|m| m.username.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Projection keeping only what downstream consumers need.
    pub fn summaries(&self) -> Vec<MemberSummary> {
        self.members.iter().map(MemberSummary::from).collect()
    }
}

impl From<Vec<ParticipantRequest>> for Team {
    fn from(members: Vec<ParticipantRequest>) -> Self {
        Self::new(members)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.usernames().join(", "))
    }
}

/// Username plus declared specialities of a team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub username: String,
    pub specialities: BTreeSet<String>,
}

impl From<&ParticipantRequest> for MemberSummary {
    fn from(p: &ParticipantRequest) -> Self {
        Self {
            username: p.username.clone(),
            specialities: p.specialities.clone(),
        }
    }
}
