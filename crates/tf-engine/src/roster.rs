// Roster intake: parsing, validation and separation of locked teams

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tf_types::{
    FormationError, ParticipantRequest, RosterError, SpecialitySet, Team, TfResult,
};

/// Everything a formation run needs besides configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormationRequest {
    pub participants: Vec<ParticipantRequest>,
    /// Pre-confirmed teams, by username. They skip optimization entirely.
    #[serde(default)]
    pub locked_teams: Vec<Vec<String>>,
}

impl FormationRequest {
    pub fn new(participants: Vec<ParticipantRequest>) -> Self {
        Self {
            participants,
            locked_teams: Vec::new(),
        }
    }

    pub fn with_locked_team<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locked_teams.push(usernames.into_iter().map(Into::into).collect());
        self
    }

    pub fn from_json(json: &str) -> TfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> TfResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks the invariants the optimizer relies on but never verifies.
    pub fn validate(&self, specialities: &SpecialitySet) -> TfResult<()> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.participants.len());
        for p in &self.participants {
            if p.username.trim().is_empty() {
                return Err(RosterError::EmptyUsername.into());
            }
            if p.username.trim() != p.username {
                return Err(RosterError::UntrimmedUsername {
                    username: p.username.clone(),
                }
                .into());
            }
            if !seen.insert(p.username.as_str()) {
                return Err(RosterError::DuplicateUsername {
                    username: p.username.clone(),
                }
                .into());
            }
            if let Some(tag) = p.specialities.iter().find(|t| !specialities.contains(t)) {
                return Err(RosterError::UnknownSpeciality {
                    username: p.username.clone(),
                    speciality: tag.clone(),
                }
                .into());
            }
        }

        let mut locked: HashSet<&str> = HashSet::new();
        for (index, team) in self.locked_teams.iter().enumerate() {
            if team.is_empty() {
                return Err(FormationError::EmptyLockedTeam { index }.into());
            }
            for username in team {
                if !seen.contains(username.as_str()) {
                    return Err(FormationError::UnknownLockedMember {
                        username: username.clone(),
                    }
                    .into());
                }
                if !locked.insert(username.as_str()) {
                    return Err(FormationError::MemberLockedTwice {
                        username: username.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Splits into locked teams and the free roster, keeping roster order for
    /// the free participants. Assumes [`validate`](Self::validate) passed.
    pub fn split(self) -> (Vec<Team>, Vec<ParticipantRequest>) {
        let locked_names: HashSet<String> = self.locked_teams.iter().flatten().cloned().collect();
        let (locked, free): (Vec<ParticipantRequest>, Vec<ParticipantRequest>) = self
            .participants
            .into_iter()
            .partition(|p| locked_names.contains(&p.username));

        let mut by_name: HashMap<String, ParticipantRequest> =
            locked.into_iter().map(|p| (p.username.clone(), p)).collect();
        let teams = self
            .locked_teams
            .iter()
            .map(|names| Team::new(names.iter().filter_map(|n| by_name.remove(n)).collect()))
            .collect();

        (teams, free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_types::TfError;

    fn request() -> FormationRequest {
        FormationRequest::new(vec![
            ParticipantRequest::new("aaron").with_specialities(["software"]),
            ParticipantRequest::new("joy").with_specialities(["ui/ux"]),
            ParticipantRequest::new("derek").with_specialities(["backend"]),
            ParticipantRequest::new("vivian"),
            ParticipantRequest::new("bob").noob(true),
        ])
    }

    #[test]
    fn valid_request_passes() {
        let req = request().with_locked_team(["aaron", "joy"]);
        assert!(req.validate(&SpecialitySet::default()).is_ok());
    }

    #[test]
    fn duplicate_username_rejected() {
        let mut req = request();
        req.participants.push(ParticipantRequest::new("joy"));
        let err = req.validate(&SpecialitySet::default()).unwrap_err();
        assert!(matches!(
            err,
            TfError::Roster(RosterError::DuplicateUsername { ref username }) if username == "joy"
        ));
    }

    #[test]
    fn blank_username_rejected() {
        let mut req = request();
        req.participants.push(ParticipantRequest::new("  "));
        let err = req.validate(&SpecialitySet::default()).unwrap_err();
        assert!(matches!(err, TfError::Roster(RosterError::EmptyUsername)));
    }

    #[test]
    fn padded_username_rejected() {
        let mut req = request();
        req.participants.push(ParticipantRequest::new("joy "));
        let err = req.validate(&SpecialitySet::default()).unwrap_err();
        assert!(matches!(
            err,
            TfError::Roster(RosterError::UntrimmedUsername { ref username }) if username == "joy "
        ));
    }

    #[test]
    fn unknown_speciality_rejected() {
        let mut req = request();
        req.participants.push(ParticipantRequest::new("zed").with_specialities(["devops"]));
        let err = req.validate(&SpecialitySet::default()).unwrap_err();
        assert!(matches!(err, TfError::Roster(RosterError::UnknownSpeciality { .. })));
    }

    #[test]
    fn locked_team_problems_rejected() {
        let specs = SpecialitySet::default();

        let err = request().with_locked_team(Vec::<String>::new()).validate(&specs).unwrap_err();
        assert!(matches!(err, TfError::Formation(FormationError::EmptyLockedTeam { index: 0 })));

        let err = request().with_locked_team(["aaron", "ghost"]).validate(&specs).unwrap_err();
        assert!(matches!(err, TfError::Formation(FormationError::UnknownLockedMember { .. })));

        let err = request()
            .with_locked_team(["aaron", "joy"])
            .with_locked_team(["joy", "bob"])
            .validate(&specs)
            .unwrap_err();
        assert!(matches!(err, TfError::Formation(FormationError::MemberLockedTwice { .. })));
    }

    #[test]
    fn requests_for_unknown_users_are_tolerated() {
        let mut req = request();
        req.participants[0].team_requests.insert("somebody-else".to_string());
        assert!(req.validate(&SpecialitySet::default()).is_ok());
    }

    #[test]
    fn split_separates_locked_members() {
        let (locked, free) = request()
            .with_locked_team(["joy", "aaron"])
            .with_locked_team(["bob"])
            .split();

        assert_eq!(locked.len(), 2);
        assert_eq!(locked[0].usernames(), vec!["aaron", "joy"]);
        assert_eq!(locked[1].usernames(), vec!["bob"]);

        let free_names: Vec<&str> = free.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(free_names, vec!["derek", "vivian"]);
    }

    #[test]
    fn parses_json_with_optional_locked_teams() {
        let req = FormationRequest::from_json(
            r#"{"participants": [{"username": "kevin", "specialities": ["ui/ux"], "noob": true}]}"#,
        )
        .unwrap();
        assert_eq!(req.participants.len(), 1);
        assert!(req.locked_teams.is_empty());

        assert!(matches!(FormationRequest::from_json("{"), Err(TfError::Serialization(_))));
    }
}
