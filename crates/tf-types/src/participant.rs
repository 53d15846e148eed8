use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Speciality tags recognized when no configuration overrides them.
pub const DEFAULT_SPECIALITIES: [&str; 3] = ["software", "ui/ux", "backend"];

/// A participant's request to be placed on a team.
///
/// Records are treated as immutable values: the optimizer clones the roster
/// before it starts moving people around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRequest {
    pub username: String,
    #[serde(default)]
    pub specialities: BTreeSet<String>,
    #[serde(default)]
    pub noob: bool,
    #[serde(default)]
    pub team_requests: BTreeSet<String>,
}

impl ParticipantRequest {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            specialities: BTreeSet::new(),
            noob: false,
            team_requests: BTreeSet::new(),
        }
    }

    pub fn with_specialities<I, S>(mut self, specialities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specialities = specialities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_requests<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.team_requests = usernames.into_iter().map(Into::into).collect();
        self
    }

    pub fn noob(mut self, noob: bool) -> Self {
        self.noob = noob;
        self
    }

    /// True if this participant asked to be teamed with `username`.
    pub fn requested(&self, username: &str) -> bool {
        self.team_requests.contains(username)
    }

    /// True if both participants asked for each other.
    pub fn is_mutual_with(&self, other: &ParticipantRequest) -> bool {
        self.requested(&other.username) && other.requested(&self.username)
    }
}

impl fmt::Display for ParticipantRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}

/// The fixed, ordered set of speciality tags a run recognizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SpecialitySet {
    tags: Vec<String>,
}

impl SpecialitySet {
    /// Builds a set from `tags`, dropping repeats while keeping first-seen order.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self { tags: unique }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for SpecialitySet {
    fn from(tags: Vec<String>) -> Self {
        Self::new(tags)
    }
}

impl From<SpecialitySet> for Vec<String> {
    fn from(set: SpecialitySet) -> Self {
        set.tags
    }
}

impl Default for SpecialitySet {
    fn default() -> Self {
        Self::new(DEFAULT_SPECIALITIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let p = ParticipantRequest::new("aaron")
            .with_specialities(["software"])
            .with_requests(["vivian", "joy"])
            .noob(true);

        assert_eq!(p.username, "aaron");
        assert!(p.specialities.contains("software"));
        assert!(p.requested("joy"));
        assert!(!p.requested("derek"));
        assert!(p.noob);
    }

    #[test]
    fn mutual_requires_both_directions() {
        let aaron = ParticipantRequest::new("aaron").with_requests(["joy"]);
        let joy = ParticipantRequest::new("joy").with_requests(["aaron"]);
        let derek = ParticipantRequest::new("derek").with_requests(["joy"]);

        assert!(aaron.is_mutual_with(&joy));
        assert!(joy.is_mutual_with(&aaron));
        assert!(!derek.is_mutual_with(&joy));
    }

    #[test]
    fn missing_optional_fields_deserialize_to_defaults() {
        let p: ParticipantRequest = serde_json::from_str(r#"{"username": "kevin"}"#).unwrap();
        assert!(p.specialities.is_empty());
        assert!(p.team_requests.is_empty());
        assert!(!p.noob);
    }

    #[test]
    fn speciality_set_dedups_in_order() {
        let set = SpecialitySet::new(["backend", "software", "backend"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["backend", "software"]);
    }

    #[test]
    fn speciality_set_deserializes_from_list() {
        let set: SpecialitySet = serde_json::from_str(r#"["software", "software", "ui/ux"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["software","ui/ux"]"#);
    }

    #[test]
    fn default_specialities() {
        let set = SpecialitySet::default();
        assert_eq!(set.len(), 3);
        assert!(set.contains("ui/ux"));
        assert!(!set.contains("design"));
    }
}
