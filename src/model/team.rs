use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Member, MemberRef};
use crate::Resource;

/// A team as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[resource(kind = "team")]
pub struct Team {
    #[serde(rename = "_id")]
    #[resource(id)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<MemberRef>,
    #[serde(default)]
    pub members: Vec<Member>,
    /// Server fields this client does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner: None,
            members: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.members.iter().any(|m| m.id == member_id)
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner.as_ref().map(MemberRef::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_mongo_style_payload() {
        let team: Team = serde_json::from_value(json!({
            "_id": "t1",
            "name": "Design",
            "owner": "u1",
            "members": [{ "_id": "m1", "name": "Alice", "email": "alice@example.com" }],
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(team.id(), "t1");
        assert_eq!(team.owner_id(), Some("u1"));
        assert!(team.has_member("m1"));
        assert_eq!(team.extra["createdAt"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn members_default_to_empty() {
        let team: Team = serde_json::from_value(json!({ "_id": "t2", "name": "QA" })).unwrap();
        assert!(team.members.is_empty());
        assert_eq!(Team::KIND, "team");
    }
}
