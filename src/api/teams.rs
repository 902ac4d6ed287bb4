use serde_json::{json, Value};

use super::envelope;
use crate::error::ClientError;
use crate::gateway::ApiRequest;
use crate::model::Team;

pub const TEAM_PATH: &str = "/team";
pub const TEAM_MEMBER_PATH: &str = "/teamMember";

/// Body of `POST /teamMember` and `DELETE /teamMember`. Both fields are optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembershipChange {
    pub message: Option<String>,
    pub team: Option<Team>,
}

impl MembershipChange {
    pub fn decode(body: Value) -> Result<Self, ClientError> {
        Ok(Self {
            message: envelope::optional_field(&body, "message")?,
            team: envelope::optional_field(&body, "team")?,
        })
    }
}

pub fn list() -> ApiRequest {
    ApiRequest::get(TEAM_PATH)
}

pub fn get(team_id: &str) -> ApiRequest {
    ApiRequest::get(format!("{}/{}", TEAM_PATH, team_id))
}

pub fn create(name: &str) -> ApiRequest {
    ApiRequest::post(TEAM_PATH).json(json!({ "name": name }))
}

pub fn update(team_id: &str, name: &str) -> ApiRequest {
    ApiRequest::patch(TEAM_PATH).json(json!({ "teamId": team_id, "name": name }))
}

pub fn delete(team_id: &str) -> ApiRequest {
    ApiRequest::delete(TEAM_PATH).json(json!({ "teamId": team_id }))
}

pub fn add_member(team_id: &str, member_email: &str) -> ApiRequest {
    ApiRequest::post(TEAM_MEMBER_PATH)
        .json(json!({ "teamId": team_id, "memberEmail": member_email }))
}

pub fn remove_member(team_id: &str, member_id: &str) -> ApiRequest {
    ApiRequest::delete(TEAM_MEMBER_PATH).json(json!({ "teamId": team_id, "memberId": member_id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Method;

    #[test]
    fn update_sends_team_id_in_body() {
        let request = update("t1", "Platform");
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.path, "/team");
        assert_eq!(request.body, Some(json!({ "teamId": "t1", "name": "Platform" })));
    }

    #[test]
    fn membership_fields_are_optional() {
        let change = MembershipChange::decode(json!({ "message": "Member removed" })).unwrap();
        assert_eq!(change.message.as_deref(), Some("Member removed"));
        assert!(change.team.is_none());

        let err = MembershipChange::decode(json!({ "team": 7 })).unwrap_err();
        assert!(matches!(err, ClientError::Transport(msg) if msg.contains("`team`")));
    }

    #[test]
    fn single_team_uses_path_id() {
        assert_eq!(get("t9").path, "/team/t9");
    }
}
