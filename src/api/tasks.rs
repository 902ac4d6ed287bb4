use crate::error::ClientError;
use crate::gateway::ApiRequest;
use crate::model::{NewTask, TaskPatch};

pub const TASK_PATH: &str = "/task";

pub fn list(team_id: &str) -> ApiRequest {
    ApiRequest::get(TASK_PATH).query("teamId", team_id)
}

pub fn list_for_member(team_id: &str, member_id: &str) -> ApiRequest {
    list(team_id).query("assignedTo", member_id)
}

pub fn create(task: &NewTask) -> Result<ApiRequest, ClientError> {
    let body = serde_json::to_value(task)
        .map_err(|e| ClientError::Validation(format!("task cannot be encoded: {}", e)))?;
    Ok(ApiRequest::post(TASK_PATH).json(body))
}

/// The patch travels as a query string; only set fields are included.
pub fn update(task_id: &str, patch: &TaskPatch) -> ApiRequest {
    ApiRequest::patch(format!("{}/{}", TASK_PATH, task_id)).query_pairs(patch.to_query())
}

pub fn delete(task_id: &str) -> ApiRequest {
    ApiRequest::delete(format!("{}/{}", TASK_PATH, task_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;

    #[test]
    fn member_listing_adds_assignee_filter() {
        let request = list_for_member("t1", "m1");
        assert_eq!(request.to_string(), "GET /task?teamId=t1&assignedTo=m1");
    }

    #[test]
    fn update_has_no_body() {
        let request = update("k1", &TaskPatch::new().status(TaskStatus::Completed));
        assert_eq!(request.to_string(), "PATCH /task/k1?status=Completed");
        assert!(request.body.is_none());
    }
}
