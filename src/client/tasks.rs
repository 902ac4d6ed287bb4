use serde_json::Value;

use super::{insert_created, remove_deleted, replace_collection, replace_updated, require, TaskHub};
use crate::api::envelope;
use crate::api::tasks as routes;
use crate::coordinator::Operation;
use crate::error::ClientError;
use crate::gateway::{ApiRequest, Gateway};
use crate::model::{NewTask, Task, TaskPatch};
use crate::store::OperationKey;

/// Task operations bound to one [`TaskHub`].
pub struct TaskOps<'a, G> {
    hub: &'a TaskHub<G>,
}

impl<'a, G: Gateway> TaskOps<'a, G> {
    pub(super) fn new(hub: &'a TaskHub<G>) -> Self {
        Self { hub }
    }

    /// `GET /task?teamId=..`; replaces the task collection.
    pub async fn fetch_for_team(&self, team_id: &str) -> Result<Vec<Task>, ClientError> {
        require(team_id, "Team id is required")?;
        self.fetch(routes::list(team_id)).await
    }

    /// `GET /task?teamId=..&assignedTo=..`; replaces the task collection.
    ///
    /// Shares the collection with [`TaskOps::fetch_for_team`]: whichever
    /// listing was requested last is the one that lands.
    pub async fn fetch_for_member(
        &self,
        team_id: &str,
        member_id: &str,
    ) -> Result<Vec<Task>, ClientError> {
        require(team_id, "Team id is required")?;
        require(member_id, "Member id is required")?;
        self.fetch(routes::list_for_member(team_id, member_id)).await
    }

    async fn fetch(&self, request: ApiRequest) -> Result<Vec<Task>, ClientError> {
        let filter = request.query_string();
        let op = Operation::new(
            OperationKey::fetch_filtered::<Task>(filter.clone()),
            request,
            |body: Value| envelope::field::<Vec<Task>>(body, "tasks"),
            replace_collection::<Task>(Some(filter)),
        )
        .fallback("Failed to fetch tasks");
        self.hub.coordinator.execute(&self.hub.tasks, op).await
    }

    pub async fn create(&self, task: NewTask) -> Result<Task, ClientError> {
        task.validate()?;
        let op = Operation::new(
            OperationKey::create::<Task>(),
            routes::create(&task)?,
            |body: Value| envelope::field::<Task>(body, "task"),
            insert_created::<Task>("Task created successfully"),
        )
        .fallback("Failed to create task");
        self.hub.coordinator.execute(&self.hub.tasks, op).await
    }

    /// Send only the fields set on `patch`. An empty patch is rejected locally.
    pub async fn update(&self, task_id: &str, patch: TaskPatch) -> Result<Task, ClientError> {
        require(task_id, "Task id is required")?;
        if patch.is_empty() {
            return Err(ClientError::Validation("Nothing to update".to_string()));
        }
        let op = Operation::new(
            OperationKey::update::<Task>(task_id),
            routes::update(task_id, &patch),
            |body: Value| envelope::field::<Task>(body, "task"),
            replace_updated::<Task>("Task updated successfully"),
        )
        .fallback("Failed to update task");
        self.hub.coordinator.execute(&self.hub.tasks, op).await
    }

    pub async fn delete(&self, task_id: &str) -> Result<(), ClientError> {
        require(task_id, "Task id is required")?;
        let op = Operation::new(
            OperationKey::delete::<Task>(task_id),
            routes::delete(task_id),
            |_: Value| Ok(()),
            remove_deleted::<Task>(task_id.to_string(), "Task deleted successfully"),
        )
        .fallback("Failed to delete task");
        self.hub.coordinator.execute(&self.hub.tasks, op).await
    }
}
