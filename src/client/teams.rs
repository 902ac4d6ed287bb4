use serde_json::Value;

use super::{insert_created, remove_deleted, replace_collection, replace_updated, require, TaskHub};
use crate::api::envelope;
use crate::api::teams::{self as routes, MembershipChange};
use crate::coordinator::Operation;
use crate::error::ClientError;
use crate::gateway::Gateway;
use crate::model::Team;
use crate::store::{OperationKey, ResourceStore, StoreError};

/// Team operations bound to one [`TaskHub`].
pub struct TeamOps<'a, G> {
    hub: &'a TaskHub<G>,
}

impl<'a, G: Gateway> TeamOps<'a, G> {
    pub(super) fn new(hub: &'a TaskHub<G>) -> Self {
        Self { hub }
    }

    /// `GET /team`; replaces the team collection.
    pub async fn fetch_all(&self) -> Result<Vec<Team>, ClientError> {
        let op = Operation::new(
            OperationKey::fetch_all::<Team>(),
            routes::list(),
            |body: Value| envelope::field::<Vec<Team>>(body, "teams"),
            replace_collection::<Team>(None),
        )
        .fallback("Failed to fetch teams");
        self.hub.coordinator.execute(&self.hub.teams, op).await
    }

    /// `GET /team/{id}`; fills the detail slot.
    pub async fn fetch_one(&self, team_id: &str) -> Result<Team, ClientError> {
        require(team_id, "Team id is required")?;
        let op = Operation::new(
            OperationKey::fetch_one::<Team>(team_id),
            routes::get(team_id),
            |body: Value| envelope::field_or::<Team>(body, "team", "Team data not found"),
            |store: &ResourceStore<Team>, team: &Team| {
                store.set_selected(team.clone());
                Ok(())
            },
        )
        .fallback("Failed to fetch team details");
        self.hub.coordinator.execute(&self.hub.teams, op).await
    }

    pub async fn create(&self, name: &str) -> Result<Team, ClientError> {
        let name = name.trim();
        require(name, "Team name is required")?;
        let op = Operation::new(
            OperationKey::create::<Team>(),
            routes::create(name),
            |body: Value| envelope::field::<Team>(body, "team"),
            insert_created::<Team>("Team created successfully"),
        )
        .fallback("Failed to create team");
        self.hub.coordinator.execute(&self.hub.teams, op).await
    }

    /// Rename a team. The server echo replaces the stored record.
    pub async fn update(&self, team_id: &str, name: &str) -> Result<Team, ClientError> {
        let name = name.trim();
        require(team_id, "Team id is required")?;
        require(name, "Team name is required")?;
        let op = Operation::new(
            OperationKey::update::<Team>(team_id),
            routes::update(team_id, name),
            |body: Value| envelope::field::<Team>(body, "team"),
            replace_updated::<Team>("Team updated successfully"),
        )
        .fallback("Failed to update team");
        self.hub.coordinator.execute(&self.hub.teams, op).await
    }

    pub async fn delete(&self, team_id: &str) -> Result<(), ClientError> {
        require(team_id, "Team id is required")?;
        let op = Operation::new(
            OperationKey::delete::<Team>(team_id),
            routes::delete(team_id),
            |_: Value| Ok(()),
            remove_deleted::<Team>(team_id.to_string(), "Team deleted successfully"),
        )
        .fallback("Failed to delete team");
        self.hub.coordinator.execute(&self.hub.teams, op).await
    }

    /// Invite a user by email. A returned team is written to the detail slot
    /// and the collection.
    pub async fn add_member(
        &self,
        team_id: &str,
        member_email: &str,
    ) -> Result<MembershipChange, ClientError> {
        let member_email = member_email.trim();
        require(team_id, "Team id is required")?;
        require(member_email, "Member email is required")?;
        let op = Operation::new(
            OperationKey::add_member::<Team>(team_id),
            routes::add_member(team_id, member_email),
            MembershipChange::decode,
            apply_membership(team_id.to_string(), None),
        )
        .fallback("Failed to add member");
        self.hub.coordinator.execute(&self.hub.teams, op).await
    }

    /// Remove a member. Without a server echo the member is dropped from the
    /// detail slot locally.
    pub async fn remove_member(
        &self,
        team_id: &str,
        member_id: &str,
    ) -> Result<MembershipChange, ClientError> {
        require(team_id, "Team id is required")?;
        require(member_id, "Member id is required")?;
        let op = Operation::new(
            OperationKey::remove_member::<Team>(team_id, member_id),
            routes::remove_member(team_id, member_id),
            MembershipChange::decode,
            apply_membership(team_id.to_string(), Some(member_id.to_string())),
        )
        .fallback("Failed to remove member");
        self.hub.coordinator.execute(&self.hub.teams, op).await
    }
}

fn apply_membership(
    team_id: String,
    removed: Option<String>,
) -> impl FnOnce(&ResourceStore<Team>, &MembershipChange) -> Result<(), StoreError> + Send {
    move |store, change| {
        if let Some(message) = &change.message {
            store.set_notice(message.clone());
        }

        match &change.team {
            Some(team) => {
                store.update_selected(&team.id, |selected| *selected = Some(team.clone()));
                store.replace_one(team.clone())?;
            }
            None => {
                if let Some(member_id) = removed {
                    store.update_selected(&team_id, |selected| {
                        if let Some(team) = selected {
                            team.members.retain(|m| m.id != member_id);
                        }
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Member;
    use serde_json::json;

    #[test]
    fn membership_echo_replaces_listed_team() {
        let store = ResourceStore::new();
        store.replace_all(vec![Team::new("t1", "Core")], None);
        store.set_selected(Team::new("t1", "Core"));

        let change = MembershipChange::decode(json!({
            "message": "Member added successfully",
            "team": { "_id": "t1", "name": "Core", "members": [{ "_id": "m1" }] }
        }))
        .unwrap();
        apply_membership("t1".into(), None)(&store, &change).unwrap();

        assert!(store.get("t1").unwrap().has_member("m1"));
        assert!(store.selected().unwrap().has_member("m1"));
        assert_eq!(store.notice().as_deref(), Some("Member added successfully"));
    }

    #[test]
    fn removal_without_echo_drops_member_from_detail() {
        let store = ResourceStore::new();
        store.set_selected(
            Team::new("t1", "Core").with_members(vec![Member::new("m1"), Member::new("m2")]),
        );

        apply_membership("t1".into(), Some("m1".into()))(&store, &MembershipChange::default())
            .unwrap();

        let selected = store.selected().unwrap();
        assert!(!selected.has_member("m1"));
        assert!(selected.has_member("m2"));
        assert!(store.is_empty());
    }
}
