//! Derived views over store snapshots.
//!
//! Pure functions of (collection, parameters). Nothing is cached; call them
//! inside [`ResourceStore::view`](crate::store::ResourceStore::view) or on a
//! cloned snapshot.

use std::collections::BTreeMap;

use crate::model::{Member, Task, TaskStatus, Team};
use crate::Resource;

/// Tasks assigned to `member_id`, in collection order.
pub fn tasks_for_member<'a>(tasks: &'a [Task], member_id: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| t.is_assigned_to(member_id)).collect()
}

pub fn tasks_with_status(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status == status).collect()
}

/// Number of tasks per status. Statuses with no task are present with zero.
pub fn count_by_status(tasks: &[Task]) -> BTreeMap<TaskStatus, usize> {
    let mut counts: BTreeMap<TaskStatus, usize> = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ]
    .into_iter()
    .map(|status| (status, 0))
    .collect();

    for task in tasks {
        *counts.entry(task.status).or_default() += 1;
    }
    counts
}

/// Highest priority first; ties keep collection order.
pub fn sorted_by_priority(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
    sorted
}

pub fn find<'a, R: Resource>(items: &'a [R], id: &str) -> Option<&'a R> {
    items.iter().find(|item| item.id() == id)
}

/// Members of the team with `team_id`, empty if it is not loaded.
pub fn team_members<'a>(teams: &'a [Team], team_id: &str) -> &'a [Member] {
    find(teams, team_id)
        .map(|team| team.members.as_slice())
        .unwrap_or_default()
}

/// Teams `member_id` belongs to, as owner or member.
pub fn teams_for_member<'a>(teams: &'a [Team], member_id: &str) -> Vec<&'a Team> {
    teams
        .iter()
        .filter(|team| team.has_member(member_id) || team.owner_id() == Some(member_id))
        .collect()
}

/// Assigned task count per member id. Unassigned tasks are not counted.
pub fn member_task_counts(tasks: &[Task]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for id in tasks.iter().filter_map(Task::assignee_id) {
        *counts.entry(id.to_string()).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemberRef, TaskPriority};

    fn task(id: &str, status: TaskStatus, priority: TaskPriority, assignee: Option<&str>) -> Task {
        let mut task = Task::new(id, format!("task {}", id));
        task.status = status;
        task.priority = priority;
        task.assigned_to = assignee.map(MemberRef::from);
        task
    }

    fn fixture() -> Vec<Task> {
        vec![
            task("1", TaskStatus::Pending, TaskPriority::Low, Some("m1")),
            task("2", TaskStatus::Completed, TaskPriority::High, Some("m2")),
            task("3", TaskStatus::Pending, TaskPriority::High, Some("m1")),
            task("4", TaskStatus::InProgress, TaskPriority::Medium, None),
        ]
    }

    fn ids(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn filters_by_member_and_status() {
        let tasks = fixture();
        assert_eq!(ids(tasks_for_member(&tasks, "m1")), vec!["1", "3"]);
        assert_eq!(ids(tasks_with_status(&tasks, TaskStatus::Pending)), vec!["1", "3"]);
        assert!(tasks_for_member(&tasks, "nobody").is_empty());
    }

    #[test]
    fn counts_include_empty_statuses() {
        let counts = count_by_status(&fixture()[..1]);
        assert_eq!(counts[&TaskStatus::Pending], 1);
        assert_eq!(counts[&TaskStatus::Completed], 0);
        assert_eq!(counts.len(), 3);

        let counts = count_by_status(&fixture());
        assert_eq!(counts[&TaskStatus::Pending], 2);
        assert_eq!(counts[&TaskStatus::InProgress], 1);
    }

    #[test]
    fn priority_sort_is_stable() {
        let tasks = fixture();
        assert_eq!(ids(sorted_by_priority(&tasks)), vec!["2", "3", "4", "1"]);
    }

    #[test]
    fn member_counts_skip_unassigned() {
        let counts = member_task_counts(&fixture());
        assert_eq!(counts.get("m1"), Some(&2));
        assert_eq!(counts.get("m2"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn team_views() {
        let mut core = Team::new("t1", "Core").with_members(vec![Member::new("m1")]);
        core.owner = Some(MemberRef::from("m9"));
        let teams = vec![core, Team::new("t2", "Ops")];

        assert_eq!(team_members(&teams, "t1").len(), 1);
        assert!(team_members(&teams, "missing").is_empty());
        assert_eq!(teams_for_member(&teams, "m1").len(), 1);
        assert_eq!(teams_for_member(&teams, "m9")[0].id, "t1");
        assert_eq!(find(&teams, "t2").map(|t| t.name.as_str()), Some("Ops"));
    }
}
