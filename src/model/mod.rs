//! Domain records exchanged with the TaskHub API.

mod task;
mod team;
mod user;

pub use task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
pub use team::Team;
pub use user::{Member, MemberRef, User};
