use std::fmt;

use crate::Resource;

/// The kind of logical operation a request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    FetchAll,
    FetchFiltered,
    FetchOne,
    Create,
    Update,
    Delete,
    AddMember,
    RemoveMember,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::FetchAll => "fetch_all",
            OperationKind::FetchFiltered => "fetch_filtered",
            OperationKind::FetchOne => "fetch_one",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
            OperationKind::AddMember => "add_member",
            OperationKind::RemoveMember => "remove_member",
        }
    }
}

/// Identity of one operation stream: resource kind + operation + optional id + optional filter.
///
/// Request status and error messages are tracked per key, so an unrelated
/// operation can never clear another one's loading flag or error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    kind: &'static str,
    operation: OperationKind,
    id: Option<String>,
    filter: Option<String>,
}

impl OperationKey {
    pub fn new(kind: &'static str, operation: OperationKind) -> Self {
        Self {
            kind,
            operation,
            id: None,
            filter: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn fetch_all<R: Resource>() -> Self {
        Self::new(R::KIND, OperationKind::FetchAll)
    }

    pub fn fetch_filtered<R: Resource>(filter: impl Into<String>) -> Self {
        Self::new(R::KIND, OperationKind::FetchFiltered).with_filter(filter)
    }

    pub fn fetch_one<R: Resource>(id: impl Into<String>) -> Self {
        Self::new(R::KIND, OperationKind::FetchOne).with_id(id)
    }

    pub fn create<R: Resource>() -> Self {
        Self::new(R::KIND, OperationKind::Create)
    }

    pub fn update<R: Resource>(id: impl Into<String>) -> Self {
        Self::new(R::KIND, OperationKind::Update).with_id(id)
    }

    pub fn delete<R: Resource>(id: impl Into<String>) -> Self {
        Self::new(R::KIND, OperationKind::Delete).with_id(id)
    }

    pub fn add_member<R: Resource>(id: impl Into<String>) -> Self {
        Self::new(R::KIND, OperationKind::AddMember).with_id(id)
    }

    pub fn remove_member<R: Resource>(id: impl Into<String>, member_id: &str) -> Self {
        Self::new(R::KIND, OperationKind::RemoveMember)
            .with_id(id)
            .with_filter(format!("memberId={}", member_id))
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Deletes are terminal: a confirmed delete is applied even if a newer
    /// write to the same item was issued after it.
    pub fn is_terminal(&self) -> bool {
        self.operation == OperationKind::Delete
    }

    /// The part of the store a successful completion of this key rewrites.
    ///
    /// Responses are only applied when they belong to the most recent request
    /// issued for their write scope.
    pub fn write_scope(&self) -> WriteScope {
        match (self.operation, &self.id) {
            (OperationKind::FetchAll | OperationKind::FetchFiltered, _) => {
                WriteScope::Collection(self.kind)
            }
            (OperationKind::FetchOne, _) => WriteScope::Detail(self.kind),
            (OperationKind::Create, _) => WriteScope::Unscoped,
            (_, Some(id)) => WriteScope::Item(self.kind, id.clone()),
            (_, None) => WriteScope::Unscoped,
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.operation.as_str())?;
        if let Some(id) = &self.id {
            write!(f, "/{}", id)?;
        }
        if let Some(filter) = &self.filter {
            write!(f, "?{}", filter)?;
        }
        Ok(())
    }
}

/// Region of a store rewritten by a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WriteScope {
    /// The whole collection of a resource kind.
    Collection(&'static str),
    /// The single "selected" detail slot of a resource kind.
    Detail(&'static str),
    /// One entry, by id.
    Item(&'static str, String),
    /// Independent writes (creates) that never supersede each other.
    Unscoped,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, Team};

    #[test]
    fn display_includes_id_and_filter() {
        assert_eq!(OperationKey::fetch_all::<Team>().to_string(), "team/fetch_all");
        assert_eq!(OperationKey::update::<Task>("k1").to_string(), "task/update/k1");
        assert_eq!(
            OperationKey::fetch_filtered::<Task>("teamId=t1").to_string(),
            "task/fetch_filtered?teamId=t1"
        );
        assert_eq!(
            OperationKey::remove_member::<Team>("t1", "m1").to_string(),
            "team/remove_member/t1?memberId=m1"
        );
    }

    #[test]
    fn fetches_share_the_collection_scope() {
        let all = OperationKey::fetch_all::<Task>();
        let x = OperationKey::fetch_filtered::<Task>("assignedTo=x");
        let y = OperationKey::fetch_filtered::<Task>("assignedTo=y");

        assert_ne!(x, y);
        assert_eq!(x.write_scope(), y.write_scope());
        assert_eq!(all.write_scope(), WriteScope::Collection("task"));
    }

    #[test]
    fn item_operations_scope_by_id() {
        assert_eq!(
            OperationKey::update::<Team>("t1").write_scope(),
            OperationKey::delete::<Team>("t1").write_scope()
        );
        assert_ne!(
            OperationKey::update::<Team>("t1").write_scope(),
            OperationKey::update::<Team>("t2").write_scope()
        );
        assert_eq!(OperationKey::create::<Task>().write_scope(), WriteScope::Unscoped);
        assert!(OperationKey::delete::<Task>("k1").is_terminal());
        assert!(!OperationKey::update::<Task>("k1").is_terminal());
        assert_eq!(
            OperationKey::fetch_one::<Team>("t9").write_scope(),
            WriteScope::Detail("team")
        );
    }
}
