use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::store::{OperationKey, WriteScope};

/// Issued for every request; identifies it at completion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: OperationKey,
    scope: WriteScope,
    seq: u64,
}

impl Ticket {
    pub fn key(&self) -> &OperationKey {
        &self.key
    }

    pub fn scope(&self) -> &WriteScope {
        &self.scope
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Where a completing request stands relative to newer ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    /// Latest request for its logical key: may write status and error.
    pub owns_key: bool,
    /// Latest request for its write scope: may mutate the store.
    pub owns_scope: bool,
}

#[derive(Default)]
struct SequencerState {
    next: u64,
    /// Tickets at or below this number were issued before the last reset.
    floor: u64,
    by_key: HashMap<OperationKey, u64>,
    by_scope: HashMap<WriteScope, u64>,
}

/// Monotonic sequence numbers per logical key and per write scope.
#[derive(Default)]
pub struct Sequencer {
    state: Mutex<SequencerState>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket for `key`, superseding every earlier ticket for the
    /// same key and the same write scope.
    pub fn issue(&self, key: &OperationKey) -> Ticket {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.next += 1;
        let seq = state.next;
        let scope = key.write_scope();

        state.by_key.insert(key.clone(), seq);
        if scope != WriteScope::Unscoped {
            state.by_scope.insert(scope.clone(), seq);
        }

        Ticket {
            key: key.clone(),
            scope,
            seq,
        }
    }

    pub fn standing(&self, ticket: &Ticket) -> Standing {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket.seq <= state.floor {
            return Standing {
                owns_key: false,
                owns_scope: false,
            };
        }

        let owns_key = state.by_key.get(&ticket.key) == Some(&ticket.seq);
        let owns_scope = match &ticket.scope {
            WriteScope::Unscoped => true,
            _ if ticket.key.is_terminal() => true,
            scope => state.by_scope.get(scope) == Some(&ticket.seq),
        };

        Standing {
            owns_key,
            owns_scope,
        }
    }

    /// Invalidate every outstanding ticket.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.floor = state.next;
        state.by_key.clear();
        state.by_scope.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, Team};

    #[test]
    fn latest_ticket_owns_key_and_scope() {
        let sequencer = Sequencer::new();
        let key = OperationKey::fetch_all::<Team>();

        let first = sequencer.issue(&key);
        let second = sequencer.issue(&key);

        assert!(second.seq() > first.seq());
        assert_eq!(
            sequencer.standing(&first),
            Standing {
                owns_key: false,
                owns_scope: false
            }
        );
        assert_eq!(
            sequencer.standing(&second),
            Standing {
                owns_key: true,
                owns_scope: true
            }
        );
    }

    #[test]
    fn different_filters_share_scope_but_not_key() {
        let sequencer = Sequencer::new();
        let x = sequencer.issue(&OperationKey::fetch_filtered::<Task>("assignedTo=x"));
        let y = sequencer.issue(&OperationKey::fetch_filtered::<Task>("assignedTo=y"));

        let stale = sequencer.standing(&x);
        assert!(stale.owns_key);
        assert!(!stale.owns_scope);
        assert!(sequencer.standing(&y).owns_scope);
    }

    #[test]
    fn creates_never_supersede_each_other() {
        let sequencer = Sequencer::new();
        let first = sequencer.issue(&OperationKey::create::<Task>());
        let second = sequencer.issue(&OperationKey::create::<Task>());

        assert!(sequencer.standing(&first).owns_scope);
        assert!(!sequencer.standing(&first).owns_key);
        assert!(sequencer.standing(&second).owns_key);
    }

    #[test]
    fn delete_keeps_scope_after_later_item_write() {
        let sequencer = Sequencer::new();
        let delete = sequencer.issue(&OperationKey::delete::<Task>("k1"));
        let update = sequencer.issue(&OperationKey::update::<Task>("k1"));

        assert!(sequencer.standing(&delete).owns_scope);
        assert!(sequencer.standing(&delete).owns_key);
        assert!(sequencer.standing(&update).owns_scope);
    }

    #[test]
    fn update_issued_before_delete_is_superseded() {
        let sequencer = Sequencer::new();
        let update = sequencer.issue(&OperationKey::update::<Task>("k1"));
        sequencer.issue(&OperationKey::delete::<Task>("k1"));

        assert!(!sequencer.standing(&update).owns_scope);
    }

    #[test]
    fn reset_invalidates_outstanding_tickets() {
        let sequencer = Sequencer::new();
        let before = sequencer.issue(&OperationKey::delete::<Task>("k1"));
        sequencer.reset();
        let after = sequencer.issue(&OperationKey::create::<Task>());

        assert_eq!(
            sequencer.standing(&before),
            Standing {
                owns_key: false,
                owns_scope: false
            }
        );
        assert!(sequencer.standing(&after).owns_scope);
    }
}
