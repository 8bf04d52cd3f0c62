use std::{collections::HashMap, sync::Arc};

use crate::types::FragmentId;

use super::{
    error::RegistryError,
    event::EventKind,
    handler::{ErasedHandler, HandlerId, PendingSubscription},
};

#[derive(Clone)]
pub(crate) struct Subscription {
    pub(crate) fragment: FragmentId,
    pub(crate) handler_id: HandlerId,
    pub(crate) priority: i32,
    pub(crate) handler: Arc<dyn ErasedHandler>,
}

/// One entry of `SubscriptionRegistry::subscribers`, in dispatch order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriberInfo {
    pub fragment: FragmentId,
    pub handler: HandlerId,
    pub priority: i32,
}

/// Event kind to ordered handlers, for one container.
///
/// Handlers run in ascending priority; ties run in the order they were
/// registered. A fragment's handlers are all removed when it is detached.
#[derive(Default)]
pub struct SubscriptionRegistry {
    entries: HashMap<EventKind, Vec<Subscription>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(
        &mut self,
        fragment: FragmentId,
        pending: PendingSubscription,
    ) -> Result<(), RegistryError> {
        let list = self.entries.entry(pending.kind).or_default();
        if list
            .iter()
            .any(|sub| sub.fragment == fragment && sub.handler_id == pending.handler_id)
        {
            return Err(RegistryError::DuplicateHandler {
                fragment,
                handler: pending.handler_id,
                event: pending.event_name,
            });
        }

        // after every entry of equal or lower priority
        let index = list.partition_point(|sub| sub.priority <= pending.priority);
        list.insert(
            index,
            Subscription {
                fragment,
                handler_id: pending.handler_id,
                priority: pending.priority,
                handler: pending.handler,
            },
        );
        Ok(())
    }

    /// Removes every handler of `fragment`. Returns how many were removed.
    pub fn remove_fragment(&mut self, fragment: FragmentId) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, list| {
            let before = list.len();
            list.retain(|sub| sub.fragment != fragment);
            removed += before - list.len();
            !list.is_empty()
        });
        removed
    }

    /// Removes one handler. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, kind: EventKind, fragment: FragmentId, handler: HandlerId) -> bool {
        let Some(list) = self.entries.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|sub| !(sub.fragment == fragment && sub.handler_id == handler));
        let removed = list.len() != before;
        if list.is_empty() {
            self.entries.remove(&kind);
        }
        removed
    }

    /// Handlers for `kind`, snapshotted so dispatch can mutate fragments freely
    pub(crate) fn targets(&self, kind: EventKind) -> Vec<Subscription> {
        self.entries.get(&kind).cloned().unwrap_or_default()
    }

    pub fn subscribers(&self, kind: EventKind) -> Vec<SubscriberInfo> {
        self.entries
            .get(&kind)
            .map(|list| {
                list.iter()
                    .map(|sub| SubscriberInfo {
                        fragment: sub.fragment,
                        handler: sub.handler_id,
                        priority: sub.priority,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self, kind: EventKind) -> usize {
        self.entries.get(&kind).map_or(0, Vec::len)
    }

    pub fn total_len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
