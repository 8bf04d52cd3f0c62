use std::{
    collections::{BTreeMap, HashMap},
    sync::atomic::{AtomicU64, Ordering},
};

use log::{debug, info, warn};

use crate::{
    fragment::{CloneError, DynFragment, Fragment, FragmentKind},
    types::{ContainerId, FragmentId, Side},
};

use super::{
    context::{EventContext, Siblings},
    dispatch_config::DispatchConfig,
    error::{ContainerError, DispatchError},
    event::{Event, EventKind, PostedEvent},
    handler::HandlerId,
    subscription_registry::SubscriptionRegistry,
};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(0);

/// Holds a set of fragments (at most one per name) and routes events between them.
///
/// Typed lookups (`get`, `lookup_kind`) return the earliest attached fragment
/// of the type.
///
/// A container either belongs to an owner, and then has a side, or stands
/// alone (a widget) with no side. Containers are not shared across threads.
///
/// Dropping a container detaches its fragments, so every `on_detach` hook runs.
pub struct Container {
    id: ContainerId,
    side: Option<Side>,
    config: DispatchConfig,
    fragments: BTreeMap<FragmentId, Box<dyn Fragment>>,
    names: HashMap<&'static str, FragmentId>,
    kinds: HashMap<FragmentKind, FragmentId>,
    registry: SubscriptionRegistry,
    errors: Vec<DispatchError>,
    next_fragment: u32,
}

impl Container {
    /// A standalone container with no side
    pub fn new(config: DispatchConfig) -> Self {
        Self::build(None, config)
    }

    pub fn with_side(side: Side, config: DispatchConfig) -> Self {
        Self::build(Some(side), config)
    }

    fn build(side: Option<Side>, config: DispatchConfig) -> Self {
        Self {
            id: ContainerId::new(NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed)),
            side,
            config,
            fragments: BTreeMap::new(),
            names: HashMap::new(),
            kinds: HashMap::new(),
            registry: SubscriptionRegistry::new(),
            errors: Vec::new(),
            next_fragment: 0,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    // Attach / Detach

    /// Binds the fragment to this container, registers the handlers it
    /// recorded during construction, then runs its `on_attach` hook.
    pub fn attach(&mut self, mut fragment: Box<dyn Fragment>) -> Result<FragmentId, ContainerError> {
        let name = fragment.base().name();
        if self.names.contains_key(name) {
            return Err(ContainerError::DuplicateName { name });
        }

        let id = FragmentId::new(self.next_fragment);
        let pending = fragment.base_mut().bind(self.id, self.side)?;
        for subscription in pending {
            if let Err(err) = self.registry.insert(id, subscription) {
                self.registry.remove_fragment(id);
                return Err(err.into());
            }
        }
        self.next_fragment += 1;

        fragment.on_attach();
        debug!(
            "Container {}: attached '{}' as {:?}",
            self.id.to_u64(),
            name,
            id
        );
        self.names.insert(name, id);
        self.kinds.entry(fragment.kind()).or_insert(id);
        self.fragments.insert(id, fragment);
        Ok(id)
    }

    pub fn attach_typed<T: Fragment>(&mut self, fragment: T) -> Result<FragmentId, ContainerError> {
        self.attach(Box::new(fragment))
    }

    /// Removes the fragment and all of its handlers. Detaching a name that is
    /// not attached returns `None`.
    pub fn detach(&mut self, name: &str) -> Option<Box<dyn Fragment>> {
        let id = self.names.remove(name)?;
        let mut fragment = self.fragments.remove(&id)?;
        let kind = fragment.kind();
        if self.kinds.get(&kind) == Some(&id) {
            self.kinds.remove(&kind);
            let next = self
                .fragments
                .iter()
                .find(|(_, other)| other.kind() == kind)
                .map(|(other_id, _)| *other_id);
            if let Some(next) = next {
                self.kinds.insert(kind, next);
            }
        }
        let removed = self.registry.remove_fragment(id);
        fragment.on_detach();
        debug!(
            "Container {}: detached '{}' ({} handlers removed)",
            self.id.to_u64(),
            name,
            removed
        );
        Some(fragment)
    }

    /// Detaches every fragment, newest first
    pub fn clear(&mut self) {
        let names: Vec<&'static str> = self
            .fragments
            .values()
            .rev()
            .map(|fragment| fragment.base().name())
            .collect();
        for name in names {
            self.detach(name);
        }
    }

    // Lookup

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn contains_kind(&self, kind: &FragmentKind) -> bool {
        self.kinds.contains_key(kind)
    }

    pub fn id_of(&self, name: &str) -> Option<FragmentId> {
        self.names.get(name).copied()
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn Fragment> {
        let id = self.names.get(name)?;
        self.fragments
            .get(id)
            .map(|fragment| -> &dyn Fragment { fragment.as_ref() })
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut dyn Fragment> {
        let id = self.names.get(name)?;
        self.fragments
            .get_mut(id)
            .map(|fragment| -> &mut dyn Fragment { fragment.as_mut() })
    }

    pub fn lookup_kind(&self, kind: &FragmentKind) -> Option<&dyn Fragment> {
        let id = self.kinds.get(kind)?;
        self.fragments
            .get(id)
            .map(|fragment| -> &dyn Fragment { fragment.as_ref() })
    }

    pub fn lookup_kind_mut(&mut self, kind: &FragmentKind) -> Option<&mut dyn Fragment> {
        let id = self.kinds.get(kind)?;
        self.fragments
            .get_mut(id)
            .map(|fragment| -> &mut dyn Fragment { fragment.as_mut() })
    }

    pub fn get<T: Fragment>(&self) -> Option<&T> {
        let id = self.kinds.get(&FragmentKind::of::<T>())?;
        self.fragments.get(id)?.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Fragment>(&mut self) -> Option<&mut T> {
        let id = self.kinds.get(&FragmentKind::of::<T>())?;
        self.fragments.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragment names in attach order
    pub fn names(&self) -> Vec<&'static str> {
        self.fragments
            .values()
            .map(|fragment| fragment.base().name())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Fragment> {
        self.fragments
            .values()
            .map(|fragment| -> &dyn Fragment { fragment.as_ref() })
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    // Flags

    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), ContainerError> {
        let fragment = self
            .lookup_mut(name)
            .ok_or_else(|| ContainerError::FragmentNotFound {
                name: name.to_string(),
            })?;
        fragment.base_mut().set_enabled(enabled);
        Ok(())
    }

    /// Removes one of a fragment's handlers after attach
    pub fn unsubscribe<E: Event>(&mut self, name: &str, handler: HandlerId) -> bool {
        let Some(id) = self.id_of(name) else {
            return false;
        };
        self.registry.unsubscribe(EventKind::of::<E>(), id, handler)
    }

    // Dispatch

    /// Delivers the event to every enabled subscriber in priority order.
    /// Returns the number of handlers invoked, nested dispatches excluded.
    pub fn post<E: Event>(&mut self, event: E) -> usize {
        self.dispatch(PostedEvent::new(event), 0)
    }

    fn dispatch(&mut self, event: PostedEvent, depth: usize) -> usize {
        if depth > self.config.max_depth {
            let err = DispatchError::DepthExceeded {
                event: event.name,
                max_depth: self.config.max_depth,
            };
            warn!("Container {}: {}", self.id.to_u64(), err);
            self.errors.push(err);
            return 0;
        }

        let mut delivered = 0;
        for target in self.registry.targets(event.kind) {
            // detached or disabled by an earlier handler of this dispatch
            match self.fragments.get(&target.fragment) {
                Some(fragment) if fragment.base().is_enabled() => {}
                _ => continue,
            }
            let Some(mut fragment) = self.fragments.remove(&target.fragment) else {
                continue;
            };

            let name = fragment.base().name();
            let siblings = Siblings::new(&mut self.fragments, &self.names);
            let mut context = EventContext::new(self.id, self.side, name, depth, siblings);
            let result = target
                .handler
                .call(fragment.as_mut(), &mut context, &*event.payload);
            let posted = context.into_posted();
            self.fragments.insert(target.fragment, fragment);
            delivered += 1;

            if let Err(source) = result {
                let err = DispatchError::HandlerFailed {
                    event: event.name,
                    fragment: name,
                    source,
                };
                warn!("Container {}: {}", self.id.to_u64(), err);
                self.errors.push(err);
            }

            for nested in posted {
                self.dispatch(nested, depth + 1);
            }
        }
        delivered
    }

    // Tick

    /// Ticks every enabled ticking fragment in attach order. Events posted
    /// from a tick are dispatched before the next fragment ticks.
    pub fn tick(&mut self) {
        let ids: Vec<FragmentId> = self.fragments.keys().copied().collect();
        for id in ids {
            match self.fragments.get(&id) {
                Some(fragment) if fragment.base().is_ticking() && fragment.base().is_enabled() => {}
                _ => continue,
            }
            let Some(mut fragment) = self.fragments.remove(&id) else {
                continue;
            };
            let name = fragment.base().name();
            let siblings = Siblings::new(&mut self.fragments, &self.names);
            let mut context = EventContext::new(self.id, self.side, name, 0, siblings);
            fragment.tick(&mut context);
            let posted = context.into_posted();
            self.fragments.insert(id, fragment);
            for posted in posted {
                self.dispatch(posted, 1);
            }
        }
    }

    // Errors

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn take_errors(&mut self) -> Vec<DispatchError> {
        std::mem::take(&mut self.errors)
    }

    // Duplicate

    /// A new container with the same side and a clone of every fragment.
    /// Fragments that fail to clone are left out and reported.
    pub fn duplicate(&self) -> (Container, Vec<CloneError>) {
        let mut copy = Self::build(self.side, self.config);
        let mut failures = Vec::new();
        for fragment in self.fragments.values() {
            match fragment.clone_boxed() {
                Ok(clone) => {
                    if let Err(err) = copy.attach(clone) {
                        warn!(
                            "Container {}: cannot attach clone of '{}': {}",
                            copy.id.to_u64(),
                            fragment.base().name(),
                            err
                        );
                    }
                }
                Err(err) => failures.push(err),
            }
        }
        info!(
            "Container {}: duplicated into {} ({} fragments, {} failed)",
            self.id.to_u64(),
            copy.id.to_u64(),
            copy.len(),
            failures.len()
        );
        (copy, failures)
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        self.clear();
    }
}
