use std::marker::PhantomData;

use crate::{
    events::{Event, EventContext, HandlerError, HandlerId, PendingSubscription},
    types::{ContainerId, Side},
};

use super::{
    error::FragmentError,
    fragment::{Fragment, FragmentType},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Binding {
    container: ContainerId,
    side: Option<Side>,
}

/// Lifecycle and sync state shared by every fragment.
///
/// Subscriptions are recorded here while the fragment is being constructed
/// and handed to the container when the fragment is attached. After that the
/// subscription set is closed.
pub struct FragmentBase {
    name: &'static str,
    enabled: bool,
    editable: bool,
    binding: Option<Binding>,
    ticking: bool,
    keep_across_reset: bool,
    local_only: bool,
    dirty: bool,
    sync_requested: bool,
    pending: Vec<PendingSubscription>,
    next_handler: u16,
}

impl FragmentBase {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            enabled: true,
            editable: true,
            binding: None,
            ticking: false,
            keep_across_reset: true,
            local_only: false,
            dirty: true,
            sync_requested: false,
            pending: Vec::new(),
            next_handler: 0,
        }
    }

    /// A base named after the fragment type, with no handlers and default flags
    pub fn of<T: FragmentType>() -> Self {
        Self::new(T::NAME)
    }

    pub fn builder<T: FragmentType>() -> FragmentBaseBuilder<T> {
        FragmentBaseBuilder {
            base: Self::new(T::NAME),
            phantom_t: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    // Handlers

    /// Records a handler for events of type `E`. Lower priorities run first;
    /// equal priorities run in subscription order.
    ///
    /// Panics once the fragment is attached. Use `try_subscribe` to handle that case.
    pub fn subscribe<T, E, F>(&mut self, priority: i32, handler: F) -> HandlerId
    where
        T: Fragment,
        E: Event,
        F: Fn(&mut T, &mut EventContext, &E) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.try_subscribe(priority, handler)
            .unwrap_or_else(|err| panic!("{}", err))
    }

    pub fn try_subscribe<T, E, F>(
        &mut self,
        priority: i32,
        handler: F,
    ) -> Result<HandlerId, FragmentError>
    where
        T: Fragment,
        E: Event,
        F: Fn(&mut T, &mut EventContext, &E) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        if self.binding.is_some() {
            return Err(FragmentError::InvalidLifecycleState {
                fragment: self.name,
                operation: "subscribe",
            });
        }
        let handler_id = HandlerId::new(self.next_handler);
        self.next_handler = self.next_handler.wrapping_add(1);
        self.pending
            .push(PendingSubscription::new::<T, E, F>(handler_id, priority, handler));
        Ok(handler_id)
    }

    pub fn pending_subscriptions(&self) -> usize {
        self.pending.len()
    }

    // Binding

    pub(crate) fn bind(
        &mut self,
        container: ContainerId,
        side: Option<Side>,
    ) -> Result<Vec<PendingSubscription>, FragmentError> {
        if self.binding.is_some() {
            return Err(FragmentError::InvalidLifecycleState {
                fragment: self.name,
                operation: "attach",
            });
        }
        self.binding = Some(Binding { container, side });
        Ok(std::mem::take(&mut self.pending))
    }

    pub fn is_attached(&self) -> bool {
        self.binding.is_some()
    }

    pub fn container(&self) -> Option<ContainerId> {
        self.binding.map(|binding| binding.container)
    }

    /// Side of the bound container, if it belongs to an owner
    pub fn side(&self) -> Option<Side> {
        self.binding.and_then(|binding| binding.side)
    }

    /// Panics unless the fragment runs on the expected side
    pub fn assert_side(&self, expected: Side) {
        if let Err(err) = self.try_assert_side(expected) {
            panic!("{}", err);
        }
    }

    pub fn try_assert_side(&self, expected: Side) -> Result<(), FragmentError> {
        let Some(actual) = self.side() else {
            return Err(FragmentError::NotAttached {
                fragment: self.name,
                operation: "check its side",
            });
        };
        if actual != expected {
            return Err(FragmentError::WrongSideInvocation {
                fragment: self.name,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Non-panicking side check
    pub fn is_side(&self, side: Side) -> bool {
        self.side() == Some(side)
    }

    // Flags

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn set_ticking(&mut self, ticking: bool) {
        self.ticking = ticking;
    }

    pub fn keeps_across_reset(&self) -> bool {
        self.keep_across_reset
    }

    pub fn is_local_only(&self) -> bool {
        self.local_only
    }

    // Sync

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Always true on the authoritative side. On a mirror, true once state has
    /// been received from the authority.
    pub fn is_synced(&self) -> bool {
        match self.side() {
            Some(Side::Authoritative) | None => true,
            Some(Side::Mirror) => !self.dirty,
        }
    }

    pub(crate) fn mark_synced(&mut self) {
        self.dirty = false;
    }

    /// Asks the owning host to push this fragment's state on its next tick
    pub fn request_sync(&mut self) {
        if self.local_only {
            return;
        }
        self.sync_requested = true;
    }

    pub fn is_sync_requested(&self) -> bool {
        self.sync_requested
    }

    pub(crate) fn take_sync_request(&mut self) -> bool {
        std::mem::take(&mut self.sync_requested)
    }
}

/// Builds a `FragmentBase` together with its handler subscriptions
pub struct FragmentBaseBuilder<T: Fragment> {
    base: FragmentBase,
    phantom_t: PhantomData<fn(&mut T)>,
}

impl<T: Fragment> FragmentBaseBuilder<T> {
    /// Subscribes with the default priority of 0
    pub fn listen<E, F>(self, handler: F) -> Self
    where
        E: Event,
        F: Fn(&mut T, &mut EventContext, &E) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.listen_with_priority(0, handler)
    }

    pub fn listen_with_priority<E, F>(mut self, priority: i32, handler: F) -> Self
    where
        E: Event,
        F: Fn(&mut T, &mut EventContext, &E) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.base.subscribe::<T, E, F>(priority, handler);
        self
    }

    /// Receive `tick` calls from the host
    pub fn ticking(mut self) -> Self {
        self.base.ticking = true;
        self
    }

    /// Drop this fragment when its owner is reset
    pub fn clear_on_reset(mut self) -> Self {
        self.base.keep_across_reset = false;
        self
    }

    /// Never synced; counts as synced from the start
    pub fn local_only(mut self) -> Self {
        self.base.local_only = true;
        self.base.dirty = false;
        self
    }

    pub fn not_editable(mut self) -> Self {
        self.base.editable = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.base.enabled = false;
        self
    }

    pub fn build(self) -> FragmentBase {
        self.base
    }
}
