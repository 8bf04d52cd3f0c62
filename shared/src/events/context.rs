use std::collections::{BTreeMap, HashMap};

use crate::{
    fragment::{DynFragment, Fragment},
    types::{ContainerId, FragmentId, Side},
};

use super::event::{Event, PostedEvent};

/// The other fragments of a container, lent to the one currently running
pub(crate) struct Siblings<'a> {
    fragments: &'a mut BTreeMap<FragmentId, Box<dyn Fragment>>,
    names: &'a HashMap<&'static str, FragmentId>,
}

impl<'a> Siblings<'a> {
    pub(crate) fn new(
        fragments: &'a mut BTreeMap<FragmentId, Box<dyn Fragment>>,
        names: &'a HashMap<&'static str, FragmentId>,
    ) -> Self {
        Self { fragments, names }
    }
}

/// Handed to every handler and tick. Events posted through it are dispatched
/// to the same container right after the current handler returns, before the
/// next subscriber of the outer event runs.
///
/// Sibling fragments of the same container can be read and edited through
/// `lookup` and `get`. The fragment being run is lent out for the duration of
/// the call and is not visible through its own context.
pub struct EventContext<'a> {
    container: ContainerId,
    side: Option<Side>,
    fragment: &'static str,
    depth: usize,
    posted: Vec<PostedEvent>,
    siblings: Siblings<'a>,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(
        container: ContainerId,
        side: Option<Side>,
        fragment: &'static str,
        depth: usize,
        siblings: Siblings<'a>,
    ) -> Self {
        Self {
            container,
            side,
            fragment,
            depth,
            posted: Vec::new(),
            siblings,
        }
    }

    pub fn post<E: Event>(&mut self, event: E) {
        self.posted.push(PostedEvent::new(event));
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    /// Name of the fragment currently handling the event
    pub fn fragment_name(&self) -> &'static str {
        self.fragment
    }

    /// Nesting depth of the event being handled, 0 for a top-level post
    pub fn depth(&self) -> usize {
        self.depth
    }

    // Siblings

    pub fn lookup(&self, name: &str) -> Option<&dyn Fragment> {
        let id = self.siblings.names.get(name)?;
        self.siblings
            .fragments
            .get(id)
            .map(|fragment| -> &dyn Fragment { fragment.as_ref() })
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut dyn Fragment> {
        let id = self.siblings.names.get(name)?;
        self.siblings
            .fragments
            .get_mut(id)
            .map(|fragment| -> &mut dyn Fragment { fragment.as_mut() })
    }

    /// The earliest attached sibling of type `T`
    pub fn get<T: Fragment>(&self) -> Option<&T> {
        self.siblings
            .fragments
            .values()
            .find_map(|fragment| fragment.as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: Fragment>(&mut self) -> Option<&mut T> {
        self.siblings
            .fragments
            .values_mut()
            .find_map(|fragment| fragment.as_any_mut().downcast_mut::<T>())
    }

    pub(crate) fn into_posted(self) -> Vec<PostedEvent> {
        self.posted
    }
}
