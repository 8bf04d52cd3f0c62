use std::any::TypeId;

/// Type tag of a concrete fragment type
#[derive(Eq, Hash, Copy, Clone, PartialEq, Debug)]
pub struct FragmentKind {
    type_id: TypeId,
}

impl From<TypeId> for FragmentKind {
    fn from(type_id: TypeId) -> Self {
        Self { type_id }
    }
}

impl FragmentKind {
    pub fn of<T: 'static>() -> Self {
        Self::from(TypeId::of::<T>())
    }
}
