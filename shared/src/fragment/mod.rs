mod cloner;
mod error;
mod fragment;
mod fragment_base;
mod fragment_kind;
mod fragment_kinds;

pub use cloner::PrototypeCloner;
pub use error::{CloneError, FragmentError};
pub use fragment::{DynFragment, Fragment, FragmentType};
pub use fragment_base::{FragmentBase, FragmentBaseBuilder};
pub use fragment_kind::FragmentKind;
pub use fragment_kinds::FragmentKinds;
