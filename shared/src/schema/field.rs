use std::fmt;

use super::{error::SchemaError, value::{Value, ValueKind}};

/// Read/write access to a fragment's declared fields by name.
///
/// This replaces runtime introspection: each fragment type maps its declared
/// field names onto its own struct fields.
pub trait FieldAccess {
    /// Current value of a declared field, `None` if the name is not handled
    fn field(&self, name: &str) -> Option<Value>;

    /// Overwrites a declared field
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), SchemaError>;
}

/// One entry of a fragment type's declarative field table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: ValueKind,
    constant: bool,
    copy_ignore: bool,
    edit_ignore: bool,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            constant: false,
            copy_ignore: false,
            edit_ignore: false,
        }
    }

    /// The field never changes after construction
    pub fn constant(mut self) -> Self {
        self.constant = true;
        self
    }

    /// Explicitly excluded from copy/persist/sync
    pub fn copy_ignore(mut self) -> Self {
        self.copy_ignore = true;
        self
    }

    /// Hidden from editing tools, still copied
    pub fn edit_ignore(mut self) -> Self {
        self.edit_ignore = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn is_editable(&self) -> bool {
        !self.edit_ignore
    }

    /// Why this field would be left out of a schema, if at all
    pub fn exclusion(&self) -> Option<ExclusionReason> {
        if self.constant {
            Some(ExclusionReason::Constant)
        } else if self.copy_ignore {
            Some(ExclusionReason::CopyIgnored)
        } else if !self.kind.is_supported() {
            Some(ExclusionReason::Unsupported(self.kind.to_string()))
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExclusionReason {
    Constant,
    CopyIgnored,
    Unsupported(String),
    /// A field with the same name was declared earlier
    Duplicate,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Constant => write!(f, "constant"),
            ExclusionReason::CopyIgnored => write!(f, "copy-ignored"),
            ExclusionReason::Unsupported(kind) => write!(f, "unsupported kind {}", kind),
            ExclusionReason::Duplicate => write!(f, "duplicate declaration"),
        }
    }
}
