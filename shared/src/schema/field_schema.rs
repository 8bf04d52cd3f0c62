use std::collections::{BTreeMap, HashSet};

use log::{debug, warn};

use super::{
    error::SchemaError,
    field::{ExclusionReason, FieldAccess, FieldDescriptor},
    state_blob::StateBlob,
    value::Value,
};

/// The fields of one concrete fragment type that take part in cloning,
/// persistence and sync, in declaration order.
///
/// A field is eligible iff it is not constant, not `copy_ignore`, and of a
/// supported value kind. Everything else lands in `excluded()` with the reason.
#[derive(Debug, PartialEq)]
pub struct FieldSchema {
    type_name: &'static str,
    eligible: Vec<FieldDescriptor>,
    excluded: Vec<(FieldDescriptor, ExclusionReason)>,
}

impl FieldSchema {
    pub fn build(type_name: &'static str, declared: Vec<FieldDescriptor>) -> Self {
        let mut seen = HashSet::new();
        let mut eligible = Vec::new();
        let mut excluded = Vec::new();

        for descriptor in declared {
            if !seen.insert(descriptor.name()) {
                excluded.push((descriptor, ExclusionReason::Duplicate));
                continue;
            }
            match descriptor.exclusion() {
                Some(reason) => {
                    debug!(
                        "FieldSchema: {}.{} excluded ({})",
                        type_name,
                        descriptor.name(),
                        reason
                    );
                    excluded.push((descriptor, reason));
                }
                None => eligible.push(descriptor),
            }
        }

        Self {
            type_name,
            eligible,
            excluded,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Eligible fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.eligible
    }

    pub fn excluded(&self) -> &[(FieldDescriptor, ExclusionReason)] {
        &self.excluded
    }

    pub fn is_eligible(&self, name: &str) -> bool {
        self.eligible.iter().any(|descriptor| descriptor.name() == name)
    }

    /// Looks up an eligible field, telling apart excluded fields from unknown names
    pub fn descriptor(&self, name: &str) -> Result<&FieldDescriptor, SchemaError> {
        if let Some(descriptor) = self.eligible.iter().find(|d| d.name() == name) {
            return Ok(descriptor);
        }
        if let Some((_, reason)) = self.excluded.iter().find(|(d, _)| d.name() == name) {
            return Err(SchemaError::SchemaIneligible {
                type_name: self.type_name,
                field: name.to_string(),
                reason: reason.clone(),
            });
        }
        Err(SchemaError::unknown_field(self.type_name, name))
    }

    /// Reads every eligible field into a blob. Fields the source fails to report
    /// are skipped with a warning.
    pub fn encode<F: FieldAccess + ?Sized>(&self, source: &F) -> StateBlob {
        let mut blob = StateBlob::new();
        for descriptor in &self.eligible {
            match source.field(descriptor.name()) {
                Some(value) => {
                    blob.insert(descriptor.name(), value);
                }
                None => warn!(
                    "FieldSchema: {} declares field '{}' but does not report a value for it",
                    self.type_name,
                    descriptor.name()
                ),
            }
        }
        blob
    }

    /// Writes the eligible fields present in `state` into `target`.
    ///
    /// Every value is kind-checked before anything is written, so a mismatched
    /// blob leaves the target untouched. Keys that are not eligible fields are
    /// ignored; eligible fields missing from the blob keep their current value.
    pub fn decode<F: FieldAccess + ?Sized>(
        &self,
        target: &mut F,
        state: &StateBlob,
    ) -> Result<(), SchemaError> {
        let mut writes = Vec::new();
        for descriptor in &self.eligible {
            let Some(value) = state.get(descriptor.name()) else {
                continue;
            };
            if !value.matches(descriptor.kind()) {
                return Err(SchemaError::KindMismatch {
                    type_name: self.type_name,
                    field: descriptor.name().to_string(),
                    expected: descriptor.kind().to_string(),
                    actual: value.type_label(),
                });
            }
            writes.push((descriptor.name(), value.clone()));
        }

        for (name, value) in writes {
            target.set_field(name, value)?;
        }
        Ok(())
    }

    /// Copies every eligible field from `source` into `target`
    pub fn copy_fields<S, T>(&self, source: &S, target: &mut T) -> Result<(), (String, SchemaError)>
    where
        S: FieldAccess + ?Sized,
        T: FieldAccess + ?Sized,
    {
        for descriptor in &self.eligible {
            let name = descriptor.name();
            let Some(value) = source.field(name) else {
                return Err((
                    name.to_string(),
                    SchemaError::rejected(self.type_name, name, "source reported no value"),
                ));
            };
            target
                .set_field(name, value)
                .map_err(|err| (name.to_string(), err))?;
        }
        Ok(())
    }

    /// Text form of every editable scalar field, for external tooling
    pub fn property_map<F: FieldAccess + ?Sized>(&self, source: &F) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for descriptor in self.eligible.iter().filter(|d| d.is_editable()) {
            if let Some(text) = source.field(descriptor.name()).and_then(|v| v.repr()) {
                map.insert(descriptor.name().to_string(), text);
            }
        }
        map
    }

    /// Parses and writes property map entries. Returns the number of fields written.
    pub fn apply_property_map<F: FieldAccess + ?Sized>(
        &self,
        target: &mut F,
        map: &BTreeMap<String, String>,
    ) -> Result<usize, SchemaError> {
        let mut written = 0;
        for (name, text) in map {
            let descriptor = self.descriptor(name)?;
            if !descriptor.is_editable() {
                return Err(SchemaError::rejected(self.type_name, name, "field is not editable"));
            }
            let value: Value = Value::parse(descriptor.kind(), text).ok_or_else(|| {
                SchemaError::ParseFailed {
                    type_name: self.type_name,
                    field: name.clone(),
                    text: text.clone(),
                }
            })?;
            target.set_field(name, value)?;
            written += 1;
        }
        Ok(written)
    }
}
