use tether_shared::{
    FieldAccess, FieldDescriptor, Fragment, FragmentBase, FragmentType, SchemaError, Value,
    ValueKind,
};

/// Per-side settings that never leave the side they live on
pub struct Preference {
    base: FragmentBase,
    pub volume: i64,
}

impl Default for Preference {
    fn default() -> Self {
        Self {
            base: FragmentBase::builder::<Self>().local_only().build(),
            volume: 50,
        }
    }
}

impl FieldAccess for Preference {
    fn field(&self, name: &str) -> Option<Value> {
        (name == "volume").then(|| self.volume.into())
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), SchemaError> {
        if name != "volume" {
            return Err(SchemaError::unknown_field(Self::NAME, name));
        }
        self.volume = value.take(Self::NAME, name)?;
        Ok(())
    }
}

impl Fragment for Preference {
    fn base(&self) -> &FragmentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FragmentBase {
        &mut self.base
    }
}

impl FragmentType for Preference {
    const NAME: &'static str = "preference";

    fn fields() -> Vec<FieldDescriptor> {
        vec![FieldDescriptor::new("volume", ValueKind::Int)]
    }
}
