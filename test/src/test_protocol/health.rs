use tether_shared::{
    FieldAccess, FieldDescriptor, Fragment, FragmentBase, FragmentType, SchemaError, Value,
    ValueKind,
};

/// Hit points. Dropped when the owner is reset.
pub struct Health {
    base: FragmentBase,
    pub hp: i64,
}

impl Default for Health {
    fn default() -> Self {
        Self {
            base: FragmentBase::builder::<Self>().clear_on_reset().build(),
            hp: 0,
        }
    }
}

impl FieldAccess for Health {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "hp" => Some(self.hp.into()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), SchemaError> {
        match name {
            "hp" => self.hp = value.take(Self::NAME, name)?,
            _ => return Err(SchemaError::unknown_field(Self::NAME, name)),
        }
        Ok(())
    }
}

impl Fragment for Health {
    fn base(&self) -> &FragmentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FragmentBase {
        &mut self.base
    }
}

impl FragmentType for Health {
    const NAME: &'static str = "health";

    fn fields() -> Vec<FieldDescriptor> {
        vec![FieldDescriptor::new("hp", ValueKind::Int)]
    }
}
