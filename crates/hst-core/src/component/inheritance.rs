//! Top-down parameter inheritance

use super::{ComponentConfig, LifecycleState, split_prefixed_key};
use crate::Result;

/// Pushes parent parameters down to children that do not set them.
pub struct ParameterInheritance<'a> {
    delimiter: &'a str,
}

impl<'a> ParameterInheritance<'a> {
    pub fn new(delimiter: &'a str) -> Self {
        Self { delimiter }
    }

    pub fn apply(&self, config: &mut ComponentConfig) -> Result<()> {
        config.enter_pass(
            LifecycleState::ReferencesResolved,
            LifecycleState::ParametersInherited,
        )?;
        let ComponentConfig { attrs, children, .. } = config;
        for child in children.iter_mut() {
            for (key, value) in attrs.parameters.iter() {
                if child.attrs.parameters.insert_if_absent(key, value)
                    && let Some((prefix, _)) = split_prefixed_key(key, self.delimiter)
                {
                    child.attrs.parameter_name_prefixes.insert(prefix.to_string());
                }
            }
            self.apply(child)?;
        }
        Ok(())
    }
}
