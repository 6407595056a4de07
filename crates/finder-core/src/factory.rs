//! Ready-made entity factories.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::traits::EntityFactory;
use crate::types::Params;

/// Deserializes `_source` straight into `T`.
pub struct DeserializeFactory<T> {
    _entity: PhantomData<fn() -> T>,
}

impl<T> DeserializeFactory<T> {
    pub fn new() -> Self { Self { _entity: PhantomData } }
}

impl<T> Default for DeserializeFactory<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for DeserializeFactory<T> {
    fn clone(&self) -> Self { Self::new() }
}

impl<T> fmt::Debug for DeserializeFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeserializeFactory").field("entity", &std::any::type_name::<T>()).finish()
    }
}

impl<T: DeserializeOwned> EntityFactory for DeserializeFactory<T> {
    type Entity = T;

    fn create_entity(&self, attributes: &Params) -> Result<T> {
        serde_json::from_value(Value::Object(attributes.clone()))
            .map_err(|e| Error::Entity(format!("{}: {}", std::any::type_name::<T>(), e)))
    }
}
