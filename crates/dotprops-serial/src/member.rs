//! Per-member access used by [`Storable`](crate::Storable) implementations.
//!
//! Each member is stored under `prefix.<name>`. Scalar members go through
//! [`Scalar`] coercion; opaque members go through the [`FallbackCodec`].

use dotprops_store::{child_key, Properties, Scalar};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{SerialError, SerialResult};
use crate::fallback::FallbackCodec;

/// Writes the members of one value beneath a key prefix.
pub struct MemberWriter<'a> {
    properties: &'a mut Properties,
    prefix: &'a str,
}

impl<'a> MemberWriter<'a> {
    pub fn new(properties: &'a mut Properties, prefix: &'a str) -> Self {
        Self { properties, prefix }
    }

    /// Write a scalar member.
    pub fn scalar<S: Scalar>(&mut self, name: &str, value: &S) -> SerialResult<()> {
        self.properties
            .append_scalar(&child_key(self.prefix, name), value)?;
        Ok(())
    }

    /// Write a nullable scalar member. `None` writes nothing.
    pub fn optional<S: Scalar>(&mut self, name: &str, value: &Option<S>) -> SerialResult<()> {
        match value {
            Some(value) => self.scalar(name, value),
            None => Ok(()),
        }
    }

    /// Write a member through the binary fallback codec.
    pub fn opaque<V: Serialize + ?Sized>(&mut self, name: &str, value: &V) -> SerialResult<()> {
        let text = FallbackCodec::encode(value)?;
        self.properties
            .append_string(&child_key(self.prefix, name), text)?;
        Ok(())
    }

    /// Write a nullable member through the binary fallback codec. `None`
    /// writes nothing.
    pub fn optional_opaque<V: Serialize>(
        &mut self,
        name: &str,
        value: &Option<V>,
    ) -> SerialResult<()> {
        match value {
            Some(value) => self.opaque(name, value),
            None => Ok(()),
        }
    }
}

/// Reads the members of one value from beneath a key prefix.
///
/// Members with no stored key are left untouched.
pub struct MemberReader<'a> {
    properties: &'a Properties,
    prefix: &'a str,
}

impl<'a> MemberReader<'a> {
    pub fn new(properties: &'a Properties, prefix: &'a str) -> Self {
        Self { properties, prefix }
    }

    /// Read a scalar member into `slot`.
    pub fn scalar<S: Scalar>(&self, name: &str, slot: &mut S) -> SerialResult<()> {
        if let Some(value) = self.coerce(name)? {
            *slot = value;
        }
        Ok(())
    }

    /// Read a nullable scalar member into `slot`.
    pub fn optional<S: Scalar>(&self, name: &str, slot: &mut Option<S>) -> SerialResult<()> {
        if let Some(value) = self.coerce(name)? {
            *slot = Some(value);
        }
        Ok(())
    }

    /// Read a member stored through the binary fallback codec.
    pub fn opaque<V: DeserializeOwned>(&self, name: &str, slot: &mut V) -> SerialResult<()> {
        let key = child_key(self.prefix, name);
        if let Some(text) = self.properties.get_string(&key) {
            *slot = FallbackCodec::decode(text)?;
        }
        Ok(())
    }

    /// Read a nullable member stored through the binary fallback codec.
    pub fn optional_opaque<V: DeserializeOwned>(
        &self,
        name: &str,
        slot: &mut Option<V>,
    ) -> SerialResult<()> {
        let key = child_key(self.prefix, name);
        if let Some(text) = self.properties.get_string(&key) {
            *slot = Some(FallbackCodec::decode(text)?);
        }
        Ok(())
    }

    fn coerce<S: Scalar>(&self, name: &str) -> SerialResult<Option<S>> {
        let key = child_key(self.prefix, name);
        let Some(raw) = self.properties.get_string(&key) else {
            return Ok(None);
        };
        match S::from_property(raw) {
            Some(value) => Ok(Some(value)),
            None => Err(SerialError::Coercion {
                raw: raw.to_string(),
                key,
                expected: S::KIND,
            }),
        }
    }
}
