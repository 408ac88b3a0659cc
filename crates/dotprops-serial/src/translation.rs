//! The [`Translator`] trait: a type-specific serialize/deserialize pair.
//!
//! A translator owns the full layout of its type under a key prefix. When one
//! is registered for a type, the member mapper is bypassed entirely.

use std::marker::PhantomData;

use dotprops_store::Properties;

use crate::error::SerialResult;

/// Serialize and deserialize one value type under a key prefix.
///
/// Implementations write sub-keys beneath `key` (e.g. `key.host`) through the
/// scalar append operations of [`Properties`] and read them back with the
/// scalar getters.
pub trait Translator: Send + Sync {
    /// The exact type this translator handles.
    type Value: 'static;

    /// Write `value` under `key`.
    fn serialize(&self, key: &str, properties: &mut Properties, value: &Self::Value)
        -> SerialResult<()>;

    /// Rebuild a value from the entries under `key`.
    fn deserialize(&self, key: &str, properties: &Properties) -> SerialResult<Self::Value>;
}

/// A translator assembled from two closures.
///
/// ```
/// use dotprops_serial::{FnTranslator, SerialError};
/// use dotprops_store::child_key;
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(f64);
///
/// let translator = FnTranslator::new(
///     |key: &str, props: &mut dotprops_store::Properties, value: &Celsius| {
///         props.append_double(&child_key(key, "celsius"), value.0)?;
///         Ok(())
///     },
///     |key: &str, props: &dotprops_store::Properties| {
///         let field = child_key(key, "celsius");
///         props
///             .get_double(&field)
///             .map(Celsius)
///             .ok_or(SerialError::MissingField { key: field })
///     },
/// );
/// # let _ = translator;
/// ```
pub struct FnTranslator<T, S, D> {
    serialize: S,
    deserialize: D,
    _value: PhantomData<fn() -> T>,
}

impl<T, S, D> FnTranslator<T, S, D>
where
    T: 'static,
    S: Fn(&str, &mut Properties, &T) -> SerialResult<()> + Send + Sync,
    D: Fn(&str, &Properties) -> SerialResult<T> + Send + Sync,
{
    pub fn new(serialize: S, deserialize: D) -> Self {
        Self {
            serialize,
            deserialize,
            _value: PhantomData,
        }
    }
}

impl<T, S, D> Translator for FnTranslator<T, S, D>
where
    T: 'static,
    S: Fn(&str, &mut Properties, &T) -> SerialResult<()> + Send + Sync,
    D: Fn(&str, &Properties) -> SerialResult<T> + Send + Sync,
{
    type Value = T;

    fn serialize(&self, key: &str, properties: &mut Properties, value: &T) -> SerialResult<()> {
        (self.serialize)(key, properties, value)
    }

    fn deserialize(&self, key: &str, properties: &Properties) -> SerialResult<T> {
        (self.deserialize)(key, properties)
    }
}
