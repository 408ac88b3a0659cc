//! The object serializer: translator dispatch with member mapping as fallback.

use dotprops_store::Properties;
use tracing::debug;

use crate::error::{SerialError, SerialResult};
use crate::member::{MemberReader, MemberWriter};
use crate::registry::TranslatorRegistry;
use crate::storable::Storable;
use crate::translation::Translator;

/// Serializes typed values into a [`Properties`] store and back.
///
/// A registered translator for the exact value type takes precedence. Without
/// one, the value's declared members are written as `key.<member>` entries.
#[derive(Debug, Default)]
pub struct ObjectSerializer {
    registry: TranslatorRegistry,
}

impl ObjectSerializer {
    /// A serializer with the built-in translators.
    pub fn new() -> Self {
        Self::with_registry(TranslatorRegistry::new())
    }

    pub fn with_registry(registry: TranslatorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TranslatorRegistry {
        &self.registry
    }

    /// Register a translator, replacing any earlier one for the same type.
    pub fn register<R>(&mut self, translator: R) -> bool
    where
        R: Translator + 'static,
    {
        self.registry.register(translator)
    }

    /// Write `value` under `key`.
    ///
    /// Member-mapped values end with a full save of the store.
    pub fn serialize<T: Storable>(
        &self,
        properties: &mut Properties,
        key: &str,
        value: &T,
    ) -> SerialResult<()> {
        let type_name = std::any::type_name::<T>();

        if let Some(translator) = self.registry.lookup::<T>() {
            debug!(key, type_name, "serializing through translator");
            return translator.serialize(key, properties, value);
        }

        debug!(key, type_name, "serializing members");
        value.write_members(&mut MemberWriter::new(properties, key))?;
        properties.save_properties()?;
        Ok(())
    }

    /// Read a `T` from the entries under `key`.
    ///
    /// Without a translator, a fresh instance is built with
    /// [`Storable::instantiate`] and every stored member is assigned into it.
    pub fn deserialize<T: Storable>(&self, properties: &Properties, key: &str) -> SerialResult<T> {
        if let Some(translator) = self.registry.lookup::<T>() {
            return translator.deserialize(key, properties);
        }

        let instance = T::instantiate().ok_or(SerialError::Unconstructible {
            type_name: std::any::type_name::<T>(),
        })?;
        self.read_into(properties, key, instance)
    }

    /// Read the entries under `key` into an existing instance.
    ///
    /// Members with no stored value keep their current value. A registered
    /// translator replaces the instance entirely.
    pub fn deserialize_into<T: Storable>(
        &self,
        properties: &Properties,
        key: &str,
        instance: T,
    ) -> SerialResult<T> {
        if let Some(translator) = self.registry.lookup::<T>() {
            return translator.deserialize(key, properties);
        }
        self.read_into(properties, key, instance)
    }

    fn read_into<T: Storable>(
        &self,
        properties: &Properties,
        key: &str,
        mut instance: T,
    ) -> SerialResult<T> {
        debug!(key, type_name = std::any::type_name::<T>(), "deserializing members");
        instance.read_members(&MemberReader::new(properties, key))?;
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storable;
    use crate::translation::FnTranslator;
    use dotprops_store::child_key;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::net::SocketAddr;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Schedule {
        days: Vec<u8>,
        notes: BTreeMap<String, String>,
    }

    #[derive(Debug, Default, PartialEq)]
    struct TestObject {
        name: Option<String>,
        age: i32,
        update: bool,
        time: f64,
        initial: char,
        schedule: Option<Schedule>,
    }

    storable!(TestObject {
        optional name,
        scalar age,
        scalar update,
        scalar time,
        scalar initial,
        optional_opaque schedule,
    });

    /// Has members but no way to build a fresh instance.
    #[derive(Debug)]
    struct Handle {
        id: i64,
    }

    impl Storable for Handle {
        fn write_members(&self, out: &mut MemberWriter<'_>) -> SerialResult<()> {
            out.scalar("id", &self.id)
        }
    }

    #[derive(Debug, PartialEq)]
    struct Tagged(Uuid);

    impl Storable for Tagged {
        fn instantiate() -> Option<Self> {
            Some(Self(Uuid::nil()))
        }
    }

    fn scratch() -> (tempfile::TempDir, Properties) {
        let dir = tempfile::tempdir().unwrap();
        let props = Properties::open(dir.path().join("serializer.properties")).unwrap();
        (dir, props)
    }

    fn sample() -> TestObject {
        let mut notes = BTreeMap::new();
        notes.insert("mon".into(), "standup".into());
        TestObject {
            name: Some("test".into()),
            age: 1,
            update: false,
            time: 12.12,
            initial: 't',
            schedule: Some(Schedule {
                days: vec![1, 3, 5],
                notes,
            }),
        }
    }

    #[test]
    fn object_roundtrip_through_file() {
        let (_dir, mut props) = scratch();
        let serializer = ObjectSerializer::new();
        serializer.serialize(&mut props, "test.object", &sample()).unwrap();

        let reloaded = Properties::open(props.path()).unwrap();
        let restored: TestObject = serializer.deserialize(&reloaded, "test.object").unwrap();
        assert_eq!(restored, sample());
    }

    #[test]
    fn members_use_scalar_layout() {
        let (_dir, mut props) = scratch();
        ObjectSerializer::new()
            .serialize(&mut props, "test.object", &sample())
            .unwrap();

        assert_eq!(props.get_string("test.object.name"), Some("test"));
        assert_eq!(props.get_string("test.object.age"), Some("1"));
        assert_eq!(props.get_string("test.object.update"), Some("false"));
        assert_eq!(props.get_string("test.object.time"), Some("12.12"));
        assert_eq!(props.get_string("test.object.initial"), Some("t"));
        assert!(props.get_string("test.object.schedule").is_some());
    }

    #[test]
    fn null_members_are_skipped() {
        let (_dir, mut props) = scratch();
        let value = TestObject {
            name: None,
            ..sample()
        };
        ObjectSerializer::new()
            .serialize(&mut props, "test.object", &value)
            .unwrap();
        assert!(!props.contains_key("test.object.name"));
    }

    #[test]
    fn null_opaque_members_are_skipped() {
        let (_dir, mut props) = scratch();
        let serializer = ObjectSerializer::new();
        let value = TestObject {
            schedule: None,
            ..sample()
        };
        serializer.serialize(&mut props, "test.object", &value).unwrap();
        assert!(!props.contains_key("test.object.schedule"));

        let restored: TestObject = serializer.deserialize(&props, "test.object").unwrap();
        assert_eq!(restored, value);
    }

    #[test]
    fn missing_members_keep_defaults() {
        let (_dir, mut props) = scratch();
        props.append_int("test.object.age", 30).unwrap();

        let restored: TestObject = ObjectSerializer::new()
            .deserialize(&props, "test.object")
            .unwrap();
        assert_eq!(
            restored,
            TestObject {
                age: 30,
                ..TestObject::default()
            }
        );
    }

    #[test]
    fn deserialize_into_keeps_unstored_members() {
        let (_dir, mut props) = scratch();
        props.append_int("test.object.age", 30).unwrap();

        let start = TestObject {
            name: Some("kept".into()),
            ..TestObject::default()
        };
        let restored = ObjectSerializer::new()
            .deserialize_into(&props, "test.object", start)
            .unwrap();
        assert_eq!(restored.name.as_deref(), Some("kept"));
        assert_eq!(restored.age, 30);
    }

    #[test]
    fn malformed_member_fails() {
        let (_dir, mut props) = scratch();
        props.append_string("test.object.age", "not-a-number").unwrap();
        let err = ObjectSerializer::new()
            .deserialize::<TestObject>(&props, "test.object")
            .unwrap_err();
        assert!(matches!(err, SerialError::Coercion { .. }));
    }

    #[test]
    fn unconstructible_type_fails() {
        let (_dir, mut props) = scratch();
        let serializer = ObjectSerializer::new();
        serializer
            .serialize(&mut props, "test.handle", &Handle { id: 9 })
            .unwrap();
        assert_eq!(props.get_long("test.handle.id"), Some(9));

        let err = serializer
            .deserialize::<Handle>(&props, "test.handle")
            .unwrap_err();
        assert!(matches!(err, SerialError::Unconstructible { .. }));
    }

    #[test]
    fn builtin_uuid_translator() {
        let (_dir, mut props) = scratch();
        let serializer = ObjectSerializer::new();
        let id = Uuid::new_v4();
        serializer.serialize(&mut props, "test.uuid", &id).unwrap();

        let reloaded = Properties::open(props.path()).unwrap();
        assert_eq!(serializer.deserialize::<Uuid>(&reloaded, "test.uuid").unwrap(), id);
    }

    #[test]
    fn builtin_socket_addr_translator() {
        let (_dir, mut props) = scratch();
        let serializer = ObjectSerializer::new();
        let addr: SocketAddr = "0.0.0.0:12312".parse().unwrap();
        serializer.serialize(&mut props, "test.address", &addr).unwrap();

        let restored: SocketAddr = serializer.deserialize(&props, "test.address").unwrap();
        assert_eq!(restored.port(), 12312);
        assert_eq!(
            restored.ip().to_string(),
            props.get_string("test.address.host").unwrap()
        );
    }

    #[test]
    fn translator_is_not_used_for_wrapper_type() {
        let (_dir, mut props) = scratch();
        let serializer = ObjectSerializer::new();
        serializer.serialize(&mut props, "test.uuid", &Uuid::new_v4()).unwrap();

        // Tagged wraps a Uuid but has no translator of its own: it is member
        // mapped, has no members, and reads back as its fresh instance.
        let tagged: Tagged = serializer.deserialize(&props, "test.uuid").unwrap();
        assert_eq!(tagged, Tagged(Uuid::nil()));
    }

    #[test]
    fn custom_translator_takes_precedence() {
        let (_dir, mut props) = scratch();
        let mut serializer = ObjectSerializer::new();
        serializer.register(FnTranslator::new(
            |key: &str, props: &mut Properties, value: &Tagged| {
                props.append_string(&child_key(key, "id"), value.0.to_string())?;
                Ok(())
            },
            |key: &str, props: &Properties| {
                let field = child_key(key, "id");
                props
                    .get_string(&field)
                    .and_then(|s| s.parse().ok())
                    .map(Tagged)
                    .ok_or(SerialError::MissingField { key: field })
            },
        ));

        let value = Tagged(Uuid::new_v4());
        serializer.serialize(&mut props, "test.tagged", &value).unwrap();
        assert_eq!(
            props.get_string("test.tagged.id"),
            Some(value.0.to_string().as_str())
        );
        assert_eq!(
            serializer.deserialize::<Tagged>(&props, "test.tagged").unwrap(),
            value
        );
    }

    #[test]
    fn serialize_is_first_write_wins_per_member() {
        let (_dir, mut props) = scratch();
        let serializer = ObjectSerializer::new();
        serializer.serialize(&mut props, "test.object", &sample()).unwrap();

        let changed = TestObject {
            age: 99,
            ..sample()
        };
        serializer.serialize(&mut props, "test.object", &changed).unwrap();
        assert_eq!(props.get_int("test.object.age"), Some(1));
    }
}
