//! Translator registry keyed by exact runtime type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::builtin::{SocketAddrTranslator, UuidTranslator};
use crate::translation::Translator;

struct Registration {
    type_name: &'static str,
    /// An `Arc<dyn Translator<Value = T>>` for the registered `T`.
    translator: Box<dyn Any + Send + Sync>,
}

/// Mapping from a value type to its [`Translator`].
///
/// Lookups match the exact type only: a translator registered for `T` is
/// never used for a wrapper around `T` or any other type. Registering a
/// second translator for the same type replaces the first.
///
/// Registration takes `&mut self`; configure the registry before sharing it.
pub struct TranslatorRegistry {
    translators: HashMap<TypeId, Registration>,
}

impl TranslatorRegistry {
    /// A registry with the built-in translators for [`Uuid`] and [`SocketAddr`].
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(UuidTranslator);
        registry.register(SocketAddrTranslator);
        registry
    }

    /// A registry with no translators at all.
    pub fn empty() -> Self {
        Self {
            translators: HashMap::new(),
        }
    }

    /// Register `translator` for its value type. Returns `true` if it replaced
    /// an earlier registration.
    pub fn register<R>(&mut self, translator: R) -> bool
    where
        R: Translator + 'static,
    {
        let translator: Arc<dyn Translator<Value = R::Value>> = Arc::new(translator);
        self.register_arc(translator)
    }

    /// Register an already shared translator.
    pub fn register_arc<T: 'static>(&mut self, translator: Arc<dyn Translator<Value = T>>) -> bool {
        let type_name = std::any::type_name::<T>();
        let replaced = self
            .translators
            .insert(
                TypeId::of::<T>(),
                Registration {
                    type_name,
                    translator: Box::new(translator),
                },
            )
            .is_some();
        debug!(type_name, replaced, "registered translator");
        replaced
    }

    /// The translator registered for exactly `T`, if any.
    pub fn lookup<T: 'static>(&self) -> Option<Arc<dyn Translator<Value = T>>> {
        self.translators
            .get(&TypeId::of::<T>())
            .and_then(|r| r.translator.downcast_ref::<Arc<dyn Translator<Value = T>>>())
            .cloned()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.translators.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered translators.
    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    /// Names of all registered value types, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.translators.values().map(|r| r.type_name).collect();
        names.sort_unstable();
        names
    }
}

impl Default for TranslatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TranslatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
