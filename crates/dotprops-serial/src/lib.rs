//! Typed value marshalling for dotprops property files.
//!
//! Values are written into a [`Properties`](dotprops_store::Properties) store
//! as a set of `key.<field>` entries and read back into typed values.
//!
//! # Dispatch
//!
//! 1. If a [`Translator`] is registered for the exact value type, it handles
//!    the whole value.
//! 2. Otherwise the value's [`Storable`] members are written one by one:
//!    scalars through string coercion, everything else through the
//!    [`FallbackCodec`].
//!
//! Translators for [`uuid::Uuid`] and [`std::net::SocketAddr`] are registered
//! by default.
//!
//! The fallback encoding embeds a Rust type name and is only meant to be read
//! back by the program that wrote it.

pub mod builtin;
pub mod error;
pub mod fallback;
pub mod member;
pub mod registry;
pub mod serializer;
pub mod storable;
pub mod translation;

pub use builtin::{SocketAddrTranslator, UuidTranslator};
pub use error::{SerialError, SerialResult};
pub use fallback::FallbackCodec;
pub use member::{MemberReader, MemberWriter};
pub use registry::TranslatorRegistry;
pub use serializer::ObjectSerializer;
pub use storable::Storable;
pub use translation::{FnTranslator, Translator};
