//! # dotprops
//!
//! Human-readable property files with typed value storage.
//!
//! A property file maps dotted keys (`group.section.name`) to string values
//! and stores them grouped by their first two segments:
//!
//! ```text
//! test.object
//!     name = "test"
//!     age = "1"
//! ```
//!
//! [`PropertyFile`] adds typed reads and writes on top of the raw store.
//! Values are written through a registered [`Translator`] when one exists for
//! their exact type and otherwise member by member, as declared with
//! [`Storable`] or the [`storable!`] macro.
//!
//! ```no_run
//! use dotprops::{storable, PropertyFile};
//!
//! #[derive(Default)]
//! struct Player {
//!     name: Option<String>,
//!     level: i32,
//! }
//!
//! storable!(Player {
//!     optional name,
//!     scalar level,
//! });
//!
//! # fn main() -> dotprops::PropsResult<()> {
//! let mut file = PropertyFile::open("game.properties")?;
//! file.append("game.players.alice", &Player { name: Some("alice".into()), level: 3 })?;
//! let alice: Option<Player> = file.get("game.players.alice");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod file;

pub use error::{PropsError, PropsResult};
pub use file::PropertyFile;

pub use dotprops_serial::{
    storable, FallbackCodec, FnTranslator, MemberReader, MemberWriter, ObjectSerializer,
    SerialError, SocketAddrTranslator, Storable, Translator, TranslatorRegistry, UuidTranslator,
};
pub use dotprops_store::{
    child_key, split_key, validate_key, FlatStore, GroupedCodec, Properties, PropertiesConfig,
    Scalar, ScalarKind, StoreError,
};
