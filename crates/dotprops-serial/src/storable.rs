//! The [`Storable`] trait: an explicit declaration of a type's storable members.
//!
//! Types with no registered translator are written member by member. Each
//! type lists its members once for writing and once for reading; the
//! [`storable!`](crate::storable) macro generates both from a single list.

use std::net::SocketAddr;

use uuid::Uuid;

use crate::error::SerialResult;
use crate::member::{MemberReader, MemberWriter};

/// A value that can be appended to and read back from a property file.
///
/// All methods have defaults, so a type that is only ever handled by a
/// registered translator can use an empty `impl`.
pub trait Storable: 'static {
    /// Build a zero-initialized instance to read members into.
    ///
    /// Returning `None` means the type has no such constructor; reading it
    /// without a registered translator then fails.
    fn instantiate() -> Option<Self>
    where
        Self: Sized,
    {
        None
    }

    /// Write every non-null member.
    fn write_members(&self, _out: &mut MemberWriter<'_>) -> SerialResult<()> {
        Ok(())
    }

    /// Assign every member that has a stored value.
    fn read_members(&mut self, _input: &MemberReader<'_>) -> SerialResult<()> {
        Ok(())
    }
}

impl Storable for Uuid {}

impl Storable for SocketAddr {}

/// Implement [`Storable`] for a `Default` type from a list of members.
///
/// Each member is prefixed by how it is stored:
///
/// - `scalar`: a [`Scalar`] field
/// - `optional`: an `Option` of a [`Scalar`], skipped when `None`
/// - `opaque`: any serde type, written through the binary fallback codec
/// - `optional_opaque`: an `Option` of a serde type, skipped when `None`
///
/// [`Scalar`]: dotprops_store::Scalar
///
/// ```
/// use dotprops_serial::storable;
///
/// #[derive(Default)]
/// struct Player {
///     name: Option<String>,
///     level: i32,
///     inventory: Vec<String>,
///     guild: Option<Vec<String>>,
/// }
///
/// storable!(Player {
///     optional name,
///     scalar level,
///     opaque inventory,
///     optional_opaque guild,
/// });
/// ```
#[macro_export]
macro_rules! storable {
    ($ty:ty { $($kind:ident $field:ident),* $(,)? }) => {
        impl $crate::Storable for $ty {
            fn instantiate() -> ::std::option::Option<Self> {
                ::std::option::Option::Some(<Self as ::std::default::Default>::default())
            }

            fn write_members(
                &self,
                out: &mut $crate::MemberWriter<'_>,
            ) -> $crate::SerialResult<()> {
                $( out.$kind(::std::stringify!($field), &self.$field)?; )*
                ::std::result::Result::Ok(())
            }

            fn read_members(
                &mut self,
                input: &$crate::MemberReader<'_>,
            ) -> $crate::SerialResult<()> {
                $( input.$kind(::std::stringify!($field), &mut self.$field)?; )*
                ::std::result::Result::Ok(())
            }
        }
    };
}
