//! Primitive coercion between stored strings and scalar types.
//!
//! Parsing is strict: anything that does not parse as the requested type
//! yields `None`. Callers of the scalar getters cannot tell a missing key
//! from a malformed value.

/// The scalar types a value can be coerced to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Long,
    Double,
    Boolean,
    Char,
    String,
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Long => write!(f, "long"),
            Self::Double => write!(f, "double"),
            Self::Boolean => write!(f, "boolean"),
            Self::Char => write!(f, "char"),
            Self::String => write!(f, "string"),
        }
    }
}

/// A value with a canonical string form in the flat store.
pub trait Scalar: Sized {
    /// The kind reported in coercion errors.
    const KIND: ScalarKind;

    /// Canonical string form written to the store.
    fn to_property(&self) -> String;

    /// Strict parse of a stored string.
    fn from_property(raw: &str) -> Option<Self>;
}

impl Scalar for i32 {
    const KIND: ScalarKind = ScalarKind::Int;

    fn to_property(&self) -> String {
        self.to_string()
    }

    fn from_property(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl Scalar for i64 {
    const KIND: ScalarKind = ScalarKind::Long;

    fn to_property(&self) -> String {
        self.to_string()
    }

    fn from_property(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::Double;

    fn to_property(&self) -> String {
        self.to_string()
    }

    fn from_property(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Boolean;

    fn to_property(&self) -> String {
        self.to_string()
    }

    fn from_property(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl Scalar for char {
    const KIND: ScalarKind = ScalarKind::Char;

    fn to_property(&self) -> String {
        self.to_string()
    }

    fn from_property(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn to_property(&self) -> String {
        self.clone()
    }

    fn from_property(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}
