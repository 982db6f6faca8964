//! The building blocks of the field tables.
//!
//! A [`Field`] pairs a qualified key with a [`Slot`]. The slot names the kind
//! of value to coerce the raw text into, the default (if the field has one),
//! and an accessor for the record field it lands in.

use crate::{namespace::QualifiedKey, record::Timestamp};

/// Where a coerced value goes, and how to coerce it.
///
/// Each accessor is a plain `fn` pointer, so the tables can live in statics.
pub enum Slot<G: 'static> {
    /// Text, kept as-is. Empty text is treated as missing.
    Text(fn(&mut G) -> &mut Option<String>),

    /// An integer that falls back to `default`.
    Int {
        default: i64,
        field: fn(&mut G) -> &mut i64,
    },

    /// An integer with no sensible default.
    OptInt(fn(&mut G) -> &mut Option<i64>),

    /// A float that falls back to `default`.
    Float {
        default: f64,
        field: fn(&mut G) -> &mut f64,
    },

    /// A rational (`N/D`) or decimal, stored as its quotient.
    Rational(fn(&mut G) -> &mut Option<f64>),

    /// A boolean that falls back to `default`.
    Bool {
        default: bool,
        field: fn(&mut G) -> &mut bool,
    },

    /// A boolean with no sensible default.
    OptBool(fn(&mut G) -> &mut Option<bool>),

    /// An XMP date.
    Timestamp(fn(&mut G) -> &mut Option<Timestamp>),
}

impl<G: 'static> Slot<G> {
    /// A short name for the kind of value, used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Slot::Text(_) => "text",
            Slot::Int { .. } | Slot::OptInt(_) => "integer",
            Slot::Float { .. } => "real",
            Slot::Rational(_) => "rational",
            Slot::Bool { .. } | Slot::OptBool(_) => "boolean",
            Slot::Timestamp(_) => "date",
        }
    }
}

/// One scalar attribute of a group.
pub struct Field<G: 'static> {
    pub key: QualifiedKey,
    pub slot: Slot<G>,
}

/// The RDF container a list is expected to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    /// `rdf:Seq`
    Ordered,
    /// `rdf:Bag`
    Unordered,
    /// `rdf:Bag`, or `rdf:Seq` if there's no bag.
    Either,
}

/// Where the items of a list go.
pub enum ListSlot<G: 'static> {
    Texts(fn(&mut G) -> &mut Option<Vec<String>>),
    Ints(fn(&mut G) -> &mut Option<Vec<i64>>),
}

/// One list-valued child element of a group, like `dc:subject`.
pub struct ListField<G: 'static> {
    /// The element holding the container.
    pub container: QualifiedKey,
    pub collection: Collection,
    pub slot: ListSlot<G>,
}

/// A group of the record that can be filled from a table.
pub trait Group: Default + Sized + 'static {
    /// Name used in logs.
    const NAME: &'static str;

    /// The scalar fields of this group.
    fn fields() -> &'static [Field<Self>];

    /// The list fields of this group.
    fn lists() -> &'static [ListField<Self>] {
        &[]
    }
}
