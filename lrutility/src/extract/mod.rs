//! Reads a Lightroom sidecar into a [`MetadataRecord`].
//!
//! The extractor itself knows very little about XMP properties. It finds the
//! sidecar's `rdf:Description`, indexes its attributes, then walks each
//! group's table from `lrutility_types::fields`, handing every raw value to
//! the coercer its slot asks for.
//!
//! Only two parts of the record get special treatment: `xmpMM:History`, which
//! is a sequence of structs, and `exif:Flash`, which is a single struct that
//! may be missing entirely.

use std::{path::Path, sync::LazyLock};

use lrutility_types::{
    fields::{self, Group, ListField, ListSlot, Slot, history_event},
    namespace::{Namespace, QualifiedKey},
    record::{DocumentInfo, FlashInfo, HistoryEvent, MetadataRecord},
};
use rustc_hash::FxHashSet;
use xmltree::{AttributeName, Element};

use crate::{
    coerce,
    error::ExtractError,
    extract::{element::ElementExt as _, properties::Properties},
};

mod element;
mod properties;

/// Reads the sidecar at `path`.
///
/// Fails only when the file can't be read or isn't XML. Anything wrong with
/// individual values just leaves that field at its default.
pub fn extract(path: impl AsRef<Path>) -> Result<MetadataRecord, ExtractError> {
    Extractor.extract(path)
}

/// Reads a sidecar that's already in memory.
pub fn extract_str(xml: &str) -> Result<MetadataRecord, ExtractError> {
    Extractor.extract_str(xml)
}

/// The sidecar reader.
///
/// It holds no state, so one value can be shared freely between threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct Extractor;

impl Extractor {
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<MetadataRecord, ExtractError> {
        let path = path.as_ref();
        log::trace!("Reading sidecar at `{}`...", path.display());

        let raw = std::fs::read(path).map_err(|e| ExtractError::from_io(path.to_path_buf(), e))?;

        let root = Element::parse(raw.as_slice()).map_err(|e| {
            log::error!("Sidecar `{}` isn't valid XML. err: {e}", path.display());
            ExtractError::XmlMalformed {
                path: Some(path.to_path_buf()),
                source: e.into(),
            }
        })?;

        Ok(self.read(&root))
    }

    pub fn extract_str(&self, xml: &str) -> Result<MetadataRecord, ExtractError> {
        let root = Element::parse(xml.as_bytes())?;
        Ok(self.read(&root))
    }

    /// Builds a record from an already-parsed document.
    pub fn read(&self, root: &Element) -> MetadataRecord {
        let Some(description) = find_description(root) else {
            log::warn!("No `rdf:Description` element found. Returning an empty record.");
            return MetadataRecord::default();
        };

        log_unknown_attributes(description);
        let props = Properties::new(description);

        MetadataRecord {
            basic: read_group(&props),
            document: DocumentInfo {
                history: read_history(description),
                ..read_group(&props)
            },
            sensor: read_group(&props),
            exposure: read_group(&props),
            flash: read_flash(description),
            lens: read_group(&props),
            editor: read_group(&props),
            develop: read_group(&props),
            descriptive: read_group(&props),
            media_pick: read_group(&props),
        }
    }
}

/// Finds the first `rdf:Description`, searching depth-first from (and
/// including) `element`.
fn find_description(element: &Element) -> Option<&Element> {
    if element.is_rdf("Description") {
        return Some(element);
    }

    element.child_elements().find_map(find_description)
}

/// Fills one group from its table.
fn read_group<G: Group>(props: &Properties<'_>) -> G {
    let mut group = G::default();

    for row in G::fields() {
        let raw = props.get(&row.key);
        let raw = raw.as_deref();

        if let Some(text) = raw {
            log::trace!(
                "{}: `{}` = `{text}` (as {})",
                G::NAME,
                row.key,
                row.slot.kind()
            );
        }

        match &row.slot {
            Slot::Text(f) => *f(&mut group) = coerce::parse_text(raw),
            Slot::Int { default, field } => *field(&mut group) = coerce::parse_int(raw, *default),
            Slot::OptInt(f) => *f(&mut group) = coerce::parse_opt_int(raw),
            Slot::Float { default, field } => {
                *field(&mut group) = coerce::parse_float(raw, *default)
            }
            Slot::Rational(f) => *f(&mut group) = coerce::parse_rational(raw),
            Slot::Bool { default, field } => *field(&mut group) = coerce::parse_bool(raw, *default),
            Slot::OptBool(f) => *f(&mut group) = coerce::parse_opt_bool(raw),
            Slot::Timestamp(f) => *f(&mut group) = coerce::parse_timestamp(raw),
        }
    }

    for list in G::lists() {
        read_list(props.element(), list, &mut group);
    }

    group
}

/// Fills one list field from its container.
///
/// Items that are blank (or, for integer lists, unreadable) are skipped. If
/// nothing's left, the field stays `None`.
fn read_list<G: Group>(element: &Element, list: &ListField<G>, group: &mut G) {
    let Some(container) = element
        .find_child(&list.container)
        .and_then(|holder| holder.container(list.collection))
    else {
        return;
    };

    let texts: Vec<String> = container
        .items()
        .flat_map(|li| li.text_value())
        .map(|text| text.trim().to_owned())
        .collect();

    log::trace!("{}: `{}` has {} item(s).", G::NAME, list.container, texts.len());

    match &list.slot {
        ListSlot::Texts(f) => {
            *f(group) = Some(texts).filter(|t| !t.is_empty());
        }

        ListSlot::Ints(f) => {
            let ints: Vec<i64> = texts
                .iter()
                .flat_map(|text| coerce::parse_opt_int(Some(text.as_str())))
                .collect();

            *f(group) = Some(ints).filter(|i| !i.is_empty());
        }
    }
}

/// The properties of a struct value.
///
/// A struct's fields can sit on the element itself (as attributes or with
/// `rdf:parseType="Resource"`), or on an `rdf:Description` nested inside it.
fn struct_properties(element: &Element) -> Properties<'_> {
    match element.child_elements().find(|c| c.is_rdf("Description")) {
        Some(inner) => Properties::new(inner),
        None => Properties::new(element),
    }
}

/// Reads `exif:Flash`, if the sidecar has one.
fn read_flash(description: &Element) -> Option<FlashInfo> {
    let Some(flash) = description.find_child(&fields::FLASH) else {
        log::trace!("No `exif:Flash` element. Leaving flash info empty.");
        return None;
    };

    Some(read_group(&struct_properties(flash)))
}

/// Reads every entry of `xmpMM:History`, in document order.
fn read_history(description: &Element) -> Vec<HistoryEvent> {
    let Some(seq) = description
        .find_child(&fields::HISTORY)
        .and_then(|history| history.container(fields::Collection::Ordered))
    else {
        return Vec::new();
    };

    seq.items()
        .map(|li| {
            let props = struct_properties(li);
            let text = |key: QualifiedKey| props.get(&key);

            HistoryEvent {
                action: coerce::parse_text(text(history_event::ACTION).as_deref()),
                instance_id: coerce::parse_text(text(history_event::INSTANCE_ID).as_deref()),
                when: coerce::parse_timestamp(text(history_event::WHEN).as_deref()),
                software_agent: coerce::parse_text(text(history_event::SOFTWARE_AGENT).as_deref()),
                changed: coerce::parse_text(text(history_event::CHANGED).as_deref()),
            }
        })
        .collect()
}

/// A `(uri, local)` pair some table reads from the descriptor.
#[derive(Hash, PartialEq, Eq)]
struct KnownPair((&'static str, &'static str));

// lets the set be searched with pairs borrowed from a document
impl<'a> core::borrow::Borrow<(&'a str, &'a str)> for KnownPair {
    fn borrow(&self) -> &(&'a str, &'a str) {
        &self.0
    }
}

static KNOWN_ATTRIBUTES: LazyLock<FxHashSet<KnownPair>> =
    LazyLock::new(|| fields::descriptor_keys().map(|key| KnownPair(key.pair())).collect());

/// Notes which descriptor attributes we don't read.
///
/// An attribute whose prefix is one of ours, but bound to some other URI, gets
/// a warning: it's usually an old or mistyped namespace, and none of its
/// values will be read.
fn log_unknown_attributes(description: &Element) {
    for (name, value) in &description.attributes {
        let Some(uri) = name.namespace.as_deref() else {
            continue;
        };
        let local = name.local_name.as_str();

        // `rdf:about` and friends aren't data
        if uri == Namespace::Rdf.uri() || KNOWN_ATTRIBUTES.contains(&(uri, local)) {
            continue;
        }

        let prefix = name.prefix.as_deref().unwrap_or(uri);
        match misbound_namespace(name) {
            Some(ns) => log::warn!(
                "Attribute `{prefix}:{local}` uses the `{prefix}` prefix for `{uri}`, not `{}`. \
                Skipping.",
                ns.uri()
            ),
            None => log::trace!("Unrecognised attribute `{prefix}:{local}` = `{value}`. Skipping."),
        }
    }
}

/// The known namespace `name`'s prefix usually stands for, if the document
/// bound that prefix to a different URI.
fn misbound_namespace(name: &AttributeName) -> Option<Namespace> {
    let ns = Namespace::from_prefix(name.prefix.as_deref()?)?;
    (name.namespace.as_deref() != Some(ns.uri())).then_some(ns)
}
