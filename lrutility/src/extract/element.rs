//! Helpers for walking RDF/XML with `xmltree`.

use std::borrow::Cow;

use lrutility_types::{
    fields::Collection,
    namespace::{Namespace, QualifiedKey},
};
use xmltree::Element;

const RDF: &str = Namespace::Rdf.uri();

pub trait ElementExt {
    /// Child elements, skipping text and comments.
    fn child_elements(&self) -> impl Iterator<Item = &Element>;

    /// Whether this element is `rdf:{local}`.
    fn is_rdf(&self, local: &str) -> bool;

    /// The first child element named by `key`.
    fn find_child(&self, key: &QualifiedKey) -> Option<&Element>;

    /// The RDF container under this element, if any.
    fn container(&self, collection: Collection) -> Option<&Element>;

    /// The `rdf:li` items of this container.
    fn items(&self) -> impl Iterator<Item = &Element>;

    /// Non-blank text of this element.
    fn text_value(&self) -> Option<Cow<'_, str>>;

    /// The value of a simple property written as an element.
    ///
    /// That's either the element's own text, or the default item of a
    /// language alternative (`rdf:Alt`).
    fn simple_value(&self) -> Option<Cow<'_, str>>;
}

impl ElementExt for Element {
    fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().flat_map(|c| c.as_element())
    }

    fn is_rdf(&self, local: &str) -> bool {
        self.name == local && self.namespace.as_deref() == Some(RDF)
    }

    fn find_child(&self, key: &QualifiedKey) -> Option<&Element> {
        self.child_elements()
            .find(|c| key.matches(c.namespace.as_deref(), &c.name))
    }

    fn container(&self, collection: Collection) -> Option<&Element> {
        let find = |local: &str| self.child_elements().find(|c| c.is_rdf(local));

        match collection {
            Collection::Ordered => find("Seq"),
            Collection::Unordered => find("Bag"),
            Collection::Either => find("Bag").or_else(|| find("Seq")),
        }
    }

    fn items(&self) -> impl Iterator<Item = &Element> {
        self.child_elements().filter(|c| c.is_rdf("li"))
    }

    fn text_value(&self) -> Option<Cow<'_, str>> {
        self.get_text().filter(|text| !text.trim().is_empty())
    }

    fn simple_value(&self) -> Option<Cow<'_, str>> {
        if let Some(text) = self.text_value() {
            return Some(text);
        }

        // language alternatives: take `x-default`, else the first entry
        let alt = self.child_elements().find(|c| c.is_rdf("Alt"))?;
        let is_default = |li: &&Element| {
            li.attributes
                .iter()
                .any(|(key, value)| key.local_name == "lang" && value == "x-default")
        };

        let chosen = alt
            .items()
            .find(is_default)
            .or_else(|| alt.items().next())
            .inspect(|_| log::trace!("Reading `{}` from its `rdf:Alt`.", self.name))?;

        chosen.text_value()
    }
}
