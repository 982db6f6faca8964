use std::borrow::Cow;

use lrutility_types::namespace::QualifiedKey;
use rustc_hash::FxHashMap;
use xmltree::Element;

use crate::extract::element::ElementExt as _;

/// The properties of one element, looked up by qualified key.
///
/// XMP lets a simple property be written either as an attribute
/// (`xmp:Rating="1"`) or as a child element (`<xmp:Rating>1</xmp:Rating>`).
/// Attributes are indexed up front, since that's where Lightroom puts nearly
/// everything; child elements are searched only when there's no attribute.
pub struct Properties<'e> {
    element: &'e Element,
    attributes: FxHashMap<(&'e str, &'e str), &'e str>,
}

impl<'e> Properties<'e> {
    pub fn new(element: &'e Element) -> Self {
        let attributes = element
            .attributes
            .iter()
            .filter_map(|(key, value)| {
                let Some(ns) = key.namespace.as_deref() else {
                    log::trace!(
                        "Attribute `{}` on `{}` has no namespace. Skipping.",
                        key.local_name,
                        element.name
                    );
                    return None;
                };

                Some(((ns, key.local_name.as_str()), value.as_str()))
            })
            .collect();

        Self {
            element,
            attributes,
        }
    }

    /// The raw value for `key`, if the element has one.
    pub fn get(&self, key: &QualifiedKey) -> Option<Cow<'e, str>> {
        if let Some(value) = self.attributes.get(&key.pair()) {
            return Some(Cow::Borrowed(*value));
        }

        self.element.find_child(key)?.simple_value()
    }

    pub fn element(&self) -> &'e Element {
        self.element
    }
}

#[cfg(test)]
mod tests {
    use lrutility_types::namespace::{Namespace, qualify};
    use xmltree::Element;

    use super::Properties;

    #[test]
    fn attributes_win_over_child_elements() {
        crate::util::logger();

        let element = Element::parse(
            r#"<rdf:Description xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                xmlns:xmp="http://ns.adobe.com/xap/1.0/"
                xmp:Rating="3">
                <xmp:Rating>5</xmp:Rating>
                <xmp:Label>Red</xmp:Label>
            </rdf:Description>"#
                .as_bytes(),
        )
        .expect("test XML is well-formed");

        let props = Properties::new(&element);
        assert_eq!(
            props.get(&qualify(Namespace::Xmp, "Rating")).as_deref(),
            Some("3")
        );
        assert_eq!(
            props.get(&qualify(Namespace::Xmp, "Label")).as_deref(),
            Some("Red")
        );
        assert_eq!(props.get(&qualify(Namespace::Xmp, "CreatorTool")), None);
    }

    #[test]
    fn same_local_name_in_two_namespaces() {
        crate::util::logger();

        let element = Element::parse(
            r#"<rdf:Description xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                xmlns:exif="http://ns.adobe.com/exif/1.0/"
                xmlns:crs="http://ns.adobe.com/camera-raw-settings/1.0/"
                exif:Saturation="0"
                crs:Saturation="+12"/>"#
                .as_bytes(),
        )
        .expect("test XML is well-formed");

        let props = Properties::new(&element);
        assert_eq!(
            props.get(&qualify(Namespace::Exif, "Saturation")).as_deref(),
            Some("0")
        );
        assert_eq!(
            props.get(&qualify(Namespace::Crs, "Saturation")).as_deref(),
            Some("+12")
        );
    }
}
