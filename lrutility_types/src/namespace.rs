//! The namespaces found in Lightroom / Camera Raw sidecars.
//!
//! XMP attributes are only unique once their namespace is known: `exif:Contrast`
//! and `crs:Contrast2012` live side by side, and so do `exif:Saturation` and
//! `crs:Saturation`. We look every attribute up by its `{uri}local` pair.

/// A known XMP namespace, named after its conventional prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    /// `x:`: the `x:xmpmeta` wrapper.
    X,
    /// `rdf:`: RDF/XML containers and `rdf:Description`.
    Rdf,
    /// `xmp:`: XMP Basic.
    Xmp,
    /// `xmpMM:`: XMP Media Management.
    XmpMm,
    /// `stEvt:`: resource events inside `xmpMM:History`.
    StEvt,
    /// `tiff:`
    Tiff,
    /// `exif:`
    Exif,
    /// `aux:`: Adobe's auxiliary EXIF (lens) properties.
    Aux,
    /// `exifEX:`: CIPA EXIF 2.3 additions.
    ExifEx,
    /// `photoshop:`
    Photoshop,
    /// `dc:`: Dublin Core.
    Dc,
    /// `crd:`: Camera Raw defaults.
    Crd,
    /// `xmpDM:`: XMP Dynamic Media.
    XmpDm,
    /// `crs:`: Camera Raw settings.
    Crs,
}

impl Namespace {
    /// Every namespace we know about.
    pub const ALL: [Namespace; 14] = [
        Namespace::X,
        Namespace::Rdf,
        Namespace::Xmp,
        Namespace::XmpMm,
        Namespace::StEvt,
        Namespace::Tiff,
        Namespace::Exif,
        Namespace::Aux,
        Namespace::ExifEx,
        Namespace::Photoshop,
        Namespace::Dc,
        Namespace::Crd,
        Namespace::XmpDm,
        Namespace::Crs,
    ];

    /// The conventional prefix, like `crs`.
    pub const fn prefix(self) -> &'static str {
        match self {
            Namespace::X => "x",
            Namespace::Rdf => "rdf",
            Namespace::Xmp => "xmp",
            Namespace::XmpMm => "xmpMM",
            Namespace::StEvt => "stEvt",
            Namespace::Tiff => "tiff",
            Namespace::Exif => "exif",
            Namespace::Aux => "aux",
            Namespace::ExifEx => "exifEX",
            Namespace::Photoshop => "photoshop",
            Namespace::Dc => "dc",
            Namespace::Crd => "crd",
            Namespace::XmpDm => "xmpDM",
            Namespace::Crs => "crs",
        }
    }

    /// The namespace URI.
    pub const fn uri(self) -> &'static str {
        match self {
            Namespace::X => "adobe:ns:meta/",
            Namespace::Rdf => "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
            Namespace::Xmp => "http://ns.adobe.com/xap/1.0/",
            Namespace::XmpMm => "http://ns.adobe.com/xap/1.0/mm/",
            Namespace::StEvt => "http://ns.adobe.com/xap/1.0/sType/ResourceEvent#",
            Namespace::Tiff => "http://ns.adobe.com/tiff/1.0/",
            Namespace::Exif => "http://ns.adobe.com/exif/1.0/",
            Namespace::Aux => "http://ns.adobe.com/exif/1.0/aux/",
            Namespace::ExifEx => "http://cipa.jp/exif/1.0/",
            Namespace::Photoshop => "http://ns.adobe.com/photoshop/1.0/",
            Namespace::Dc => "http://purl.org/dc/elements/1.1/",
            Namespace::Crd => "http://ns.adobe.com/camera-raw-defaults/1.0/",
            Namespace::XmpDm => "http://ns.adobe.com/xmp/1.0/DynamicMedia/",
            Namespace::Crs => "http://ns.adobe.com/camera-raw-settings/1.0/",
        }
    }

    /// Looks up a namespace from a prefix found in a document.
    ///
    /// Documents may bind any prefix they like, so prefer [`Self::from_uri`]
    /// when the URI is available.
    pub fn from_prefix(prefix: &str) -> Option<Namespace> {
        Self::ALL.into_iter().find(|ns| ns.prefix() == prefix)
    }

    /// Looks up a namespace from its URI.
    pub fn from_uri(uri: &str) -> Option<Namespace> {
        Self::ALL.into_iter().find(|ns| ns.uri() == uri)
    }
}

impl core::fmt::Display for Namespace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Returns the URI bound to a known prefix.
///
/// The set of namespaces is closed, so this can't fail.
pub const fn resolve(prefix: Namespace) -> &'static str {
    prefix.uri()
}

/// Builds the qualified key for `prefix:local`.
pub const fn qualify(prefix: Namespace, local: &'static str) -> QualifiedKey {
    QualifiedKey {
        namespace: prefix,
        local,
    }
}

/// A namespace + local name pair naming exactly one attribute.
///
/// Displays in Clark notation, `{uri}local`, which is also how the attribute
/// would be spelled by most XML tooling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedKey {
    pub namespace: Namespace,
    pub local: &'static str,
}

impl QualifiedKey {
    /// The namespace URI half of the key.
    pub const fn uri(&self) -> &'static str {
        self.namespace.uri()
    }

    /// Checks whether a name from a document is this key.
    pub fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        namespace == Some(self.uri()) && local == self.local
    }

    /// The key as `(uri, local)`, which is how the extractor indexes
    /// attributes.
    pub const fn pair(&self) -> (&'static str, &'static str) {
        (self.uri(), self.local)
    }
}

impl core::fmt::Display for QualifiedKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{{{}}}{}", self.uri(), self.local)
    }
}
