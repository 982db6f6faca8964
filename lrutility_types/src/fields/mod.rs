//! How to read each group of the record.
//!
//! Each table lists the attributes of one group as `(qualified key, slot)`
//! rows. The extractor walks a table once per group, so adding an attribute is
//! one field on the record plus one row here.

use crate::{
    namespace::{Namespace as N, QualifiedKey, qualify},
    record::{
        BasicInfo, DescriptiveInfo, DocumentInfo, EditorInfo, ExposureInfo, FlashInfo, LensInfo,
        MediaPickInfo, RawDevelopSettings, SensorInfo,
    },
};

pub mod types;

pub use types::{Collection, Field, Group, ListField, ListSlot, Slot};

/// Shorthand for a table row.
const fn f<G: 'static>(ns: N, local: &'static str, slot: Slot<G>) -> Field<G> {
    Field {
        key: qualify(ns, local),
        slot,
    }
}

/// `xmp:` basics.
pub static BASIC: &[Field<BasicInfo>] = {
    type S = Slot<BasicInfo>;
    &[
        f(N::Xmp, "CreatorTool", S::Text(|g| &mut g.creator_tool)),
        f(N::Xmp, "ModifyDate", S::Timestamp(|g| &mut g.modify_date)),
        f(N::Xmp, "CreateDate", S::Timestamp(|g| &mut g.create_date)),
        f(N::Xmp, "MetadataDate", S::Timestamp(|g| &mut g.metadata_date)),
        f(N::Xmp, "Rating", S::OptInt(|g| &mut g.rating)),
        f(N::Xmp, "Label", S::Text(|g| &mut g.label)),
    ]
};

/// `xmpMM:` document management.
///
/// `xmpMM:History` is a sequence of structs, so it's read separately.
pub static DOCUMENT: &[Field<DocumentInfo>] = {
    type S = Slot<DocumentInfo>;
    &[
        f(N::XmpMm, "DocumentID", S::Text(|g| &mut g.document_id)),
        f(N::XmpMm, "InstanceID", S::Text(|g| &mut g.instance_id)),
        f(N::XmpMm, "PreservedFileName", S::Text(|g| &mut g.preserved_file_name)),
        f(N::XmpMm, "OriginalDocumentID", S::Text(|g| &mut g.original_document_id)),
    ]
};

/// The container of the edit history.
pub const HISTORY: QualifiedKey = qualify(N::XmpMm, "History");

/// The `stEvt:` fields of one history entry.
pub mod history_event {
    use crate::namespace::{Namespace as N, QualifiedKey, qualify};

    pub const ACTION: QualifiedKey = qualify(N::StEvt, "action");
    pub const INSTANCE_ID: QualifiedKey = qualify(N::StEvt, "instanceID");
    pub const WHEN: QualifiedKey = qualify(N::StEvt, "when");
    pub const SOFTWARE_AGENT: QualifiedKey = qualify(N::StEvt, "softwareAgent");
    pub const CHANGED: QualifiedKey = qualify(N::StEvt, "changed");
}

/// `tiff:` sensor and format details.
pub static SENSOR: &[Field<SensorInfo>] = {
    type S = Slot<SensorInfo>;
    &[
        f(N::Tiff, "Make", S::Text(|g| &mut g.make)),
        f(N::Tiff, "Model", S::Text(|g| &mut g.model)),
        f(
            N::Tiff,
            "Orientation",
            S::Int {
                default: 1,
                field: |g| &mut g.orientation,
            },
        ),
        f(
            N::Tiff,
            "ImageWidth",
            S::Int {
                default: 0,
                field: |g| &mut g.image_width,
            },
        ),
        f(
            N::Tiff,
            "ImageLength",
            S::Int {
                default: 0,
                field: |g| &mut g.image_length,
            },
        ),
        f(N::Tiff, "XResolution", S::Rational(|g| &mut g.x_resolution)),
        f(N::Tiff, "YResolution", S::Rational(|g| &mut g.y_resolution)),
        f(N::Tiff, "ResolutionUnit", S::OptInt(|g| &mut g.resolution_unit)),
    ]
};

/// `exif:` capture settings.
pub static EXPOSURE: &[Field<ExposureInfo>] = {
    type S = Slot<ExposureInfo>;

    // most EXIF codes default to zero when they're missing
    const fn code(
        local: &'static str,
        field: fn(&mut ExposureInfo) -> &mut i64,
    ) -> Field<ExposureInfo> {
        f(N::Exif, local, S::Int { default: 0, field })
    }

    &[
        f(N::Exif, "ExposureTime", S::Text(|g| &mut g.exposure_time)),
        f(N::Exif, "ShutterSpeedValue", S::Rational(|g| &mut g.shutter_speed_value)),
        f(N::Exif, "FNumber", S::Rational(|g| &mut g.f_number)),
        f(N::Exif, "ApertureValue", S::Rational(|g| &mut g.aperture_value)),
        code("ExposureProgram", |g| &mut g.exposure_program),
        code("ExposureMode", |g| &mut g.exposure_mode),
        f(N::Exif, "ExposureBiasValue", S::Rational(|g| &mut g.exposure_bias_value)),
        code("RecommendedExposureIndex", |g| &mut g.recommended_exposure_index),
        code("SensitivityType", |g| &mut g.sensitivity_type),
        code("MeteringMode", |g| &mut g.metering_mode),
        code("LightSource", |g| &mut g.light_source),
        code("WhiteBalance", |g| &mut g.white_balance),
        f(N::Exif, "BrightnessValue", S::Rational(|g| &mut g.brightness_value)),
        f(N::Exif, "FocalLength", S::Rational(|g| &mut g.focal_length)),
        code("FocalLengthIn35mmFilm", |g| &mut g.focal_length_in_35mm_film),
        f(N::Exif, "MaxApertureValue", S::Rational(|g| &mut g.max_aperture_value)),
        f(N::Exif, "DigitalZoomRatio", S::Rational(|g| &mut g.digital_zoom_ratio)),
        code("PixelXDimension", |g| &mut g.pixel_x_dimension),
        code("PixelYDimension", |g| &mut g.pixel_y_dimension),
        f(
            N::Exif,
            "FocalPlaneXResolution",
            S::Rational(|g| &mut g.focal_plane_x_resolution),
        ),
        f(
            N::Exif,
            "FocalPlaneYResolution",
            S::Rational(|g| &mut g.focal_plane_y_resolution),
        ),
        code("FocalPlaneResolutionUnit", |g| &mut g.focal_plane_resolution_unit),
        code("CustomRendered", |g| &mut g.custom_rendered),
        code("SceneCaptureType", |g| &mut g.scene_capture_type),
        code("Contrast", |g| &mut g.contrast),
        code("Saturation", |g| &mut g.saturation),
        code("Sharpness", |g| &mut g.sharpness),
        code("FileSource", |g| &mut g.file_source),
        code("SceneType", |g| &mut g.scene_type),
        f(N::Exif, "ExifVersion", S::Text(|g| &mut g.exif_version)),
        f(N::Exif, "DateTimeOriginal", S::Timestamp(|g| &mut g.date_time_original)),
        f(N::Exif, "DateTimeDigitized", S::Timestamp(|g| &mut g.date_time_digitized)),
    ]
};

/// `exif:` lists.
pub static EXPOSURE_LISTS: &[ListField<ExposureInfo>] = &[ListField {
    container: qualify(N::Exif, "ISOSpeedRatings"),
    collection: Collection::Ordered,
    slot: ListSlot::<ExposureInfo>::Ints(|g| &mut g.iso_speed_ratings),
}];

/// The element that, when present, holds the flash fields.
pub const FLASH: QualifiedKey = qualify(N::Exif, "Flash");

/// Fields of `exif:Flash`.
pub static FLASH_FIELDS: &[Field<FlashInfo>] = {
    type S = Slot<FlashInfo>;
    &[
        f(
            N::Exif,
            "Fired",
            S::Bool {
                default: false,
                field: |g| &mut g.fired,
            },
        ),
        f(
            N::Exif,
            "Return",
            S::Int {
                default: 0,
                field: |g| &mut g.return_mode,
            },
        ),
        f(
            N::Exif,
            "Mode",
            S::Int {
                default: 0,
                field: |g| &mut g.mode,
            },
        ),
        f(
            N::Exif,
            "Function",
            S::Bool {
                default: false,
                field: |g| &mut g.function,
            },
        ),
        f(
            N::Exif,
            "RedEyeMode",
            S::Bool {
                default: false,
                field: |g| &mut g.red_eye_mode,
            },
        ),
    ]
};

/// Lens descriptors, spread over `aux:` and `exifEX:`.
pub static LENS: &[Field<LensInfo>] = {
    type S = Slot<LensInfo>;
    &[
        f(N::Aux, "LensInfo", S::Text(|g| &mut g.lens_info)),
        f(N::Aux, "Lens", S::Text(|g| &mut g.lens)),
        f(N::ExifEx, "LensModel", S::Text(|g| &mut g.lens_model)),
        f(N::Aux, "LensDistortInfo", S::Text(|g| &mut g.lens_distort_info)),
        f(N::Aux, "LensSerialNumber", S::Text(|g| &mut g.lens_serial_number)),
    ]
};

/// `photoshop:` editor details.
pub static EDITOR: &[Field<EditorInfo>] = {
    type S = Slot<EditorInfo>;
    &[
        f(N::Photoshop, "DateCreated", S::Timestamp(|g| &mut g.date_created)),
        f(
            N::Photoshop,
            "SidecarForExtension",
            S::Text(|g| &mut g.sidecar_for_extension),
        ),
        f(N::Photoshop, "EmbeddedXMPDigest", S::Text(|g| &mut g.embedded_xmp_digest)),
        f(N::Photoshop, "ColorMode", S::OptInt(|g| &mut g.color_mode)),
        f(N::Photoshop, "ICCProfile", S::Text(|g| &mut g.icc_profile)),
    ]
};

/// Camera Raw develop settings.
pub static DEVELOP: &[Field<RawDevelopSettings>] = {
    type S = Slot<RawDevelopSettings>;

    const fn crop(
        local: &'static str,
        default: f64,
        field: fn(&mut RawDevelopSettings) -> &mut f64,
    ) -> Field<RawDevelopSettings> {
        f(N::Crs, local, S::Float { default, field })
    }

    &[
        crop("CropTop", 0.0, |g| &mut g.crop_top),
        crop("CropLeft", 0.0, |g| &mut g.crop_left),
        crop("CropBottom", 1.0, |g| &mut g.crop_bottom),
        crop("CropRight", 1.0, |g| &mut g.crop_right),
        crop("CropAngle", 0.0, |g| &mut g.crop_angle),
        f(
            N::Crs,
            "CropConstrainToWarp",
            S::Int {
                default: 0,
                field: |g| &mut g.crop_constrain_to_warp,
            },
        ),
        f(
            N::Crs,
            "CropConstrainToUnitSquare",
            S::Int {
                default: 1,
                field: |g| &mut g.crop_constrain_to_unit_square,
            },
        ),
        f(
            N::Crs,
            "HasCrop",
            S::Bool {
                default: false,
                field: |g| &mut g.has_crop,
            },
        ),
        f(
            N::Crs,
            "AlreadyApplied",
            S::Bool {
                default: false,
                field: |g| &mut g.already_applied,
            },
        ),
        f(N::Crs, "RawFileName", S::Text(|g| &mut g.raw_file_name)),
        f(N::Crs, "Version", S::Text(|g| &mut g.version)),
        f(N::Crs, "ProcessVersion", S::Text(|g| &mut g.process_version)),
        f(N::Crd, "CameraProfile", S::Text(|g| &mut g.camera_profile)),
        f(N::Crd, "LookName", S::Text(|g| &mut g.look_name)),
        f(N::Crs, "Exposure2012", S::Rational(|g| &mut g.exposure)),
        f(N::Crs, "Contrast2012", S::OptInt(|g| &mut g.contrast)),
        f(N::Crs, "Highlights2012", S::OptInt(|g| &mut g.highlights)),
        f(N::Crs, "Shadows2012", S::OptInt(|g| &mut g.shadows)),
        f(N::Crs, "Whites2012", S::OptInt(|g| &mut g.whites)),
        f(N::Crs, "Blacks2012", S::OptInt(|g| &mut g.blacks)),
        f(N::Crs, "Clarity2012", S::OptInt(|g| &mut g.clarity)),
        f(N::Crs, "Vibrance", S::OptInt(|g| &mut g.vibrance)),
        f(N::Crs, "Saturation", S::OptInt(|g| &mut g.saturation)),
    ]
};

/// `dc:` Dublin Core.
///
/// `title`, `description` and `rights` are usually language alternatives. The
/// extractor picks the default language when they aren't plain attributes.
pub static DESCRIPTIVE: &[Field<DescriptiveInfo>] = {
    type S = Slot<DescriptiveInfo>;
    &[
        f(N::Dc, "format", S::Text(|g| &mut g.format)),
        f(N::Dc, "title", S::Text(|g| &mut g.title)),
        f(N::Dc, "description", S::Text(|g| &mut g.description)),
        f(N::Dc, "rights", S::Text(|g| &mut g.rights)),
    ]
};

/// `dc:` lists.
pub static DESCRIPTIVE_LISTS: &[ListField<DescriptiveInfo>] = &[
    ListField {
        container: qualify(N::Dc, "creator"),
        collection: Collection::Either,
        slot: ListSlot::<DescriptiveInfo>::Texts(|g| &mut g.creator),
    },
    ListField {
        container: qualify(N::Dc, "subject"),
        collection: Collection::Unordered,
        slot: ListSlot::<DescriptiveInfo>::Texts(|g| &mut g.subject),
    },
];

/// `xmpDM:` pick state.
pub static MEDIA_PICK: &[Field<MediaPickInfo>] = {
    type S = Slot<MediaPickInfo>;
    &[
        f(
            N::XmpDm,
            "pick",
            S::Int {
                default: 0,
                field: |g| &mut g.pick,
            },
        ),
        f(N::XmpDm, "good", S::OptBool(|g| &mut g.good)),
        f(N::XmpDm, "scene", S::Text(|g| &mut g.scene)),
    ]
};

macro_rules! group {
    ($ty:ty, $name:literal, $fields:expr) => {
        impl Group for $ty {
            const NAME: &'static str = $name;

            fn fields() -> &'static [Field<Self>] {
                $fields
            }
        }
    };
    ($ty:ty, $name:literal, $fields:expr, $lists:expr) => {
        impl Group for $ty {
            const NAME: &'static str = $name;

            fn fields() -> &'static [Field<Self>] {
                $fields
            }

            fn lists() -> &'static [ListField<Self>] {
                $lists
            }
        }
    };
}

group!(BasicInfo, "basic", BASIC);
group!(DocumentInfo, "document", DOCUMENT);
group!(SensorInfo, "sensor", SENSOR);
group!(ExposureInfo, "exposure", EXPOSURE, EXPOSURE_LISTS);
group!(FlashInfo, "flash", FLASH_FIELDS);
group!(LensInfo, "lens", LENS);
group!(EditorInfo, "editor", EDITOR);
group!(RawDevelopSettings, "develop", DEVELOP);
group!(DescriptiveInfo, "descriptive", DESCRIPTIVE, DESCRIPTIVE_LISTS);
group!(MediaPickInfo, "media pick", MEDIA_PICK);

/// Every qualified key any table reads from the descriptor itself.
///
/// Flash fields are excluded, as they're read from `exif:Flash`.
pub fn descriptor_keys() -> impl Iterator<Item = QualifiedKey> {
    fn keys<G: Group>() -> impl Iterator<Item = QualifiedKey> {
        G::fields()
            .iter()
            .map(|field| field.key)
            .chain(G::lists().iter().map(|list| list.container))
    }

    keys::<BasicInfo>()
        .chain(keys::<DocumentInfo>())
        .chain(core::iter::once(HISTORY))
        .chain(keys::<SensorInfo>())
        .chain(keys::<ExposureInfo>())
        .chain(core::iter::once(FLASH))
        .chain(keys::<LensInfo>())
        .chain(keys::<EditorInfo>())
        .chain(keys::<RawDevelopSettings>())
        .chain(keys::<DescriptiveInfo>())
        .chain(keys::<MediaPickInfo>())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::namespace::Namespace;

    use super::{Group, Slot, descriptor_keys};
    use crate::record::{FlashInfo, RawDevelopSettings, SensorInfo};

    /// Writing each slot's default into a fresh group should give back the
    /// group's `Default`.
    fn defaults_agree<G: Group + PartialEq + core::fmt::Debug>() {
        let mut group = G::default();
        for field in G::fields() {
            match &field.slot {
                Slot::Int { default, field } => *field(&mut group) = *default,
                Slot::Float { default, field } => *field(&mut group) = *default,
                Slot::Bool { default, field } => *field(&mut group) = *default,
                _ => (),
            }
        }
        assert_eq!(group, G::default(), "table defaults for `{}`", G::NAME);
    }

    #[test]
    fn table_defaults_match_record_defaults() {
        defaults_agree::<SensorInfo>();
        defaults_agree::<RawDevelopSettings>();
        defaults_agree::<FlashInfo>();
    }

    #[test]
    fn keys_are_unique() {
        let all: Vec<_> = descriptor_keys().collect();
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn rdf_and_wrapper_namespaces_are_never_read_as_fields() {
        assert!(
            descriptor_keys()
                .all(|key| !matches!(key.namespace, Namespace::Rdf | Namespace::X))
        );
    }

    #[test]
    fn crs_and_exif_saturation_are_distinct() {
        let saturations: Vec<_> = descriptor_keys()
            .filter(|key| key.local == "Saturation")
            .map(|key| key.namespace)
            .collect();
        assert_eq!(saturations, vec![Namespace::Exif, Namespace::Crs]);
    }
}
