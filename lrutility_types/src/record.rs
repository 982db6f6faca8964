//! The typed result of reading one sidecar.
//!
//! Every group is always present. Fields with a documented default (like
//! `orientation = 1`) hold that default when the sidecar omits them; fields
//! without one are `Option`s.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone as _};

/// Everything we read out of one sidecar.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataRecord {
    pub basic: BasicInfo,
    pub document: DocumentInfo,
    pub sensor: SensorInfo,
    pub exposure: ExposureInfo,

    /// Only present when the sidecar has an `exif:Flash` element.
    pub flash: Option<FlashInfo>,

    pub lens: LensInfo,
    pub editor: EditorInfo,
    pub develop: RawDevelopSettings,
    pub descriptive: DescriptiveInfo,
    pub media_pick: MediaPickInfo,
}

/// A point in time from an XMP date field.
///
/// XMP dates don't have to carry a zone. When they don't, `offset` is `None`
/// and `local` is the wall-clock time as written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub local: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl Timestamp {
    /// The timestamp as a zoned date-time, if it had a zone.
    pub fn zoned(&self) -> Option<DateTime<FixedOffset>> {
        self.offset?.from_local_datetime(&self.local).single()
    }
}

/// `xmp:` basics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasicInfo {
    pub creator_tool: Option<String>,
    pub modify_date: Option<Timestamp>,
    pub create_date: Option<Timestamp>,
    pub metadata_date: Option<Timestamp>,

    /// Star rating, usually 1 through 5.
    ///
    /// `None` means unrated. A sidecar can still record a rating of `0`, which
    /// is `Some(0)`.
    pub rating: Option<i64>,

    pub label: Option<String>,
}

/// `xmpMM:` document management.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentInfo {
    pub document_id: Option<String>,
    pub instance_id: Option<String>,
    pub preserved_file_name: Option<String>,
    pub original_document_id: Option<String>,

    /// Edit history, oldest first.
    pub history: Vec<HistoryEvent>,
}

/// One `stEvt:` entry of `xmpMM:History`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryEvent {
    pub action: Option<String>,
    pub instance_id: Option<String>,
    pub when: Option<Timestamp>,
    pub software_agent: Option<String>,
    pub changed: Option<String>,
}

/// `tiff:` sensor and format details.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorInfo {
    pub make: Option<String>,
    pub model: Option<String>,

    /// EXIF orientation code, 1 through 8.
    pub orientation: i64,

    pub image_width: i64,
    pub image_length: i64,
    pub x_resolution: Option<f64>,
    pub y_resolution: Option<f64>,
    pub resolution_unit: Option<i64>,
}

impl Default for SensorInfo {
    fn default() -> Self {
        Self {
            make: None,
            model: None,
            orientation: 1,
            image_width: 0,
            image_length: 0,
            x_resolution: None,
            y_resolution: None,
            resolution_unit: None,
        }
    }
}

/// `exif:` capture settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExposureInfo {
    // exposure
    /// Kept as written, e.g. `1/250`.
    pub exposure_time: Option<String>,
    pub shutter_speed_value: Option<f64>,
    pub f_number: Option<f64>,
    pub aperture_value: Option<f64>,
    pub exposure_program: i64,
    pub exposure_mode: i64,
    pub exposure_bias_value: Option<f64>,

    // sensitivity
    pub iso_speed_ratings: Option<Vec<i64>>,
    pub sensitivity_type: i64,
    pub recommended_exposure_index: i64,

    // metering and white balance
    pub metering_mode: i64,
    pub light_source: i64,
    pub white_balance: i64,
    pub brightness_value: Option<f64>,

    // focal length
    pub focal_length: Option<f64>,
    pub focal_length_in_35mm_film: i64,
    pub max_aperture_value: Option<f64>,
    pub digital_zoom_ratio: Option<f64>,

    // image
    pub pixel_x_dimension: i64,
    pub pixel_y_dimension: i64,
    pub focal_plane_x_resolution: Option<f64>,
    pub focal_plane_y_resolution: Option<f64>,
    pub focal_plane_resolution_unit: i64,

    // rendering
    pub custom_rendered: i64,
    pub scene_capture_type: i64,
    pub contrast: i64,
    pub saturation: i64,
    pub sharpness: i64,

    // source
    pub file_source: i64,
    pub scene_type: i64,
    pub exif_version: Option<String>,

    pub date_time_original: Option<Timestamp>,
    pub date_time_digitized: Option<Timestamp>,
}

/// The `exif:Flash` struct.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlashInfo {
    pub fired: bool,
    pub return_mode: i64,
    pub mode: i64,
    pub function: bool,
    pub red_eye_mode: bool,
}

/// Lens descriptors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LensInfo {
    /// Focal and aperture ranges, e.g. `700/10 2000/10 28/10 28/10`.
    pub lens_info: Option<String>,
    pub lens: Option<String>,
    pub lens_model: Option<String>,
    pub lens_distort_info: Option<String>,
    pub lens_serial_number: Option<String>,
}

/// `photoshop:` editor details.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorInfo {
    pub date_created: Option<Timestamp>,

    /// Extension of the file this sidecar belongs to, e.g. `ARW`.
    pub sidecar_for_extension: Option<String>,

    pub embedded_xmp_digest: Option<String>,
    pub color_mode: Option<i64>,
    pub icc_profile: Option<String>,
}

/// Camera Raw develop settings.
#[derive(Clone, Debug, PartialEq)]
pub struct RawDevelopSettings {
    // crop, as fractions of the full frame
    pub crop_top: f64,
    pub crop_left: f64,
    pub crop_bottom: f64,
    pub crop_right: f64,
    pub crop_angle: f64,
    pub crop_constrain_to_warp: i64,
    pub crop_constrain_to_unit_square: i64,
    pub has_crop: bool,

    pub already_applied: bool,

    /// Name of the raw file this sidecar describes.
    ///
    /// It lives next to the sidecar, so this is how callers find it.
    pub raw_file_name: Option<String>,

    pub version: Option<String>,
    pub process_version: Option<String>,
    pub camera_profile: Option<String>,
    pub look_name: Option<String>,

    // adjustments
    pub exposure: Option<f64>,
    pub contrast: Option<i64>,
    pub highlights: Option<i64>,
    pub shadows: Option<i64>,
    pub whites: Option<i64>,
    pub blacks: Option<i64>,
    pub clarity: Option<i64>,
    pub vibrance: Option<i64>,
    pub saturation: Option<i64>,
}

impl Default for RawDevelopSettings {
    fn default() -> Self {
        Self {
            crop_top: 0.0,
            crop_left: 0.0,
            crop_bottom: 1.0,
            crop_right: 1.0,
            crop_angle: 0.0,
            crop_constrain_to_warp: 0,
            crop_constrain_to_unit_square: 1,
            has_crop: false,
            already_applied: false,
            raw_file_name: None,
            version: None,
            process_version: None,
            camera_profile: None,
            look_name: None,
            exposure: None,
            contrast: None,
            highlights: None,
            shadows: None,
            whites: None,
            blacks: None,
            clarity: None,
            vibrance: None,
            saturation: None,
        }
    }
}

/// `dc:` Dublin Core.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescriptiveInfo {
    /// MIME type, e.g. `image/x-sony-arw`.
    pub format: Option<String>,
    pub title: Option<String>,
    pub creator: Option<Vec<String>>,

    /// Keywords.
    pub subject: Option<Vec<String>>,

    pub description: Option<String>,
    pub rights: Option<String>,
}

/// `xmpDM:` pick state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaPickInfo {
    /// `0` is unset. By convention `1` is picked and `-1` is rejected.
    pub pick: i64,
    pub good: Option<bool>,
    pub scene: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate};

    use super::{MetadataRecord, Timestamp};

    #[test]
    fn defaults_are_full_frame_and_upright() {
        let record = MetadataRecord::default();

        assert_eq!(record.sensor.orientation, 1);
        assert_eq!(
            (
                record.develop.crop_top,
                record.develop.crop_left,
                record.develop.crop_bottom,
                record.develop.crop_right
            ),
            (0.0, 0.0, 1.0, 1.0)
        );
        assert_eq!(record.develop.crop_constrain_to_unit_square, 1);
        assert_eq!(record.basic.rating, None);
        assert!(record.flash.is_none());
    }

    #[test]
    fn zoned_timestamp_keeps_wall_clock() {
        let local = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid date");

        let ts = Timestamp {
            local,
            offset: FixedOffset::east_opt(9 * 3600),
        };
        let zoned = ts.zoned().expect("has an offset");
        assert_eq!(zoned.naive_local(), local);
        assert_eq!(zoned.naive_utc().to_string(), "2024-01-01 03:00:00");

        let naive = Timestamp {
            local,
            offset: None,
        };
        assert_eq!(naive.zoned(), None);
    }
}
