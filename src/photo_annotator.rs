use crate::map_artifact::{MapArtifact, MarkerIcon, Popup};
use crate::utils;
use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use exif::{Exif, In, Tag, Value};
use image::ImageFormat;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};

pub const DEFAULT_THUMBNAIL_SIZE: u32 = 80;
pub const POPUP_FRAME_SIZE: u32 = 200;
pub const POPUP_MAX_WIDTH: u32 = 400;
pub const PHOTO_MARKER_COLOR: &str = "blue";
pub const PHOTO_MARKER_GLYPH: &str = "\u{2601}"; // cloud

#[derive(Clone, Debug, PartialEq)]
pub struct PhotoOptions {
    pub extensions: Vec<String>,
    pub thumbnail_size: u32,
}

impl Default for PhotoOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["jpeg".to_string(), "jpg".to_string()],
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhotoMarker {
    pub latitude: f64,
    pub longitude: f64,
    /// PNG bytes
    pub thumbnail: Vec<u8>,
}

impl PhotoMarker {
    pub fn popup_html(&self) -> String {
        format!(
            r#"<img src="data:image/png;base64,{}">"#,
            BASE64.encode(&self.thumbnail)
        )
    }

    pub fn add_to(self, map: &mut MapArtifact) {
        let popup = Popup::Frame {
            html: self.popup_html(),
            width: POPUP_FRAME_SIZE,
            height: POPUP_FRAME_SIZE,
            max_width: POPUP_MAX_WIDTH,
        };
        let icon = MarkerIcon {
            color: PHOTO_MARKER_COLOR.to_string(),
            glyph: Some(PHOTO_MARKER_GLYPH.to_string()),
        };
        map.add_marker((self.latitude, self.longitude), icon, Some(popup));
    }
}

#[derive(Debug)]
pub struct SkippedPhoto {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct PhotoReport {
    pub placed: Vec<PathBuf>,
    pub skipped: Vec<SkippedPhoto>,
}

fn gps_coordinate(exif: &Exif, tag: Tag, ref_tag: Tag, negative_ref: u8) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let degrees: f64 = match &field.value {
        // degrees, minutes, seconds
        Value::Rational(parts) if !parts.is_empty() => parts
            .iter()
            .zip([1., 60., 3600.])
            .map(|(part, scale)| part.to_f64() / scale)
            .sum(),
        _ => return None,
    };
    if !degrees.is_finite() {
        return None;
    }
    let negative = match exif.get_field(ref_tag, In::PRIMARY).map(|f| &f.value) {
        Some(Value::Ascii(refs)) => refs
            .first()
            .and_then(|r| r.first())
            .is_some_and(|r| r.eq_ignore_ascii_case(&negative_ref)),
        _ => false,
    };
    Some(if negative { -degrees } else { degrees })
}

/// `(latitude, longitude)` from the photo's EXIF GPS tags, or `None` when the
/// photo carries no location.
pub fn read_photo_location(path: &Path) -> Result<Option<(f64, f64)>> {
    let mut reader = BufReader::new(File::open(path)?);
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let latitude = gps_coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S');
    let longitude = gps_coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W');
    Ok(latitude.zip(longitude))
}

/// PNG thumbnail whose longest side is at most `max_side`. Aspect ratio is
/// kept and small images are not enlarged.
pub fn make_thumbnail_png(path: &Path, max_side: u32) -> Result<Vec<u8>> {
    let image = image::open(path)?;
    let thumbnail = if image.width() > max_side || image.height() > max_side {
        image.thumbnail(max_side, max_side)
    } else {
        image
    };
    let mut png = Vec::new();
    thumbnail.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

pub fn load_photo_marker(path: &Path, thumbnail_size: u32) -> Result<Option<PhotoMarker>> {
    let Some((latitude, longitude)) = read_photo_location(path)? else {
        return Ok(None);
    };
    Ok(Some(PhotoMarker {
        latitude,
        longitude,
        thumbnail: make_thumbnail_png(path, thumbnail_size)?,
    }))
}

/// Places a marker for every geotagged photo in `dir`. Photos without a
/// location, or that cannot be decoded, are skipped and reported; only an
/// unreadable directory fails the call.
pub fn annotate_photos(
    map: &mut MapArtifact,
    dir: &Path,
    options: &PhotoOptions,
) -> Result<PhotoReport> {
    let files = utils::list_files_with_extensions(dir, &options.extensions)
        .map_err(|e| anyhow!("cannot list photo directory {}: {e}", dir.display()))?;

    let mut report = PhotoReport::default();
    for path in files {
        let reason = match load_photo_marker(&path, options.thumbnail_size) {
            Ok(Some(marker)) => {
                marker.add_to(map);
                report.placed.push(path);
                continue;
            }
            Ok(None) => "no GPS location in metadata".to_string(),
            Err(e) => e.to_string(),
        };
        warn!("skipping photo {}: {reason}", path.display());
        report.skipped.push(SkippedPhoto { path, reason });
    }
    info!(
        "{}: placed {} photos, skipped {}",
        dir.display(),
        report.placed.len(),
        report.skipped.len()
    );
    Ok(report)
}
