#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use trailmap_core::geo_sample::{GeoSample, Position, TimeWindow};

pub struct TrackPoint<'a> {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
    pub time: Option<&'a str>,
}

pub fn point<'a>(lat: f64, lon: f64, ele: f64, time: &'a str) -> TrackPoint<'a> {
    TrackPoint {
        lat,
        lon,
        ele: Some(ele),
        time: Some(time),
    }
}

pub fn gpx_document(segments: &[&[TrackPoint]]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="trailmap tests" xmlns="http://www.topografix.com/GPX/1/1">
<trk><name>test</name>
"#,
    );
    for segment in segments {
        xml.push_str("<trkseg>\n");
        for p in segment.iter() {
            xml.push_str(&format!(r#"<trkpt lat="{}" lon="{}">"#, p.lat, p.lon));
            if let Some(ele) = p.ele {
                xml.push_str(&format!("<ele>{ele}</ele>"));
            }
            if let Some(time) = p.time {
                xml.push_str(&format!("<time>{time}</time>"));
            }
            xml.push_str("</trkpt>\n");
        }
        xml.push_str("</trkseg>\n");
    }
    xml.push_str("</trk>\n</gpx>\n");
    xml
}

pub fn write_gpx(dir: &Path, name: &str, segments: &[&[TrackPoint]]) {
    fs::write(dir.join(name), gpx_document(segments)).unwrap();
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

pub fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeWindow {
    TimeWindow::new(start, end).unwrap()
}

pub fn sample(lat: f64, lon: f64, elevation: f64, timestamp: DateTime<Utc>) -> GeoSample {
    GeoSample {
        latitude: lat,
        longitude: lon,
        elevation,
        timestamp,
    }
}

pub fn positions(elevations: &[f64]) -> Vec<Position> {
    elevations
        .iter()
        .enumerate()
        .map(|(i, elevation)| Position {
            latitude: 46.0 + i as f64 * 0.001,
            longitude: -121.0 - i as f64 * 0.001,
            elevation: *elevation,
        })
        .collect()
}

fn dms(value: f64) -> Vec<Rational> {
    let value = value.abs();
    let degrees = value.trunc();
    let minutes = ((value - degrees) * 60.).trunc();
    let seconds = (value - degrees - minutes / 60.) * 3600.;
    vec![
        Rational {
            num: degrees as u32,
            denom: 1,
        },
        Rational {
            num: minutes as u32,
            denom: 1,
        },
        Rational {
            num: (seconds * 1000.).round() as u32,
            denom: 1000,
        },
    ]
}

fn gps_tiff(lat: f64, lon: f64) -> Vec<u8> {
    let fields = [
        Field {
            tag: Tag::GPSLatitudeRef,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![if lat < 0. { b"S" } else { b"N" }.to_vec()]),
        },
        Field {
            tag: Tag::GPSLatitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(dms(lat)),
        },
        Field {
            tag: Tag::GPSLongitudeRef,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![if lon < 0. { b"W" } else { b"E" }.to_vec()]),
        },
        Field {
            tag: Tag::GPSLongitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(dms(lon)),
        },
    ];
    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    tiff.into_inner()
}

/// A solid-color JPEG, geotagged through an EXIF APP1 segment when
/// `location` is given.
pub fn write_jpeg(path: &Path, width: u32, height: u32, location: Option<(f64, f64)>) {
    let image = RgbImage::from_pixel(width, height, Rgb([90, 140, 60]));
    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .unwrap();

    if let Some((lat, lon)) = location {
        let tiff = gps_tiff(lat, lon);
        let length = (2 + 6 + tiff.len()) as u16;
        let mut app1 = vec![0xFF, 0xE1];
        app1.extend_from_slice(&length.to_be_bytes());
        app1.extend_from_slice(b"Exif\0\0");
        app1.extend_from_slice(&tiff);
        // right after SOI
        jpeg.splice(2..2, app1);
    }
    fs::write(path, jpeg).unwrap();
}
