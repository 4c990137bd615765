use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};

/// Rewrites every `<time>` element of a GPX document into an RFC 3339 UTC
/// instant. Returns the input unchanged when every timestamp is already in
/// that form.
pub fn normalize_gpx_time(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    let mut modified = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"time" => {
                let raw = reader.read_text(e.name())?;
                let text = match normalize_time(&raw) {
                    Some(normalized) => {
                        modified = true;
                        normalized
                    }
                    None => raw.into_owned(),
                };
                writer.write_event(Event::Start(e.clone()))?;
                writer.write_event(Event::Text(BytesText::new(&text)))?;
                writer.write_event(Event::End(e.to_end().into_owned()))?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => writer.write_event(event)?,
            Err(e) => bail!("XML parse error while normalizing GPX time: {e:?}"),
        }
        buf.clear();
    }

    if modified {
        Ok(String::from_utf8(writer.into_inner())?)
    } else {
        Ok(xml.to_owned())
    }
}

/// Returns the RFC 3339 UTC form of `input`, or `None` if `input` is already
/// in that form or cannot be understood. Timestamps without an offset are
/// taken to be UTC.
pub fn normalize_time(input: &str) -> Option<String> {
    let input = input.trim();
    let utc = parse_time(input)?;
    let normalized = utc.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    if normalized == input {
        None
    } else {
        Some(normalized)
    }
}

fn parse_time(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    // "2022/08/02 10:00:00 +02:00" -> "2022-08-02 10:00:00+02:00"
    let mut s = input.to_string();
    if s.len() >= 10 && s.is_char_boundary(10) {
        let date = s[..10].replace('/', "-");
        s.replace_range(0..10, &date);
    }
    for sign in [" +", " -"] {
        if let Some(idx) = s.rfind(sign) {
            if idx >= 19 {
                s.remove(idx);
            }
        }
    }

    const WITH_OFFSET: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M:%S%z",
    ];
    const NAIVE: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
    ];

    WITH_OFFSET
        .iter()
        .filter_map(|fmt| DateTime::parse_from_str(&s, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .chain(
            NAIVE
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
                .map(|dt| dt.and_utc()),
        )
        .find(|dt| dt.year() >= 0)
}
