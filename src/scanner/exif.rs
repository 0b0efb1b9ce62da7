use chrono::NaiveDate;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIFから撮影日を取得（DateTimeOriginal → DateTime の順）
pub fn extract_date(path: &Path) -> Option<NaiveDate> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut bufreader).ok()?;

    [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .into_iter()
        .filter_map(|tag| exif.get_field(tag, exif::In::PRIMARY))
        .find_map(|field| match &field.value {
            exif::Value::Ascii(values) => values.first().and_then(|raw| parse_exif_date(raw)),
            _ => None,
        })
}

/// "2024:01:05 12:34:56" 形式
fn parse_exif_date(raw: &[u8]) -> Option<NaiveDate> {
    let dt = exif::DateTime::from_ascii(raw).ok()?;
    NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))
}
