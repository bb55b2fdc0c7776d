//! Embedded images: data URIs, media files and pixel sizes

use crate::error::{Error, Result};
use crate::opc::{well_known, PartUri, IMAGE_TYPES};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Decoded `data:` URI
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub data: Vec<u8>,
}

impl DataUri {
    /// Parse a base64 image data URI
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| Error::UnsupportedEmbed("not a data URI".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::UnsupportedEmbed("data URI without payload".into()))?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or("").trim().to_ascii_lowercase();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(Error::UnsupportedEmbed("data URI is not base64".into()));
        }
        if extension_for(&mime).is_none() {
            return Err(Error::UnsupportedEmbed(format!("unsupported image type '{}'", mime)));
        }

        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let data = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| Error::UnsupportedEmbed(e.to_string()))?;
        if data.is_empty() {
            return Err(Error::UnsupportedEmbed("empty image".into()));
        }

        Ok(Self { mime, data })
    }

    /// Encode image bytes as a data URI
    pub fn encode(mime: &str, data: &[u8]) -> String {
        format!("data:{};base64,{}", mime, BASE64.encode(data))
    }

    /// File extension for this image type
    pub fn extension(&self) -> &'static str {
        extension_for(&self.mime).unwrap_or("bin")
    }
}

/// File extension for an image MIME type
pub fn extension_for(mime: &str) -> Option<&'static str> {
    match mime {
        "image/jpg" => Some("jpeg"),
        _ => IMAGE_TYPES
            .iter()
            .find(|(_, m)| *m == mime)
            .map(|(ext, _)| *ext),
    }
}

/// MIME type for a media part, by extension
pub fn mime_for(uri: &PartUri) -> Option<&'static str> {
    let ext = uri.extension()?.to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Media file collected during export
#[derive(Clone, Debug)]
pub struct MediaFile {
    pub uri: PartUri,
    pub mime: String,
    pub data: Vec<u8>,
}

/// Media files shared by every part of one export
#[derive(Debug, Default)]
pub struct MediaStore {
    files: Vec<MediaFile>,
}

impl MediaStore {
    /// Store an image under the next deterministic file name and return the
    /// relationship target relative to `/word/`
    pub fn add(&mut self, image: DataUri) -> String {
        let uri = well_known::media(self.files.len() + 1, image.extension());
        let target = format!("media/{}", uri.file_name());
        self.files.push(MediaFile {
            uri,
            mime: image.mime,
            data: image.data,
        });
        target
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Stored files in insertion order
    pub fn into_files(self) -> Vec<MediaFile> {
        self.files
    }
}

/// Pixel dimensions read from an image header
pub fn sniff_size(data: &[u8]) -> Option<(u32, u32)> {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") && data.len() >= 24 {
        let w = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
        let h = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
        return Some((w, h));
    }
    if data.starts_with(b"GIF8") && data.len() >= 10 {
        let w = u16::from_le_bytes([data[6], data[7]]) as u32;
        let h = u16::from_le_bytes([data[8], data[9]]) as u32;
        return Some((w, h));
    }
    if data.starts_with(b"BM") && data.len() >= 26 {
        let w = i32::from_le_bytes([data[18], data[19], data[20], data[21]]);
        let h = i32::from_le_bytes([data[22], data[23], data[24], data[25]]);
        return Some((w.unsigned_abs(), h.unsigned_abs()));
    }
    if data.starts_with(&[0xff, 0xd8]) {
        return jpeg_size(data);
    }
    None
}

/// Walk JPEG segments until a start-of-frame marker
fn jpeg_size(data: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2;
    while pos + 9 < data.len() {
        if data[pos] != 0xff {
            return None;
        }
        let marker = data[pos + 1];
        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let is_sof = matches!(marker, 0xc0..=0xcf) && !matches!(marker, 0xc4 | 0xc8 | 0xcc);
        if is_sof {
            let h = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            let w = u16::from_be_bytes([data[pos + 7], data[pos + 8]]) as u32;
            return Some((w, h));
        }
        pos += 2 + len;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1x1 transparent PNG
    const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_parse_data_uri() {
        let uri = format!("data:image/png;base64,{}", PIXEL_PNG);
        let image = DataUri::parse(&uri).unwrap();
        assert_eq!(image.mime, "image/png");
        assert_eq!(image.extension(), "png");
        assert_eq!(sniff_size(&image.data), Some((1, 1)));
        assert_eq!(DataUri::encode(&image.mime, &image.data), uri);
    }

    #[test]
    fn test_malformed_data_uris() {
        for uri in [
            "https://example.com/a.png",
            "data:image/png,rawbytes",
            "data:image/png;base64,@@@not base64@@@",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png;base64",
        ] {
            assert!(
                matches!(DataUri::parse(uri), Err(Error::UnsupportedEmbed(_))),
                "{} should be rejected",
                uri
            );
        }
    }

    #[test]
    fn test_media_store_names_files_in_order() {
        let mut store = MediaStore::default();
        let png = DataUri {
            mime: "image/png".into(),
            data: vec![1],
        };
        let jpg = DataUri {
            mime: "image/jpeg".into(),
            data: vec![2],
        };
        assert_eq!(store.add(png), "media/image1.png");
        assert_eq!(store.add(jpg), "media/image2.jpeg");

        let files = store.into_files();
        assert_eq!(files[1].uri.as_str(), "/word/media/image2.jpeg");
    }

    #[test]
    fn test_sniff_gif_and_jpeg() {
        let gif = b"GIF89a\x0a\x00\x14\x00rest";
        assert_eq!(sniff_size(gif), Some((10, 20)));

        let jpeg = [
            0xff, 0xd8, 0xff, 0xe0, 0x00, 0x04, 0x00, 0x00, 0xff, 0xc0, 0x00, 0x11, 0x08, 0x00,
            0x30, 0x00, 0x40, 0x03, 0x00, 0x00,
        ];
        assert_eq!(sniff_size(&jpeg), Some((64, 48)));
    }
}
