use crate::backend::{MetadataBackend, MetadataHandle, OpenOutcome, SkipReason};
use crate::error::AppError;
use crate::xmp::{parse_packet, serialize_packet, XmpPacket};
use img_parts::jpeg::{markers, Jpeg, JpegSegment};
use std::fs;
use std::path::{Path, PathBuf};

const XMP_SIGNATURE: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";
/// Largest APP1 payload: the 16-bit segment length also counts its own two bytes.
const MAX_SEGMENT_CONTENTS: usize = 0xFFFF - 2;

/// XMP embedded in JPEG files, plus standalone `.xmp` sidecars.
pub struct XmpFileBackend;

enum Container {
    Sidecar,
    Jpeg(Jpeg),
}

pub struct XmpFileHandle {
    path: PathBuf,
    container: Container,
    packet: XmpPacket,
}

impl XmpFileBackend {
    pub fn new() -> Self {
        log::debug!("Using built-in XMP metadata backend");
        Self
    }
}

fn is_xmp_segment(segment: &JpegSegment) -> bool {
    segment.marker() == markers::APP1 && segment.contents().starts_with(XMP_SIGNATURE)
}

fn is_app_segment(segment: &JpegSegment) -> bool {
    (0xE0..=0xEF).contains(&segment.marker())
}

fn open_sidecar(path: &Path) -> OpenOutcome {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return OpenOutcome::Skipped(SkipReason::Unreadable(e.to_string())),
    };
    match parse_packet(&text) {
        Ok(packet) => OpenOutcome::Opened(Box::new(XmpFileHandle {
            path: path.to_path_buf(),
            container: Container::Sidecar,
            packet,
        })),
        Err(e) => OpenOutcome::Skipped(SkipReason::Unparsable(e.to_string())),
    }
}

fn open_jpeg(path: &Path) -> OpenOutcome {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => return OpenOutcome::Skipped(SkipReason::Unreadable(e.to_string())),
    };
    let jpeg = match Jpeg::from_bytes(data.into()) {
        Ok(jpeg) => jpeg,
        Err(e) => return OpenOutcome::Skipped(SkipReason::Unparsable(e.to_string())),
    };

    let packet = match jpeg.segments().iter().find(|s| is_xmp_segment(s)) {
        Some(segment) => {
            let payload = &segment.contents()[XMP_SIGNATURE.len()..];
            let parsed = std::str::from_utf8(payload)
                .map_err(|e| e.to_string())
                .and_then(|text| parse_packet(text).map_err(|e| e.to_string()));
            match parsed {
                Ok(packet) => packet,
                Err(e) => return OpenOutcome::Skipped(SkipReason::Unparsable(e)),
            }
        }
        None => XmpPacket::new(),
    };

    OpenOutcome::Opened(Box::new(XmpFileHandle {
        path: path.to_path_buf(),
        container: Container::Jpeg(jpeg),
        packet,
    }))
}

impl MetadataBackend for XmpFileBackend {
    fn name(&self) -> &'static str {
        "xmp"
    }

    fn open(&self, path: &Path) -> OpenOutcome {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "xmp" => open_sidecar(path),
            "jpg" | "jpeg" | "jpe" => open_jpeg(path),
            _ => OpenOutcome::Skipped(SkipReason::Unsupported),
        }
    }
}

impl MetadataHandle for XmpFileHandle {
    fn tag_multiple(&self, key: &str) -> Vec<String> {
        self.packet.get_multiple(key)
    }

    fn tag_string(&self, key: &str) -> Option<String> {
        self.packet.get_string(key)
    }

    fn tag_keys(&self) -> Vec<String> {
        self.packet.keys()
    }

    fn has_tag(&self, key: &str) -> bool {
        self.packet.contains(key)
    }

    fn set_tag_multiple(&mut self, key: &str, values: &[String]) -> Result<(), AppError> {
        log::trace!("{:?}: {} <- {:?}", self.path, key, values);
        self.packet.set_multiple(key, values)
    }

    fn set_tag_string(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        log::trace!("{:?}: {} <- {:?}", self.path, key, value);
        self.packet.set_string(key, value)
    }

    fn clear_tag(&mut self, key: &str) {
        self.packet.remove(key);
    }

    fn save(&mut self) -> Result<(), AppError> {
        let text = serialize_packet(&self.packet);
        match &mut self.container {
            Container::Sidecar => fs::write(&self.path, text)?,
            Container::Jpeg(jpeg) => {
                let mut contents = Vec::with_capacity(XMP_SIGNATURE.len() + text.len());
                contents.extend_from_slice(XMP_SIGNATURE);
                contents.extend_from_slice(text.as_bytes());
                if contents.len() > MAX_SEGMENT_CONTENTS {
                    return Err(AppError::XmpTooLarge(contents.len()));
                }
                let segment = JpegSegment::new_with_contents(markers::APP1, contents.into());

                let segments = jpeg.segments_mut();
                match segments.iter().position(is_xmp_segment) {
                    Some(index) => segments[index] = segment,
                    None => {
                        let index = segments.iter().take_while(|s| is_app_segment(s)).count();
                        segments.insert(index, segment);
                    }
                }

                let mut out = Vec::new();
                jpeg.clone().encoder().write_to(&mut out)?;
                fs::write(&self.path, out)?;
            }
        }
        log::debug!("Saved metadata of {:?}", self.path);
        Ok(())
    }
}
