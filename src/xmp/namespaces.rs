//! Canonical prefixes for the XMP schemas this tool touches or commonly meets.

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
pub const X: &str = "adobe:ns:meta/";

/// (prefix, uri) pairs. The prefix is used in keys regardless of what the
/// document itself declares.
const KNOWN: &[(&str, &str)] = &[
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("digiKam", "http://www.digikam.org/ns/1.0/"),
    ("MicrosoftPhoto", "http://ns.microsoft.com/photo/1.0/"),
    ("lr", "http://ns.adobe.com/lightroom/1.0/"),
    ("mediapro", "http://ns.iview-multimedia.com/mediapro/1.0/"),
    ("pdf", "http://ns.adobe.com/pdf/1.3/"),
    ("acdsee", "http://ns.acdsee.com/iptc/1.0/"),
    ("MP", "http://ns.microsoft.com/photo/1.2/"),
    ("MPRI", "http://ns.microsoft.com/photo/1.2/t/RegionInfo#"),
    ("MPReg", "http://ns.microsoft.com/photo/1.2/t/Region#"),
    ("mwg-rs", "http://www.metadataworkinggroup.com/schemas/regions/"),
    ("stArea", "http://ns.adobe.com/xmp/sType/Area#"),
    ("stDim", "http://ns.adobe.com/xap/1.0/sType/Dimensions#"),
    ("xmp", "http://ns.adobe.com/xap/1.0/"),
    ("xmpMM", "http://ns.adobe.com/xap/1.0/mm/"),
    ("stEvt", "http://ns.adobe.com/xap/1.0/sType/ResourceEvent#"),
    ("exif", "http://ns.adobe.com/exif/1.0/"),
    ("tiff", "http://ns.adobe.com/tiff/1.0/"),
    ("photoshop", "http://ns.adobe.com/photoshop/1.0/"),
    ("Iptc4xmpCore", "http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/"),
];

pub fn prefix_for_uri(uri: &str) -> Option<&'static str> {
    KNOWN.iter().find(|(_, u)| *u == uri).map(|(p, _)| *p)
}

pub fn uri_for_prefix(prefix: &str) -> Option<&'static str> {
    KNOWN.iter().find(|(p, _)| *p == prefix).map(|(_, u)| *u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_schemas_are_known() {
        assert_eq!(
            prefix_for_uri("http://www.metadataworkinggroup.com/schemas/regions/"),
            Some("mwg-rs")
        );
        assert_eq!(
            uri_for_prefix("MPReg"),
            Some("http://ns.microsoft.com/photo/1.2/t/Region#")
        );
        assert_eq!(prefix_for_uri("urn:example:unknown"), None);
    }
}
