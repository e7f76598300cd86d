use super::namespaces::{RDF, X};
use super::{Property, XmpPacket, XmpValue};
use quick_xml::escape::escape;
use std::collections::BTreeSet;
use std::fmt::Write;

const PACKET_ID: &str = "W5M0MpCehiHzreSzNTczkc9d";

fn used_prefixes<'a>(properties: &'a [Property], out: &mut BTreeSet<&'a str>) {
    for property in properties {
        out.insert(property.prefix.as_str());
        used_value_prefixes(&property.value, out);
    }
}

fn used_value_prefixes<'a>(value: &'a XmpValue, out: &mut BTreeSet<&'a str>) {
    match value {
        XmpValue::Text(_) => {}
        XmpValue::Array { items, .. } => {
            for item in items {
                used_value_prefixes(&item.value, out);
            }
        }
        XmpValue::Struct(fields) => used_prefixes(fields, out),
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push(' ');
    }
}

fn write_value(out: &mut String, tag: &str, value: &XmpValue, depth: usize, lang: Option<&str>) {
    let lang_attr = lang
        .map(|l| format!(" xml:lang=\"{}\"", escape(l)))
        .unwrap_or_default();
    indent(out, depth);
    match value {
        XmpValue::Text(text) => {
            let _ = writeln!(out, "<{}{}>{}</{}>", tag, lang_attr, escape(text.as_str()), tag);
        }
        XmpValue::Array { kind, items } => {
            let _ = writeln!(out, "<{}{}>", tag, lang_attr);
            indent(out, depth + 1);
            let _ = writeln!(out, "<rdf:{}>", kind.rdf_name());
            for item in items {
                write_value(out, "rdf:li", &item.value, depth + 2, item.lang.as_deref());
            }
            indent(out, depth + 1);
            let _ = writeln!(out, "</rdf:{}>", kind.rdf_name());
            indent(out, depth);
            let _ = writeln!(out, "</{}>", tag);
        }
        XmpValue::Struct(fields) if fields.is_empty() => {
            let _ = writeln!(out, "<{}{} rdf:parseType=\"Resource\"/>", tag, lang_attr);
        }
        XmpValue::Struct(fields) => {
            let _ = writeln!(out, "<{}{} rdf:parseType=\"Resource\">", tag, lang_attr);
            for field in fields {
                let name = format!("{}:{}", field.prefix, field.name);
                write_value(out, &name, &field.value, depth + 1, None);
            }
            indent(out, depth);
            let _ = writeln!(out, "</{}>", tag);
        }
    }
}

/// Serializes a packet as one `rdf:Description` inside an `x:xmpmeta`
/// wrapper with `xpacket` processing instructions.
pub fn serialize_packet(packet: &XmpPacket) -> String {
    let mut prefixes = BTreeSet::new();
    used_prefixes(packet.properties(), &mut prefixes);

    let mut out = String::new();
    let _ = writeln!(out, "<?xpacket begin=\"\u{feff}\" id=\"{}\"?>", PACKET_ID);
    let _ = writeln!(out, "<x:xmpmeta xmlns:x=\"{}\">", X);
    let _ = writeln!(out, " <rdf:RDF xmlns:rdf=\"{}\">", RDF);
    out.push_str("  <rdf:Description rdf:about=\"\"");
    for prefix in prefixes {
        if let Some(uri) = packet.namespace_uri(prefix) {
            let _ = write!(out, "\n    xmlns:{}=\"{}\"", prefix, escape(uri));
        } else {
            log::warn!("No namespace known for XMP prefix '{}'", prefix);
        }
    }

    if packet.is_empty() {
        out.push_str("/>\n");
    } else {
        out.push_str(">\n");
        for property in packet.properties() {
            let name = format!("{}:{}", property.prefix, property.name);
            write_value(&mut out, &name, &property.value, 3, None);
        }
        out.push_str("  </rdf:Description>\n");
    }

    out.push_str(" </rdf:RDF>\n");
    out.push_str("</x:xmpmeta>\n");
    out.push_str("<?xpacket end=\"w\"?>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmp::parse_packet;

    #[test]
    fn written_packet_reads_back_identically() {
        let mut packet = XmpPacket::new();
        packet
            .set_multiple(
                "Xmp.digiKam.TagsList",
                &["People/Alice".to_string(), "Tom & Jerry".to_string()],
            )
            .unwrap();
        packet.set_string("Xmp.pdf.Keywords", "People/Alice, <b>").unwrap();
        packet
            .set_string(
                "Xmp.acdsee.categories",
                "<Categories><Category Assigned=\"1\">Alice</Category></Categories>",
            )
            .unwrap();

        let text = serialize_packet(&packet);
        assert!(text.contains("xmlns:digiKam=\"http://www.digikam.org/ns/1.0/\""));
        assert!(text.contains("<rdf:Seq>"));

        let again = parse_packet(&text).unwrap();
        assert_eq!(again.properties(), packet.properties());
    }

    #[test]
    fn structures_survive_a_cycle() {
        let source = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/"><rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
<rdf:Description xmlns:MP="http://ns.microsoft.com/photo/1.2/"
  xmlns:MPRI="http://ns.microsoft.com/photo/1.2/t/RegionInfo#"
  xmlns:MPReg="http://ns.microsoft.com/photo/1.2/t/Region#">
 <MP:RegionInfo rdf:parseType="Resource">
  <MPRI:Regions><rdf:Bag>
   <rdf:li MPReg:PersonDisplayName="Alice" MPReg:Rectangle="0.1, 0.1, 0.2, 0.2"/>
  </rdf:Bag></MPRI:Regions>
 </MP:RegionInfo>
</rdf:Description></rdf:RDF></x:xmpmeta>"#;
        let packet = parse_packet(source).unwrap();
        let again = parse_packet(&serialize_packet(&packet)).unwrap();
        assert_eq!(again.properties(), packet.properties());
        assert_eq!(
            again
                .get_string("Xmp.MP.RegionInfo/MPRI:Regions[1]/MPReg:PersonDisplayName")
                .as_deref(),
            Some("Alice")
        );
    }

    #[test]
    fn empty_packet_is_well_formed() {
        let text = serialize_packet(&XmpPacket::new());
        assert!(text.contains("<rdf:Description rdf:about=\"\"/>"));
        assert!(parse_packet(&text).unwrap().is_empty());
    }
}
