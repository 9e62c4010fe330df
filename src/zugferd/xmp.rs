use quick_xml::escape::escape;

use super::ns;
use crate::core::ProfileLevel;

/// ZUGFeRD XML schema version announced in the metadata.
const SCHEMA_VERSION: &str = "1.0";

/// Build the XMP packet identifying the file as PDF/A-3B with an embedded
/// ZUGFeRD 1.0 invoice of the given profile tier, stored as the embedded
/// file `filename`.
pub fn build_xmp(profile: ProfileLevel, title: &str, filename: &str) -> String {
    let conformance_level = profile.conformance_level();
    let title = escape(title);
    let filename = escape(filename);
    let zf = ns::XMP_ZF;

    format!(
        r#"<?xpacket begin="{BOM}" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about=""
        xmlns:pdfaid="http://www.aiim.org/pdfa/ns/id/">
      <pdfaid:part>3</pdfaid:part>
      <pdfaid:conformance>B</pdfaid:conformance>
    </rdf:Description>
    <rdf:Description rdf:about=""
        xmlns:dc="http://purl.org/dc/elements/1.1/">
      <dc:title>
        <rdf:Alt>
          <rdf:li xml:lang="x-default">{title}</rdf:li>
        </rdf:Alt>
      </dc:title>
    </rdf:Description>
    <rdf:Description rdf:about=""
        xmlns:pdfaExtension="http://www.aiim.org/pdfa/ns/extension/"
        xmlns:pdfaSchema="http://www.aiim.org/pdfa/ns/schema#"
        xmlns:pdfaProperty="http://www.aiim.org/pdfa/ns/property#">
      <pdfaExtension:schemas>
        <rdf:Bag>
          <rdf:li rdf:parseType="Resource">
            <pdfaSchema:schema>ZUGFeRD PDFA Extension Schema</pdfaSchema:schema>
            <pdfaSchema:namespaceURI>{zf}</pdfaSchema:namespaceURI>
            <pdfaSchema:prefix>zf</pdfaSchema:prefix>
            <pdfaSchema:property>
              <rdf:Seq>
{properties}
              </rdf:Seq>
            </pdfaSchema:property>
          </rdf:li>
        </rdf:Bag>
      </pdfaExtension:schemas>
    </rdf:Description>
    <rdf:Description rdf:about=""
        xmlns:zf="{zf}">
      <zf:DocumentType>INVOICE</zf:DocumentType>
      <zf:DocumentFileName>{filename}</zf:DocumentFileName>
      <zf:Version>{SCHEMA_VERSION}</zf:Version>
      <zf:ConformanceLevel>{conformance_level}</zf:ConformanceLevel>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#,
        BOM = '\u{FEFF}',
        properties = extension_properties(),
    )
}

fn extension_properties() -> String {
    const PROPERTIES: [(&str, &str); 4] = [
        ("DocumentFileName", "name of the embedded XML invoice file"),
        ("DocumentType", "INVOICE"),
        ("Version", "The actual version of the ZUGFeRD XML schema"),
        (
            "ConformanceLevel",
            "The conformance level of the embedded ZUGFeRD data",
        ),
    ];

    PROPERTIES
        .iter()
        .map(|(name, description)| {
            format!(
                r#"                <rdf:li rdf:parseType="Resource">
                  <pdfaProperty:name>{name}</pdfaProperty:name>
                  <pdfaProperty:valueType>Text</pdfaProperty:valueType>
                  <pdfaProperty:category>external</pdfaProperty:category>
                  <pdfaProperty:description>{description}</pdfaProperty:description>
                </rdf:li>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifies_pdfa3b_and_profile() {
        let xmp = build_xmp(ProfileLevel::Comfort, "Invoice 1", crate::zugferd::ZUGFERD_FILENAME);
        assert!(xmp.contains("<pdfaid:part>3</pdfaid:part>"));
        assert!(xmp.contains("<pdfaid:conformance>B</pdfaid:conformance>"));
        assert!(xmp.contains("<zf:ConformanceLevel>COMFORT</zf:ConformanceLevel>"));
        assert!(xmp.contains("<zf:DocumentFileName>ZUGFeRD-invoice.xml</zf:DocumentFileName>"));
        assert_eq!(xmp.matches("<pdfaProperty:name>").count(), 4);
    }

    #[test]
    fn title_is_escaped() {
        let xmp = build_xmp(ProfileLevel::Basic, "A & <B>", "a&b.xml");
        assert!(xmp.contains("A &amp; &lt;B&gt;"));
        assert!(xmp.contains("<zf:DocumentFileName>a&amp;b.xml</zf:DocumentFileName>"));
    }
}
