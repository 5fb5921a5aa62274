//! Loading XML parts into `XmlElement` trees and writing them back
//!
//! Unlike the event-based part parsers, this keeps every text node
//! (whitespace included) so that a part survives a load/save cycle with the
//! same content.

use crate::docx::error::{DocxError, DocxResult};
use doc_model::{XmlDocument, XmlElement, XmlNode};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Parse an XML part into a tree
pub fn parse_xml(content: &str) -> DocxResult<XmlDocument> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut has_declaration = false;

    loop {
        match reader.read_event()? {
            Event::Decl(_) => has_declaration = true,
            Event::Start(ref e) => stack.push(element_from_start(e)?),
            Event::Empty(ref e) => {
                let element = element_from_start(e)?;
                attach(&mut stack, &mut root, XmlNode::Element(element))?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    DocxError::XmlParse("Unexpected closing tag".to_string())
                })?;
                attach(&mut stack, &mut root, XmlNode::Element(element))?;
            }
            Event::Text(ref e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = e.unescape()
                        .map_err(|e| DocxError::XmlParse(e.to_string()))?;
                    if !text.is_empty() {
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
            }
            Event::CData(e) => {
                if let Some(parent) = stack.last_mut() {
                    let data = String::from_utf8(e.into_inner().into_owned())?;
                    parent.children.push(XmlNode::CData(data));
                }
            }
            Event::Comment(ref e) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(XmlNode::Comment(String::from_utf8_lossy(e).to_string()));
                }
            }
            Event::Eof => break,
            // Processing instructions and doctypes do not occur in OOXML parts
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DocxError::XmlParse(format!(
            "Unclosed element <{}>",
            stack.last().map(|e| e.name.as_str()).unwrap_or_default()
        )));
    }

    let root = root.ok_or_else(|| DocxError::XmlParse("Document has no root element".to_string()))?;
    Ok(XmlDocument {
        root,
        has_declaration,
    })
}

fn element_from_start(event: &BytesStart) -> DocxResult<XmlElement> {
    let name = String::from_utf8(event.name().as_ref().to_vec())?;
    let mut element = XmlElement::new(name);
    for attribute in event.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8(attribute.key.as_ref().to_vec())?;
        let value = attribute
            .unescape_value()
            .map_err(|e| DocxError::XmlParse(e.to_string()))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    node: XmlNode,
) -> DocxResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    match node {
        XmlNode::Element(element) if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        XmlNode::Element(element) => Err(DocxError::XmlParse(format!(
            "Second root element <{}>",
            element.name
        ))),
        _ => Ok(()),
    }
}

/// Serialize a tree back into XML text
pub fn write_xml(document: &XmlDocument) -> DocxResult<String> {
    let mut writer = Writer::new(Vec::new());
    if document.has_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        writer.get_mut().extend_from_slice(b"\r\n");
    }
    write_element(&mut writer, &document.root)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> DocxResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            XmlNode::CData(data) => writer.write_event(Event::CData(BytesCData::new(data.as_str())))?,
            XmlNode::Comment(raw) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(raw.as_str())))?
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve"> Tom &amp; Jerry </w:t></w:r><w:r><w:t>&lt;tag&gt;</w:t></w:r></w:p><!-- note --><w:sectPr/></w:body></w:document>"#;

    #[test]
    fn test_parse_keeps_structure_and_whitespace() {
        let doc = parse_xml(SAMPLE).unwrap();
        assert!(doc.has_declaration);
        assert_eq!(doc.root.name, "w:document");
        let body = doc.root.find("w:body").unwrap();
        let para = body.find("w:p").unwrap();
        let texts: Vec<String> = para.descendants().filter(|e| e.is("w:t")).map(|e| e.text()).collect();
        assert_eq!(texts, vec![" Tom & Jerry ", "<tag>"]);
        assert!(matches!(body.children[1], XmlNode::Comment(_)));
    }

    #[test]
    fn test_roundtrip_is_stable() {
        let doc = parse_xml(SAMPLE).unwrap();
        let written = write_xml(&doc).unwrap();
        let reparsed = parse_xml(&written).unwrap();
        assert_eq!(doc, reparsed);
        assert_eq!(written, write_xml(&reparsed).unwrap());
    }

    #[test]
    fn test_attribute_escaping() {
        let doc = XmlDocument::new(
            XmlElement::new("w:comment").with_attribute("w:author", "A \"B\" & <C>"),
        );
        let written = write_xml(&doc).unwrap();
        let reparsed = parse_xml(&written).unwrap();
        assert_eq!(reparsed.root.attribute("w:author"), Some("A \"B\" & <C>"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse_xml("<w:p><w:r></w:p>").is_err());
        assert!(parse_xml("").is_err());
    }
}
