//! `[Content_Types].xml`: the MIME type of every part in the package

use crate::docx::error::DocxResult;
use crate::docx::namespaces;
use crate::docx::reader::XML_DECLARATION;
use crate::docx::xml_tree::parse_xml;
use quick_xml::escape::escape;

/// Content types in file order.
///
/// `defaults` map a file extension to a type; `overrides` map a part name
/// (always with a leading `/`) to a type and take precedence.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    pub defaults: Vec<(String, String)>,
    pub overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn parse(content: &str) -> DocxResult<Self> {
        let document = parse_xml(content)?;
        let mut types = Self::default();
        for entry in document.root.elements() {
            let content_type = match entry.attribute("ContentType") {
                Some(value) => value.to_string(),
                None => continue,
            };
            match (entry.local_name(), entry.attribute("Extension"), entry.attribute("PartName")) {
                ("Default", Some(extension), _) => {
                    types.defaults.push((extension.to_string(), content_type))
                }
                ("Override", _, Some(part)) => types.overrides.push((part.to_string(), content_type)),
                _ => {}
            }
        }
        Ok(types)
    }

    /// Type of the part at `path`, override first, then extension default
    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        let part = part_name(path);
        if let Some((_, ct)) = self.overrides.iter().find(|(name, _)| *name == part) {
            return Some(ct);
        }
        let (_, extension) = path.rsplit_once('.')?;
        self.defaults
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(extension))
            .map(|(_, ct)| ct.as_str())
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        if !self.defaults.iter().any(|(known, _)| known.eq_ignore_ascii_case(extension)) {
            self.defaults.push((extension.to_string(), content_type.to_string()));
        }
    }

    /// Add an override, replacing the type if the part already has one
    pub fn add_override(&mut self, part: &str, content_type: &str) {
        let part = part_name(part);
        match self.overrides.iter_mut().find(|(name, _)| *name == part) {
            Some((_, ct)) => *ct = content_type.to_string(),
            None => self.overrides.push((part, content_type.to_string())),
        }
    }

    pub fn to_xml(&self) -> String {
        let mut xml = format!("{}\n<Types xmlns=\"{}\">", XML_DECLARATION, namespaces::CT);
        for (extension, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape(extension.as_str()),
                escape(ct.as_str())
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape(part.as_str()),
                escape(ct.as_str())
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

fn part_name(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
