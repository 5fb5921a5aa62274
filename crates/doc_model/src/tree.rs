//! Ordered XML element tree
//!
//! Every part of a `.docx` package that the engine touches is loaded into an
//! `XmlElement` tree. Children keep storage order and attributes keep
//! declaration order, so an unmodified tree serializes back to equivalent XML.

use crate::{DocModelError, NodePath, Result};

/// A node in the XML tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Character data, already unescaped
    Text(String),
    CData(String),
    /// Raw comment content
    Comment(String),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<XmlElement> for XmlNode {
    fn from(element: XmlElement) -> Self {
        XmlNode::Element(element)
    }
}

/// An XML element with its qualified name (e.g. `w:p`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified name as written in the source, prefix included
    pub name: String,
    /// Attributes in declaration order, values unescaped
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Builder: append a text node
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Local part of the qualified name
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Namespace prefix, if the name carries one
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Check the qualified name
    pub fn is(&self, qname: &str) -> bool {
        self.name == qname
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Return the value of the first attribute in `names` that is present.
    pub fn first_attribute(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.attribute(name))
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Child elements in order, skipping text and comments
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Child elements paired with their index in `children`
    pub fn indexed_elements(&self) -> impl Iterator<Item = (usize, &XmlElement)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.as_element().map(|element| (index, element)))
    }

    /// First child element with the given qualified name
    pub fn find(&self, qname: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.is(qname))
    }

    pub fn find_mut(&mut self, qname: &str) -> Option<&mut XmlElement> {
        self.children
            .iter_mut()
            .filter_map(XmlNode::as_element_mut)
            .find(|element| element.is(qname))
    }

    /// All child elements with the given qualified name
    pub fn find_all<'a>(&'a self, qname: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |element| element.is(qname))
    }

    /// Follow a chain of child names, e.g. `["w:sdtPr", "w:docPartObj"]`
    pub fn find_path(&self, qnames: &[&str]) -> Option<&XmlElement> {
        qnames
            .iter()
            .try_fold(self, |element, qname| element.find(qname))
    }

    /// Pre-order iterator over all descendant elements (self excluded)
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Concatenation of this element's direct text and CDATA children
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(value) | XmlNode::CData(value) => text.push_str(value),
                _ => {}
            }
        }
        text
    }

    /// Replace all text content with a single text node
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children
            .retain(|child| !matches!(child, XmlNode::Text(_) | XmlNode::CData(_)));
        let text = text.into();
        if !text.is_empty() {
            self.children.push(XmlNode::Text(text));
        }
    }

    /// Concatenated text of every descendant element named `qname`
    pub fn descendant_text(&self, qname: &str) -> String {
        self.descendants()
            .filter(|element| element.is(qname))
            .map(XmlElement::text)
            .collect()
    }

    /// Resolve a path relative to this element
    pub fn get(&self, path: &NodePath) -> Option<&XmlElement> {
        let mut current = self;
        for &index in path.indices() {
            current = current.children.get(index)?.as_element()?;
        }
        Some(current)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut XmlElement> {
        let mut current = self;
        for &index in path.indices() {
            current = current.children.get_mut(index)?.as_element_mut()?;
        }
        Some(current)
    }

    /// Resolve a path that must point at an element
    pub fn require_mut(&mut self, path: &NodePath) -> Result<&mut XmlElement> {
        self.get_mut(path)
            .ok_or_else(|| DocModelError::PathNotFound(path.clone()))
    }

    /// Insert a child node at `index` (may equal the child count)
    pub fn insert_child(&mut self, index: usize, node: impl Into<XmlNode>) -> Result<()> {
        let len = self.children.len();
        if index > len {
            return Err(DocModelError::IndexOutOfBounds { index, len });
        }
        self.children.insert(index, node.into());
        Ok(())
    }
}

/// Pre-order descendant iterator, see [`XmlElement::descendants`]
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, XmlNode>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(XmlNode::Element(element)) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                Some(_) => continue,
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A parsed XML part: the root element plus whether it carried a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
    pub has_declaration: bool,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self {
            root,
            has_declaration: true,
        }
    }
}
