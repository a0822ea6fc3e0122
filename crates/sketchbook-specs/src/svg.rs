//! Minimal SVG element tree built with quick-xml.
//!
//! Only elements and their attributes are kept; text content, comments and
//! processing instructions are dropped. Elements are stored in document order
//! so selections iterate the way the artboard was written.

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::extract::SpecError;
use crate::node::AttributedNode;

/// A parsed SVG document.
#[derive(Debug, Clone, Default)]
pub struct SvgDocument {
    elements: Vec<Element>,
}

#[derive(Debug, Clone)]
struct Element {
    /// Local name, without namespace prefix
    name: String,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
}

/// Handle to one element of an [`SvgDocument`].
#[derive(Debug, Clone, Copy)]
pub struct SvgNode<'a> {
    document: &'a SvgDocument,
    index: usize,
}

impl SvgDocument {
    /// Parse SVG markup into an element tree.
    pub fn parse(source: &[u8]) -> Result<Self, SpecError> {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);

        let mut elements = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                SpecError::Xml(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;

            match event {
                Event::Start(start) => {
                    let index =
                        push_element(&mut elements, &start, open.last().copied(), reader.decoder())?;
                    open.push(index);
                }
                Event::Empty(start) => {
                    push_element(&mut elements, &start, open.last().copied(), reader.decoder())?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { elements })
    }

    /// All elements in document order.
    pub fn nodes(&self) -> impl Iterator<Item = SvgNode<'_>> {
        (0..self.elements.len()).map(move |index| SvgNode {
            document: self,
            index,
        })
    }

    /// Elements with the given local name, in document order.
    pub fn select<'a>(&'a self, name: &'a str) -> impl Iterator<Item = SvgNode<'a>> + 'a {
        self.nodes().filter(move |node| node.name() == name)
    }
}

impl<'a> SvgNode<'a> {
    /// Local element name.
    pub fn name(&self) -> &'a str {
        &self.element().name
    }

    fn element(&self) -> &'a Element {
        &self.document.elements[self.index]
    }
}

impl<'a> AttributedNode<'a> for SvgNode<'a> {
    fn attr(self, name: &str) -> Option<&'a str> {
        self.element()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn parent(self) -> Option<Self> {
        self.element().parent.map(|index| SvgNode {
            document: self.document,
            index,
        })
    }
}

fn push_element(
    elements: &mut Vec<Element>,
    start: &BytesStart<'_>,
    parent: Option<usize>,
    decoder: Decoder,
) -> Result<usize, SpecError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| SpecError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| SpecError::Xml(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    elements.push(Element {
        name,
        attributes,
        parent,
    });

    Ok(elements.len() - 1)
}
