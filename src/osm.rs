//! Streaming reader for OSM XML documents.
//!
//! Yields one top-level element at a time and never materializes the full
//! document, so inputs with millions of elements stay within bounded memory.
//! The internal event buffer is cleared after every event.

use std::collections::HashMap;
use std::io::BufRead;
use std::str;

use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Kind of a top-level OSM element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl ElementKind {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"node" => Some(ElementKind::Node),
            b"way" => Some(ElementKind::Way),
            b"relation" => Some(ElementKind::Relation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
            ElementKind::Relation => "relation",
        }
    }
}

/// One parsed top-level element with its ordered children.
#[derive(Debug, Clone)]
pub struct RawElement {
    pub kind: ElementKind,
    /// Top-level attribute map.
    pub attrs: HashMap<String, String>,
    /// `(k, v)` pairs of child `tag` elements in document order.
    pub tags: Vec<(String, String)>,
    /// `ref` values of child `nd` elements in document order.
    pub node_refs: Vec<String>,
}

impl RawElement {
    fn new(kind: ElementKind, attrs: HashMap<String, String>) -> Self {
        RawElement {
            kind,
            attrs,
            tags: Vec::new(),
            node_refs: Vec::new(),
        }
    }

    /// Look up a top-level attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Pull parser over an OSM XML stream.
pub struct OsmReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    current: Option<RawElement>,
}

impl<R: BufRead> OsmReader<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);
        OsmReader {
            reader,
            buf: Vec::new(),
            current: None,
        }
    }

    /// Advance to the next complete top-level element.
    ///
    /// Returns `Ok(None)` once the input is exhausted. Malformed XML and
    /// input that ends inside an open element are fatal.
    pub fn read_element(&mut self) -> Result<Option<RawElement>> {
        loop {
            let finished = match self
                .reader
                .read_event_into(&mut self.buf)
                .context("malformed OSM XML")?
            {
                Event::Eof => {
                    if let Some(element) = &self.current {
                        bail!(
                            "input ended inside an unterminated {} element",
                            element.kind.as_str()
                        );
                    }
                    return Ok(None);
                }
                Event::Start(start) => Self::handle_open(&mut self.current, &start, false)?,
                Event::Empty(start) => Self::handle_open(&mut self.current, &start, true)?,
                Event::End(end) => match ElementKind::from_name(end.name().as_ref()) {
                    Some(_) => self.current.take(),
                    None => None,
                },
                _ => None,
            };
            self.buf.clear();
            if let Some(element) = finished {
                return Ok(Some(element));
            }
        }
    }

    fn handle_open(
        current: &mut Option<RawElement>,
        start: &BytesStart,
        is_empty: bool,
    ) -> Result<Option<RawElement>> {
        let name = start.name();
        if let Some(kind) = ElementKind::from_name(name.as_ref()) {
            let element = RawElement::new(kind, collect_attrs(start)?);
            if is_empty {
                return Ok(Some(element));
            }
            *current = Some(element);
            return Ok(None);
        }

        match name.as_ref() {
            b"tag" => {
                if let Some(element) = current.as_mut() {
                    let key = attr_value(start, b"k")?;
                    let value = attr_value(start, b"v")?;
                    if let (Some(key), Some(value)) = (key, value) {
                        element.tags.push((key, value));
                    }
                }
            }
            b"nd" => {
                if let Some(element) = current.as_mut() {
                    if let Some(reference) = attr_value(start, b"ref")? {
                        element.node_refs.push(reference);
                    }
                }
            }
            _ => {}
        }
        Ok(None)
    }
}

impl<R: BufRead> Iterator for OsmReader<R> {
    type Item = Result<RawElement>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_element().transpose()
    }
}

fn collect_attrs(start: &BytesStart) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in start.attributes().with_checks(false) {
        let attr = attr.context("malformed attribute")?;
        let key = str::from_utf8(attr.key.as_ref())
            .context("attribute name is not UTF-8")?
            .to_string();
        let value = attr
            .unescape_value()
            .context("attribute value cannot be unescaped")?
            .to_string();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn attr_value(start: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in start.attributes().with_checks(false) {
        let attr = attr.context("malformed attribute")?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .context("attribute value cannot be unescaped")?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(xml: &str) -> Vec<RawElement> {
        let mut reader = OsmReader::new(xml.as_bytes());
        let mut elements = Vec::new();
        while let Some(element) = reader.read_element().unwrap() {
            elements.push(element);
        }
        elements
    }

    #[test]
    fn reads_empty_and_paired_forms() {
        let elements = read_all(
            r#"<osm>
                 <node id="1" lat="0.0" lon="0.0" />
                 <node id="2" lat="1.0" lon="1.0">
                   <tag k="amenity" v="cafe"/>
                 </node>
               </osm>"#,
        );
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].attr("id"), Some("1"));
        assert!(elements[0].tags.is_empty());
        assert_eq!(elements[1].attr("id"), Some("2"));
        assert_eq!(
            elements[1].tags,
            vec![("amenity".to_string(), "cafe".to_string())]
        );
    }

    #[test]
    fn way_children_keep_document_order() {
        let elements = read_all(
            r#"<osm>
                 <way id="10" user="alice">
                   <nd ref="100"/>
                   <nd ref="200"/>
                   <nd ref="100"/>
                   <tag k="highway" v="residential"/>
                 </way>
               </osm>"#,
        );
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind, ElementKind::Way);
        assert_eq!(elements[0].node_refs, vec!["100", "200", "100"]);
    }

    #[test]
    fn relations_are_yielded_with_their_kind() {
        let elements = read_all(
            r#"<osm>
                 <relation id="5">
                   <member type="way" ref="10" role="outer"/>
                   <tag k="type" v="multipolygon"/>
                 </relation>
               </osm>"#,
        );
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind, ElementKind::Relation);
    }

    #[test]
    fn attribute_values_are_unescaped() {
        let elements = read_all(
            r#"<osm>
                 <node id="3" user="Shelly&apos;s &amp; Co" lat="0" lon="0"/>
               </osm>"#,
        );
        assert_eq!(elements[0].attr("user"), Some("Shelly's & Co"));
    }

    #[test]
    fn truncated_input_is_an_error() {
        let mut reader = OsmReader::new(r#"<osm><way id="10"><nd ref="1"/>"#.as_bytes());
        let err = loop {
            match reader.read_element() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("expected truncated input to fail"),
                Err(err) => break err,
            }
        };
        assert!(err.to_string().contains("unterminated"));
    }
}
