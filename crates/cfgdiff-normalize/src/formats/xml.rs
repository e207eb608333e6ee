//! XML normalizer.
//!
//! The document is read into a small element tree with `quick-xml`,
//! dropping comments, processing instructions, the declaration and
//! whitespace-only text. Text following an element inside its parent is kept
//! as that element's tail so it moves with the element when siblings are
//! reordered. General entities declared in an internal DTD subset are
//! expanded; external entities are not fetched.

use std::collections::HashMap;

use cfgdiff_types::{FormatId, OrderingMode};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{NormalizeError, NormalizeResult};
use crate::normalizer::{ensure_trailing_newline, Normalizer};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
    tail: Option<String>,
}

/// General entities declared in the internal DTD subset.
#[derive(Debug, Default)]
struct Entities(HashMap<String, String>);

impl Entities {
    /// Record every `<!ENTITY name "value">` in a doctype body. The first
    /// declaration of a name wins; parameter and external entities are skipped.
    fn declare(&mut self, doctype: &str) {
        let mut rest = doctype;
        while let Some(pos) = rest.find("<!ENTITY") {
            rest = &rest[pos + "<!ENTITY".len()..];
            let decl = rest.trim_start();
            if decl.starts_with('%') {
                continue;
            }
            let name_end = decl.find(char::is_whitespace).unwrap_or(decl.len());
            let (name, after) = decl.split_at(name_end);
            let after = after.trim_start();
            let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
                continue;
            };
            let body = &after[1..];
            if let Some(end) = body.find(quote) {
                self.0
                    .entry(name.to_string())
                    .or_insert_with(|| body[..end].to_string());
            }
        }
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl Element {
    fn from_start(start: &BytesStart<'_>, entities: &Entities) -> NormalizeResult<Self> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(NormalizeError::parse)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value_with(|name| entities.resolve(name))
                .map_err(NormalizeError::parse)?;
            attributes.push((key, value.into_owned()));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            ..Self::default()
        })
    }

    fn append_text(&mut self, text: &str) {
        let slot = match self.children.last_mut() {
            Some(child) => &mut child.tail,
            None => &mut self.text,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }

    /// Stable sort of child elements by tag name, at every depth.
    fn sort_children(&mut self) {
        self.children.sort_by(|a, b| a.name.cmp(&b.name));
        for child in &mut self.children {
            child.sort_children();
        }
    }
}

fn parse_tree(input: &str) -> NormalizeResult<Element> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut entities = Entities::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            NormalizeError::Parse(format!("{e} at position {}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(start) => stack.push(Element::from_start(&start, &entities)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start, &entities)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| NormalizeError::parse("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape_with(|name| entities.resolve(name))
                    .map_err(NormalizeError::parse)?;
                if !text.trim().is_empty() {
                    push_text(&mut stack, &text)?;
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                push_text(&mut stack, &text)?;
            }
            Event::DocType(doctype) => entities.declare(&String::from_utf8_lossy(&doctype)),
            Event::Eof => break,
            // Comments, processing instructions and the declaration.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(NormalizeError::Parse(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| NormalizeError::parse("document has no root element"))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> NormalizeResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(NormalizeError::Parse(format!(
                "extra content at the end of the document: <{}>",
                element.name
            )))
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> NormalizeResult<()> {
    let current = stack
        .last_mut()
        .ok_or_else(|| NormalizeError::parse("text outside the root element"))?;
    current.append_text(text);
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> NormalizeResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.text.is_none() && element.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(NormalizeError::parse)?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(NormalizeError::parse)?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(NormalizeError::parse)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
        if let Some(tail) = &child.tail {
            writer
                .write_event(Event::Text(BytesText::new(tail)))
                .map_err(NormalizeError::parse)?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(NormalizeError::parse)?;
    Ok(())
}

/// Normalizer for [`FormatId::Xml`].
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlNormalizer;

impl Normalizer for XmlNormalizer {
    fn format(&self) -> FormatId {
        FormatId::Xml
    }

    fn normalize(&self, input: &str, ordering: OrderingMode) -> NormalizeResult<String> {
        let mut root = parse_tree(input)?;
        if ordering.is_sorted() {
            root.sort_children();
        }

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write_element(&mut writer, &root)?;
        let text = String::from_utf8(writer.into_inner()).map_err(NormalizeError::parse)?;
        Ok(ensure_trailing_newline(text))
    }
}
