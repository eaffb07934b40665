// XML codec for dashboard definitions
use crate::domain::dashboard::{DashboardDocument, Element, Node, PANEL_TAG, ROW_TAG};
use anyhow::{Context, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;

/// Matches self-closing `<panel .../>` and `<row .../>` tags.
static SELF_CLOSING_MARKER_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"<({PANEL_TAG}|{ROW_TAG})(\s[^<>]*?)??\s*/>"))
        .expect("self-closing tag pattern is valid")
});

/// Parse a dashboard definition, keeping comments, whitespace and other
/// markup so untouched parts of the file are written back unchanged.
pub fn parse_dashboard(source: &str) -> Result<DashboardDocument> {
    let mut reader = Reader::from_str(source);

    let mut declaration = None;
    let mut prolog = Vec::new();
    let mut root: Option<Element> = None;
    let mut epilog = Vec::new();
    let mut open: Vec<Element> = Vec::new();

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .with_context(|| format!("Malformed dashboard XML near byte {}", position))?;

        let node = match event {
            Event::Eof => break,
            Event::Start(start) => {
                open.push(element_from_start(&start)?);
                continue;
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .context("Closing tag without matching opening tag")?;
                Node::Element(element)
            }
            Event::Empty(start) => Node::Element(element_from_start(&start)?),
            Event::Decl(decl) => {
                declaration = Some(utf8(&decl)?.to_string());
                continue;
            }
            Event::Text(text) => Node::Text(utf8(&text)?.to_string()),
            Event::CData(cdata) => Node::CData(utf8(&cdata)?.to_string()),
            Event::Comment(comment) => Node::Comment(utf8(&comment)?.to_string()),
            Event::PI(pi) => Node::ProcessingInstruction(utf8(&pi)?.to_string()),
            Event::DocType(doctype) => Node::DocType(utf8(&doctype)?.to_string()),
        };

        if let Some(parent) = open.last_mut() {
            parent.children.push(node);
            continue;
        }
        match (node, root.is_some()) {
            (Node::Element(element), false) => root = Some(element),
            (Node::Element(element), true) => {
                anyhow::bail!("Unexpected second root element <{}>", element.name)
            }
            (other, false) => prolog.push(other),
            (other, true) => epilog.push(other),
        }
    }

    if let Some(unclosed) = open.last() {
        anyhow::bail!("Unclosed element <{}>", unclosed.name);
    }
    let root = root.context("Dashboard XML has no root element")?;

    let mut document = DashboardDocument::new(root);
    document.declaration = declaration;
    document.prolog = prolog;
    document.epilog = epilog;
    Ok(document)
}

/// Serialize a dashboard. The declaration is written only when the source
/// file had one, and marker tags never come out self-closing.
pub fn render_dashboard(document: &DashboardDocument) -> String {
    let mut out = String::new();
    if let Some(declaration) = &document.declaration {
        out.push_str("<?");
        out.push_str(declaration);
        out.push_str("?>");
    }
    for node in &document.prolog {
        write_node(&mut out, node);
    }
    write_element(&mut out, &document.root);
    for node in &document.epilog {
        write_node(&mut out, node);
    }
    expand_self_closing_markers(&out)
}

/// Rewrite `<panel .../>` and `<row .../>` as explicit open/close pairs;
/// the host's dashboard loader does not accept the self-closing form.
pub fn expand_self_closing_markers(xml: &str) -> String {
    SELF_CLOSING_MARKER_TAG
        .replace_all(xml, "<${1}${2}></${1}>")
        .into_owned()
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(utf8(start.name().as_ref())?);
    for attribute in start.attributes() {
        let attribute = attribute.context("Malformed attribute")?;
        let key = utf8(attribute.key.as_ref())?.to_string();
        let value = attribute
            .unescape_value()
            .with_context(|| format!("Bad value for attribute {}", key))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).context("Dashboard XML is not valid UTF-8")
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(element) => write_element(out, element),
        Node::Text(text) => out.push_str(text),
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::ProcessingInstruction(pi) => {
            out.push_str("<?");
            out.push_str(pi);
            out.push_str("?>");
        }
        Node::DocType(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push('>');
        }
    }
}

/// Whitespace other than a plain space is written as a character reference;
/// a literal newline, carriage return or tab would be normalized to a space
/// when the file is read back.
fn write_attribute_value(out: &mut String, value: &str) {
    for ch in escape(value).chars() {
        match ch {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            other => out.push(other),
        }
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        write_attribute_value(out, value);
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}
