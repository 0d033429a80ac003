//! Markup rendering for element trees.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::xdxf::types::element::Element;
use crate::xdxf::types::error::{Result, XdxfError};

/// Renders an element and its subtree as escaped markup.
///
/// The element's own tail is not part of the output; children's tails are.
pub fn to_markup(element: &Element) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, element)?;
    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.text.is_empty() && element.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(render_error)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(render_error)?;
    write_text(writer, &element.text)?;
    for child in &element.children {
        write_element(writer, child)?;
        write_text(writer, &child.tail)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(render_error)?;
    Ok(())
}

fn write_text(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    if !text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(render_error)?;
    }
    Ok(())
}

fn render_error(e: impl std::fmt::Display) -> XdxfError {
    XdxfError::InvalidFormat(format!("Failed to render markup: {}", e))
}
