//! Slide part generation: one canvas page to one `p:sld` XML document.
//!
//! XML is appended with `write!` into a pre-allocated `String`; all user
//! text flows through `escape_xml`.

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

use crate::common::Result;
use crate::common::unit::{inches_to_emu, pt_to_centipoint};
use crate::common::xml::escape_xml;
use crate::render::canvas::{Align, Element, Page, Picture, Shape, ShapeKind, TextBox};

/// Generate the slide XML for one page.
///
/// `image_rels` maps document media indices to this slide's relationship
/// ids; every picture on the page must have an entry.
pub(crate) fn slide_xml(page: &Page, image_rels: &HashMap<usize, String>) -> Result<String> {
    let mut xml = String::with_capacity(4096);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);
    xml.push_str("<p:cSld>");

    // Background fill
    xml.push_str("<p:bg><p:bgPr><a:solidFill>");
    write!(xml, r#"<a:srgbClr val="{}"/>"#, page.background.to_hex())?;
    xml.push_str("</a:solidFill><a:effectLst/></p:bgPr></p:bg>");

    xml.push_str("<p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    // Shape ids start at 2; id 1 is the group shape
    let mut shape_id: u32 = 2;
    for element in &page.elements {
        match element {
            Element::Text(text) => write_text_box(&mut xml, shape_id, text, page.font.as_deref())?,
            Element::Shape(shape) => write_shape(&mut xml, shape_id, shape, page.font.as_deref())?,
            Element::Picture(picture) => {
                let rid = image_rels
                    .get(&picture.media)
                    .map(|s| s.as_str())
                    .unwrap_or("rIdImagePlaceholder");
                write_picture(&mut xml, shape_id, picture, rid)?;
            }
        }
        shape_id += 1;
    }

    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");

    Ok(xml)
}

fn write_xfrm(xml: &mut String, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, inches_to_emu(x), inches_to_emu(y))?;
    write!(
        xml,
        r#"<a:ext cx="{}" cy="{}"/>"#,
        inches_to_emu(width),
        inches_to_emu(height)
    )?;
    xml.push_str("</a:xfrm>");
    Ok(())
}

fn write_run_props(
    xml: &mut String,
    size: f64,
    bold: bool,
    color: &str,
    font: Option<&str>,
) -> Result<()> {
    write!(xml, r#"<a:rPr lang="en-US" dirty="0" sz="{}""#, pt_to_centipoint(size))?;
    if bold {
        xml.push_str(r#" b="1""#);
    }
    xml.push('>');
    write!(xml, r#"<a:solidFill><a:srgbClr val="{color}"/></a:solidFill>"#)?;
    if let Some(font) = font {
        write!(xml, r#"<a:latin typeface="{}"/>"#, escape_xml(font))?;
    }
    xml.push_str("</a:rPr>");
    Ok(())
}

fn write_text_box(xml: &mut String, id: u32, text: &TextBox, font: Option<&str>) -> Result<()> {
    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    write!(xml, r#"<p:cNvPr id="{id}" name="Text Box {id}"/>"#)?;
    xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvSpPr>");

    xml.push_str("<p:spPr>");
    write_xfrm(xml, text.x, text.y, text.width, text.height)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");

    xml.push_str("<p:txBody>");
    xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"/>"#);
    xml.push_str("<a:lstStyle/>");
    xml.push_str("<a:p>");
    if text.align == Align::Center {
        xml.push_str(r#"<a:pPr algn="ctr"/>"#);
    }
    xml.push_str("<a:r>");
    write_run_props(xml, text.size, text.bold, &text.color.to_hex(), font)?;
    write!(xml, "<a:t>{}</a:t>", escape_xml(&text.text))?;
    xml.push_str("</a:r>");
    xml.push_str("</a:p>");
    xml.push_str("</p:txBody>");

    xml.push_str("</p:sp>");
    Ok(())
}

fn write_shape(xml: &mut String, id: u32, shape: &Shape, font: Option<&str>) -> Result<()> {
    let prst = match shape.kind {
        ShapeKind::Rectangle => "rect",
        ShapeKind::RoundedRectangle => "roundRect",
        ShapeKind::Ellipse => "ellipse",
    };

    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    write!(xml, r#"<p:cNvPr id="{id}" name="Shape {id}"/>"#)?;
    xml.push_str("<p:cNvSpPr/>");
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvSpPr>");

    xml.push_str("<p:spPr>");
    write_xfrm(xml, shape.x, shape.y, shape.width, shape.height)?;
    write!(xml, r#"<a:prstGeom prst="{prst}"><a:avLst/></a:prstGeom>"#)?;

    if let Some(fill) = &shape.fill {
        xml.push_str("<a:solidFill>");
        if shape.transparency > 0.0 {
            let alpha = ((1.0 - shape.transparency) * 100_000.0).round() as u32;
            write!(
                xml,
                r#"<a:srgbClr val="{}"><a:alpha val="{alpha}"/></a:srgbClr>"#,
                fill.to_hex()
            )?;
        } else {
            write!(xml, r#"<a:srgbClr val="{}"/>"#, fill.to_hex())?;
        }
        xml.push_str("</a:solidFill>");
    }

    match &shape.outline {
        Some(outline) => {
            write!(
                xml,
                r#"<a:ln><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:ln>"#,
                outline.to_hex()
            )?;
        }
        None => xml.push_str("<a:ln><a:noFill/></a:ln>"),
    }

    xml.push_str("</p:spPr>");

    if let Some(label) = &shape.label {
        xml.push_str("<p:txBody>");
        xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0" anchor="ctr"/>"#);
        xml.push_str("<a:lstStyle/>");
        xml.push_str("<a:p>");
        xml.push_str(r#"<a:pPr algn="ctr"/>"#);
        xml.push_str("<a:r>");
        write_run_props(xml, label.size, label.bold, &label.color.to_hex(), font)?;
        write!(xml, "<a:t>{}</a:t>", escape_xml(&label.text))?;
        xml.push_str("</a:r>");
        xml.push_str("</a:p>");
        xml.push_str("</p:txBody>");
    }

    xml.push_str("</p:sp>");
    Ok(())
}

fn write_picture(xml: &mut String, id: u32, picture: &Picture, rid: &str) -> Result<()> {
    xml.push_str("<p:pic>");
    xml.push_str("<p:nvPicPr>");
    write!(xml, r#"<p:cNvPr id="{id}" name="Picture {id}"/>"#)?;
    xml.push_str("<p:cNvPicPr/>");
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvPicPr>");

    xml.push_str("<p:blipFill>");
    write!(xml, r#"<a:blip r:embed="{rid}"/>"#)?;
    xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
    xml.push_str("</p:blipFill>");

    xml.push_str("<p:spPr>");
    write_xfrm(xml, picture.x, picture.y, picture.width, picture.height)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");
    xml.push_str("</p:pic>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RGBColor;
    use crate::render::canvas::ShapeLabel;

    fn empty_rels() -> HashMap<usize, String> {
        HashMap::new()
    }

    #[test]
    fn test_slide_xml_has_background_and_tree() {
        let page = Page::new(RGBColor::new(0xFF, 0xFF, 0xFF), None);
        let xml = slide_xml(&page, &empty_rels()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0""#));
        assert!(xml.contains(r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="FFFFFF"/>"#));
        assert!(xml.contains("<p:spTree>"));
        assert!(xml.ends_with("</p:sld>"));
    }

    #[test]
    fn test_text_box_escapes_and_positions() {
        let mut page = Page::new(RGBColor::new(255, 255, 255), Some("Inter".into()));
        page.push(Element::Text(TextBox {
            text: "A < B & C".into(),
            x: 0.5,
            y: 0.4,
            width: 12.333,
            height: 1.0,
            size: 40.0,
            bold: true,
            color: RGBColor::new(0x1A, 0x36, 0x5D),
            align: Align::Left,
        }));
        let xml = slide_xml(&page, &empty_rels()).unwrap();
        assert!(xml.contains("<a:t>A &lt; B &amp; C</a:t>"));
        assert!(xml.contains(r#"<a:off x="457200" y="365760"/>"#));
        assert!(xml.contains(r#"sz="4000" b="1""#));
        assert!(xml.contains(r#"<a:srgbClr val="1A365D"/>"#));
        assert!(xml.contains(r#"<a:latin typeface="Inter"/>"#));
        assert!(!xml.contains(r#"algn="ctr""#));
    }

    #[test]
    fn test_overlay_shape_carries_alpha() {
        let mut page = Page::new(RGBColor::new(255, 255, 255), None);
        page.push(Element::Shape(Shape {
            kind: ShapeKind::Rectangle,
            x: 0.0,
            y: 0.0,
            width: 13.333,
            height: 7.5,
            fill: Some(RGBColor::new(0, 0, 0)),
            outline: None,
            transparency: 0.4,
            label: None,
        }));
        let xml = slide_xml(&page, &empty_rels()).unwrap();
        assert!(xml.contains(r#"<a:srgbClr val="000000"><a:alpha val="60000"/></a:srgbClr>"#));
        assert!(xml.contains("<a:ln><a:noFill/></a:ln>"));
    }

    #[test]
    fn test_labelled_shape_centres_text() {
        let mut page = Page::new(RGBColor::new(255, 255, 255), None);
        page.push(Element::Shape(Shape {
            kind: ShapeKind::RoundedRectangle,
            x: 0.5,
            y: 3.0,
            width: 3.7,
            height: 1.5,
            fill: Some(RGBColor::new(0x1A, 0x36, 0x5D)),
            outline: None,
            transparency: 0.0,
            label: Some(ShapeLabel {
                text: "Plan".into(),
                size: 16.0,
                bold: true,
                color: RGBColor::new(255, 255, 255),
            }),
        }));
        let xml = slide_xml(&page, &empty_rels()).unwrap();
        assert!(xml.contains(r#"prst="roundRect""#));
        assert!(xml.contains(r#"anchor="ctr""#));
        assert!(xml.contains("<a:t>Plan</a:t>"));
    }

    #[test]
    fn test_picture_references_relationship() {
        let mut page = Page::new(RGBColor::new(255, 255, 255), None);
        page.push(Element::Picture(Picture {
            media: 0,
            x: 0.0,
            y: 0.0,
            width: 13.333,
            height: 7.5,
        }));
        let mut rels = HashMap::new();
        rels.insert(0, "rId2".to_string());
        let xml = slide_xml(&page, &rels).unwrap();
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
    }
}
