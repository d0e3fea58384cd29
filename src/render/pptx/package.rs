//! OPC package assembly: canvas document to PPTX bytes.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::common::Result;
use crate::render::canvas::{CanvasDoc, Element};
use crate::render::pptx::{template, xml};

/// Write the full package into an in-memory zip archive.
pub fn write_package(doc: &CanvasDoc) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut part = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, data: &[u8]| -> Result<()> {
        zip.start_file(name, options)?;
        zip.write_all(data)?;
        Ok(())
    };

    part(&mut zip, "[Content_Types].xml", template::content_types(doc)?.as_bytes())?;
    part(&mut zip, "_rels/.rels", template::ROOT_RELS.as_bytes())?;
    part(&mut zip, "ppt/presentation.xml", template::presentation(doc.pages.len())?.as_bytes())?;
    part(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        template::presentation_rels(doc.pages.len())?.as_bytes(),
    )?;
    part(&mut zip, "ppt/slideMasters/slideMaster1.xml", template::SLIDE_MASTER.as_bytes())?;
    part(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        template::MASTER_RELS.as_bytes(),
    )?;
    part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", template::SLIDE_LAYOUT.as_bytes())?;
    part(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        template::LAYOUT_RELS.as_bytes(),
    )?;
    part(&mut zip, "ppt/theme/theme1.xml", template::THEME.as_bytes())?;

    for (index, page) in doc.pages.iter().enumerate() {
        let n = index + 1;

        // rId1 is the layout; image relationships follow
        let mut image_rels: HashMap<usize, String> = HashMap::new();
        let mut rel_entries: Vec<(String, String)> = Vec::new();
        for element in &page.elements {
            if let Element::Picture(picture) = element {
                if !image_rels.contains_key(&picture.media) {
                    let rid = format!("rId{}", 2 + rel_entries.len());
                    let ext = doc.media[picture.media].format.extension();
                    let target = format!("../media/image{}.{ext}", picture.media + 1);
                    rel_entries.push((rid.clone(), target));
                    image_rels.insert(picture.media, rid);
                }
            }
        }

        part(
            &mut zip,
            &format!("ppt/slides/slide{n}.xml"),
            xml::slide_xml(page, &image_rels)?.as_bytes(),
        )?;
        part(
            &mut zip,
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            template::slide_rels(&rel_entries)?.as_bytes(),
        )?;
    }

    for (index, asset) in doc.media.iter().enumerate() {
        part(
            &mut zip,
            &format!("ppt/media/image{}.{}", index + 1, asset.format.extension()),
            &asset.data,
        )?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RGBColor;
    use crate::render::canvas::{MediaAsset, Page, Picture};
    use crate::render::media::ImageFormat;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut buf = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_package_contains_required_parts() {
        let mut doc = CanvasDoc::new();
        doc.pages.push(Page::new(RGBColor::new(255, 255, 255), None));
        doc.pages.push(Page::new(RGBColor::new(0, 0, 0), None));

        let bytes = write_package(&doc).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {name}");
        }

        let presentation = read_entry(&mut archive, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 2);
    }

    #[test]
    fn test_embedded_image_gets_media_part_and_rel() {
        let mut doc = CanvasDoc::new();
        let mut page = Page::new(RGBColor::new(255, 255, 255), None);
        doc.media.push(MediaAsset {
            data: vec![0x89, 0x50, 0x4E, 0x47],
            format: ImageFormat::Png,
        });
        page.push(Element::Picture(Picture {
            media: 0,
            x: 0.0,
            y: 0.0,
            width: 13.333,
            height: 7.5,
        }));
        doc.pages.push(page);

        let bytes = write_package(&doc).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        assert!(archive.by_name("ppt/media/image1.png").is_ok());
        let rels = read_entry(&mut archive, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains("../media/image1.png"));
        let slide = read_entry(&mut archive, "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"r:embed="rId2""#));
        let types = read_entry(&mut archive, "[Content_Types].xml");
        assert!(types.contains(r#"Extension="png""#));
    }
}
