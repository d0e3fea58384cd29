//! Layout composition: deck snapshot to canvas document.
//!
//! One renderer per layout kind. Placement follows fixed fractional-inch
//! coordinates on the 13.333 x 7.5 canvas; over-long collections are
//! silently truncated to each layout's capacity (two-column 5 per side,
//! timeline 5, process 6, grid 4, comparison 6, data 4).

use crate::common::RGBColor;
use crate::deck::slide::{
    BodyContent, ComparisonContent, DataContent, GridContent, ImageTextContent, ProcessContent,
    QuoteContent, SectionContent, SlideContent, TimelineContent, TitleContent, TwoColumnContent,
};
use crate::deck::{Deck, ResolvedTheme, Theme};
use crate::render::canvas::{
    Align, CanvasDoc, Element, Page, Picture, Shape, ShapeKind, ShapeLabel, TextBox,
};
use crate::render::media;

const WHITE: RGBColor = RGBColor::new(255, 255, 255);
const BLACK: RGBColor = RGBColor::new(0, 0, 0);
/// Subtitle colour over a darkened background image.
const LIGHT: RGBColor = RGBColor::new(240, 240, 240);
const TILE_FILL: RGBColor = RGBColor::new(245, 245, 245);
const PLACEHOLDER_FILL: RGBColor = RGBColor::new(230, 230, 230);
const PLACEHOLDER_TEXT: RGBColor = RGBColor::new(150, 150, 150);

/// Turns deck snapshots into canvas documents, resolving media along
/// the way.
pub struct Composer {
    client: reqwest::Client,
}

impl Composer {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Compose every slide into a page. Media failures degrade the
    /// affected slide; composition itself never fails.
    pub async fn compose(&self, deck: &Deck) -> CanvasDoc {
        log::debug!("composing {} slides of deck {}", deck.slides.len(), deck.id);
        let deck_theme = Theme::default();
        let mut doc = CanvasDoc::new();

        for slide in &deck.slides {
            let theme = ResolvedTheme::resolve(slide.theme(), &deck_theme);
            let mut page = Page::new(theme.background, theme.font_family.clone());

            let resolved = match slide.content.image_url() {
                Some(source) => media::resolve_image(source, &self.client).await,
                None => None,
            };
            let has_image = resolved.is_some();

            match &slide.content {
                SlideContent::ImageText(c) => {
                    let picture = resolved.map(|img| {
                        let height = img.aspect_ratio().map(|a| 5.9 / a).unwrap_or(4.425);
                        let media = doc.add_media(img);
                        Picture {
                            media,
                            x: 0.5,
                            y: 1.5,
                            width: 5.9,
                            height,
                        }
                    });
                    render_image_text(&mut page, c, &theme, picture);
                }
                content => {
                    if let Some(img) = resolved {
                        let media = doc.add_media(img);
                        page.push(Element::Picture(Picture {
                            media,
                            x: 0.0,
                            y: 0.0,
                            width: 13.333,
                            height: 7.5,
                        }));
                    }
                    match content {
                        SlideContent::Title(c) => render_title(&mut page, c, &theme, has_image),
                        SlideContent::Section(c) => render_section(&mut page, c, &theme, has_image),
                        SlideContent::Content(c) => render_content(&mut page, c, &theme),
                        SlideContent::TwoColumn(c) => render_two_column(&mut page, c, &theme),
                        SlideContent::Timeline(c) => render_timeline(&mut page, c, &theme),
                        SlideContent::Process(c) => render_process(&mut page, c, &theme),
                        SlideContent::Grid(c) => render_grid(&mut page, c, &theme),
                        SlideContent::Comparison(c) => render_comparison(&mut page, c, &theme),
                        SlideContent::Data(c) => render_data(&mut page, c, &theme),
                        SlideContent::Quote(c) => render_quote(&mut page, c, &theme),
                        SlideContent::ImageText(_) => unreachable!(),
                    }
                }
            }

            doc.pages.push(page);
        }

        doc
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::too_many_arguments)]
fn text(
    page: &mut Page,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    content: &str,
    size: f64,
    bold: bool,
    color: RGBColor,
    align: Align,
) {
    page.push(Element::Text(TextBox {
        text: content.to_string(),
        x,
        y,
        width,
        height,
        size,
        bold,
        color,
        align,
    }));
}

/// Full-canvas darkening overlay for text over a background image.
fn overlay(page: &mut Page) {
    page.push(Element::Shape(Shape {
        kind: ShapeKind::Rectangle,
        x: 0.0,
        y: 0.0,
        width: 13.333,
        height: 7.5,
        fill: Some(BLACK),
        outline: None,
        transparency: 0.4,
        label: None,
    }));
}

fn render_title(page: &mut Page, c: &TitleContent, t: &ResolvedTheme, has_image: bool) {
    let (title_color, sub_color) = if has_image {
        overlay(page);
        (WHITE, LIGHT)
    } else {
        (t.primary, t.text)
    };

    text(page, 0.5, 2.5, 12.333, 1.5, &c.title, 54.0, true, title_color, Align::Center);
    if let Some(subtitle) = &c.subtitle {
        text(page, 0.5, 4.2, 12.333, 1.0, subtitle, 28.0, false, sub_color, Align::Center);
    }
}

fn render_section(page: &mut Page, c: &SectionContent, t: &ResolvedTheme, has_image: bool) {
    let (title_color, sub_color) = if has_image {
        overlay(page);
        (WHITE, LIGHT)
    } else {
        (t.primary, t.text)
    };

    text(page, 0.5, 2.8, 12.333, 1.5, &c.title, 48.0, true, title_color, Align::Center);
    if let Some(description) = &c.description {
        text(page, 0.5, 4.3, 12.333, 1.0, description, 24.0, false, sub_color, Align::Center);
    }
}

fn render_content(page: &mut Page, c: &BodyContent, t: &ResolvedTheme) {
    text(page, 0.5, 0.4, 12.333, 1.0, &c.title, 40.0, true, t.primary, Align::Left);

    match &c.bullets {
        Some(bullets) if !bullets.is_empty() => {
            let mut y = 1.5;
            for bullet in bullets {
                let line = format!("\u{2022} {bullet}");
                text(page, 0.5, y, 12.333, 0.8, &line, 22.0, false, t.text, Align::Left);
                y += 0.7;
            }
        }
        _ => {
            if let Some(body) = &c.text {
                text(page, 0.5, 1.5, 12.333, 5.5, body, 22.0, false, t.text, Align::Left);
            }
        }
    }
}

fn render_two_column(page: &mut Page, c: &TwoColumnContent, t: &ResolvedTheme) {
    text(page, 0.5, 0.4, 12.333, 1.0, &c.title, 40.0, true, t.primary, Align::Left);

    for (column, x) in [(&c.left, 0.5), (&c.right, 6.9)] {
        if let Some(heading) = &column.title {
            text(page, x, 1.4, 5.9, 0.6, heading, 28.0, true, t.primary, Align::Left);
        }
        let mut y = 2.2;
        for point in column.points.iter().take(5) {
            let line = format!("\u{2022} {point}");
            text(page, x, y, 5.9, 0.6, &line, 20.0, false, t.text, Align::Left);
            y += 0.6;
        }
    }
}

fn render_timeline(page: &mut Page, c: &TimelineContent, t: &ResolvedTheme) {
    text(page, 0.5, 0.4, 12.333, 1.0, &c.title, 40.0, true, t.primary, Align::Left);

    if c.events.is_empty() {
        return;
    }

    let count = c.events.len().min(5);
    let spacing = 12.0 / (count.saturating_sub(1).max(1)) as f64;

    for (i, event) in c.events.iter().take(5).enumerate() {
        let x = 0.5 + i as f64 * spacing;

        page.push(Element::Shape(Shape {
            kind: ShapeKind::Ellipse,
            x: x - 0.15,
            y: 3.85,
            width: 0.3,
            height: 0.3,
            fill: Some(t.primary),
            outline: None,
            transparency: 0.0,
            label: None,
        }));

        text(page, x - 0.8, 4.3, 1.6, 0.5, &event.year, 16.0, true, t.primary, Align::Center);
        text(page, x - 0.8, 4.8, 1.6, 0.6, &event.title, 14.0, true, t.text, Align::Center);
        text(page, x - 0.8, 5.3, 1.6, 1.5, &event.description, 12.0, false, t.text, Align::Center);
    }
}

fn render_process(page: &mut Page, c: &ProcessContent, t: &ResolvedTheme) {
    text(page, 0.5, 0.4, 12.333, 1.0, &c.title, 40.0, true, t.primary, Align::Left);

    if c.steps.is_empty() {
        return;
    }

    let count = c.steps.len().min(6);
    let spacing = 12.0 / count as f64;

    for (i, step) in c.steps.iter().take(6).enumerate() {
        let x = 0.5 + i as f64 * spacing;

        page.push(Element::Shape(Shape {
            kind: ShapeKind::RoundedRectangle,
            x,
            y: 3.0,
            width: spacing - 0.3,
            height: 1.5,
            fill: Some(t.primary),
            outline: None,
            transparency: 0.0,
            label: Some(ShapeLabel {
                text: step.clone(),
                size: 16.0,
                bold: true,
                color: WHITE,
            }),
        }));

        let caption = format!("Step {}", i + 1);
        text(page, x, 2.3, spacing - 0.3, 0.5, &caption, 14.0, false, t.text, Align::Center);

        if i < count - 1 {
            let arrow_x = x + spacing - 0.25;
            text(page, arrow_x, 3.5, 0.2, 0.5, "\u{2192}", 24.0, false, t.primary, Align::Center);
        }
    }
}

fn render_grid(page: &mut Page, c: &GridContent, t: &ResolvedTheme) {
    text(page, 0.5, 0.4, 12.333, 1.0, &c.title, 40.0, true, t.primary, Align::Left);

    const POSITIONS: [(f64, f64); 4] = [(0.5, 1.5), (6.9, 1.5), (0.5, 4.2), (6.9, 4.2)];

    for (item, (x, y)) in c.items.iter().zip(POSITIONS) {
        page.push(Element::Shape(Shape {
            kind: ShapeKind::RoundedRectangle,
            x,
            y,
            width: 5.9,
            height: 2.5,
            fill: Some(TILE_FILL),
            outline: Some(t.primary),
            transparency: 0.0,
            label: None,
        }));

        text(page, x + 0.2, y + 0.2, 5.5, 0.6, &item.title, 24.0, true, t.primary, Align::Left);
        text(page, x + 0.2, y + 0.9, 5.5, 1.5, &item.description, 16.0, false, t.text, Align::Left);
    }
}

fn render_comparison(page: &mut Page, c: &ComparisonContent, t: &ResolvedTheme) {
    text(page, 0.5, 0.4, 12.333, 1.0, &c.title, 40.0, true, t.primary, Align::Left);

    if c.items.is_empty() {
        return;
    }

    const COLUMN_WIDTHS: [f64; 3] = [4.0, 4.1, 4.1];

    let mut x = 0.5;
    for (header, width) in ["Item", "Option A", "Option B"].into_iter().zip(COLUMN_WIDTHS) {
        text(page, x, 1.5, width, 0.6, header, 20.0, true, t.primary, Align::Left);
        x += width;
    }

    // Header rule
    page.push(Element::Shape(Shape {
        kind: ShapeKind::Rectangle,
        x: 0.5,
        y: 2.1,
        width: 12.333,
        height: 0.02,
        fill: Some(t.primary),
        outline: None,
        transparency: 0.0,
        label: None,
    }));

    let mut y = 2.3;
    for row in c.items.iter().take(6) {
        let mut x = 0.5;
        for (value, width) in [&row.name, &row.value_a, &row.value_b].into_iter().zip(COLUMN_WIDTHS) {
            text(page, x, y, width, 0.5, value, 18.0, false, t.text, Align::Left);
            x += width;
        }
        y += 0.6;
    }
}

fn render_data(page: &mut Page, c: &DataContent, t: &ResolvedTheme) {
    text(page, 0.5, 0.4, 12.333, 1.0, &c.title, 40.0, true, t.primary, Align::Left);

    if c.stats.is_empty() {
        return;
    }

    let count = c.stats.len().min(4);
    let spacing = 12.333 / count as f64;

    for (i, stat) in c.stats.iter().take(4).enumerate() {
        let x = 0.5 + i as f64 * spacing;
        text(page, x, 2.5, spacing, 1.5, &stat.value, 60.0, true, t.primary, Align::Center);
        text(page, x, 4.2, spacing, 0.8, &stat.label, 20.0, false, t.text, Align::Center);
    }
}

fn render_quote(page: &mut Page, c: &QuoteContent, t: &ResolvedTheme) {
    text(page, 0.5, 1.5, 1.0, 1.0, "\u{201c}", 120.0, false, t.primary, Align::Center);
    text(page, 1.5, 2.0, 10.333, 2.5, &c.quote, 32.0, false, t.text, Align::Center);

    if let Some(author) = &c.author {
        let line = format!("- {author}");
        text(page, 0.5, 4.8, 12.333, 0.8, &line, 24.0, false, t.primary, Align::Center);
    }
    if let Some(title) = &c.title {
        text(page, 0.5, 5.5, 12.333, 0.6, title, 18.0, false, t.text, Align::Center);
    }
}

fn render_image_text(
    page: &mut Page,
    c: &ImageTextContent,
    t: &ResolvedTheme,
    picture: Option<Picture>,
) {
    text(page, 0.5, 0.4, 12.333, 1.0, &c.title, 40.0, true, t.primary, Align::Left);

    match picture {
        Some(picture) => page.push(Element::Picture(picture)),
        None => {
            page.push(Element::Shape(Shape {
                kind: ShapeKind::RoundedRectangle,
                x: 0.5,
                y: 1.5,
                width: 5.9,
                height: 5.5,
                fill: Some(PLACEHOLDER_FILL),
                outline: Some(t.primary),
                transparency: 0.0,
                label: Some(ShapeLabel {
                    text: "[Image Placeholder]".to_string(),
                    size: 18.0,
                    bold: false,
                    color: PLACEHOLDER_TEXT,
                }),
            }));
        }
    }

    text(page, 6.9, 1.5, 5.9, 5.5, &c.text, 22.0, false, t.text, Align::Left);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Slide;
    use crate::deck::slide::{ColumnContent, ComparisonRow, GridItem, Stat, TimelineEvent};

    fn compose_one(content: SlideContent) -> CanvasDoc {
        let mut deck = Deck::new("o", None);
        deck.slides = vec![Slide::draft(content)];
        let composer = Composer::new();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(composer.compose(&deck))
    }

    fn shapes(page: &Page) -> Vec<&Shape> {
        page.elements
            .iter()
            .filter_map(|e| match e {
                Element::Shape(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_timeline_caps_at_five_markers() {
        let events = (0..7)
            .map(|i| TimelineEvent {
                year: format!("20{i:02}"),
                title: format!("e{i}"),
                description: String::new(),
            })
            .collect();
        let doc = compose_one(SlideContent::Timeline(TimelineContent {
            title: "History".into(),
            events,
        }));

        let markers = shapes(&doc.pages[0])
            .iter()
            .filter(|s| s.kind == ShapeKind::Ellipse)
            .count();
        assert_eq!(markers, 5);
    }

    #[test]
    fn test_title_without_image_uses_theme_colors() {
        let doc = compose_one(SlideContent::Title(TitleContent {
            title: "T".into(),
            subtitle: Some("S".into()),
            image_url: None,
        }));

        let page = &doc.pages[0];
        assert!(doc.media.is_empty());
        assert!(shapes(page).is_empty());
        match &page.elements[0] {
            Element::Text(t) => {
                assert_eq!(t.size, 54.0);
                assert!(t.bold);
                assert_eq!(t.color, RGBColor::from_hex("#1a365d").unwrap());
            }
            _ => panic!("expected title text first"),
        }
        assert_eq!(page.background, WHITE);
    }

    #[test]
    fn test_title_with_inline_image_gets_overlay_and_white_text() {
        // 1x1 PNG data URI
        let uri = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
        let doc = compose_one(SlideContent::Title(TitleContent {
            title: "T".into(),
            subtitle: None,
            image_url: Some(uri.into()),
        }));

        let page = &doc.pages[0];
        assert_eq!(doc.media.len(), 1);
        let overlay = shapes(page)
            .into_iter()
            .find(|s| s.transparency > 0.0)
            .expect("overlay present");
        assert_eq!(overlay.fill, Some(BLACK));
        let title = page
            .elements
            .iter()
            .find_map(|e| match e {
                Element::Text(t) => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(title.color, WHITE);
    }

    #[test]
    fn test_image_text_failure_degrades_to_placeholder() {
        let doc = compose_one(SlideContent::ImageText(ImageTextContent {
            title: "T".into(),
            text: "body".into(),
            image_url: Some("not-a-real-source".into()),
        }));

        let page = &doc.pages[0];
        assert!(doc.media.is_empty());
        let placeholder = shapes(page)
            .into_iter()
            .find(|s| s.label.as_ref().is_some_and(|l| l.text == "[Image Placeholder]"))
            .expect("placeholder present");
        assert_eq!(placeholder.fill, Some(PLACEHOLDER_FILL));
    }

    #[test]
    fn test_bullets_step_down_the_page() {
        let doc = compose_one(SlideContent::Content(BodyContent {
            title: "T".into(),
            bullets: Some(vec!["a".into(), "b".into(), "c".into()]),
            text: None,
        }));

        let ys: Vec<f64> = doc.pages[0]
            .elements
            .iter()
            .skip(1)
            .filter_map(|e| match e {
                Element::Text(t) => Some(t.y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![1.5, 2.2, 2.9]);
    }

    #[test]
    fn test_data_truncates_to_four_stats() {
        let stats = (0..6)
            .map(|i| Stat {
                value: format!("{i}"),
                label: format!("l{i}"),
            })
            .collect();
        let doc = compose_one(SlideContent::Data(DataContent {
            title: "T".into(),
            stats,
        }));

        // Title + 4 value/label pairs
        assert_eq!(doc.pages[0].text_count(), 1 + 8);
    }

    #[test]
    fn test_two_column_caps_at_five_points_per_side() {
        let points: Vec<String> = (0..7).map(|i| format!("p{i}")).collect();
        let doc = compose_one(SlideContent::TwoColumn(TwoColumnContent {
            title: "T".into(),
            left: ColumnContent {
                title: None,
                points: points.clone(),
            },
            right: ColumnContent {
                title: None,
                points,
            },
        }));

        // Title + 5 points per column
        assert_eq!(doc.pages[0].text_count(), 1 + 5 + 5);
    }

    #[test]
    fn test_grid_caps_at_four_tiles() {
        let items = (0..6)
            .map(|i| GridItem {
                title: format!("g{i}"),
                description: format!("d{i}"),
            })
            .collect();
        let doc = compose_one(SlideContent::Grid(GridContent {
            title: "T".into(),
            items,
        }));

        let page = &doc.pages[0];
        let tiles = shapes(page)
            .iter()
            .filter(|s| s.kind == ShapeKind::RoundedRectangle)
            .count();
        assert_eq!(tiles, 4);
        // Title + title/description per tile
        assert_eq!(page.text_count(), 1 + 4 * 2);
    }

    #[test]
    fn test_comparison_caps_at_six_rows() {
        let items = (0..8)
            .map(|i| ComparisonRow {
                name: format!("r{i}"),
                value_a: format!("a{i}"),
                value_b: format!("b{i}"),
            })
            .collect();
        let doc = compose_one(SlideContent::Comparison(ComparisonContent {
            title: "T".into(),
            items,
        }));

        // Title + 3 headers + 6 rows of 3 cells
        assert_eq!(doc.pages[0].text_count(), 1 + 3 + 6 * 3);
    }

    #[test]
    fn test_process_draws_connectors_between_boxes() {
        let doc = compose_one(SlideContent::Process(ProcessContent {
            title: "T".into(),
            steps: vec!["a".into(), "b".into(), "c".into()],
        }));

        let page = &doc.pages[0];
        let boxes = shapes(page)
            .iter()
            .filter(|s| s.kind == ShapeKind::RoundedRectangle)
            .count();
        let arrows = page
            .elements
            .iter()
            .filter(|e| matches!(e, Element::Text(t) if t.text == "\u{2192}"))
            .count();
        assert_eq!(boxes, 3);
        assert_eq!(arrows, 2);
    }

    #[test]
    fn test_theme_shorthand_hex_propagates() {
        let mut deck = Deck::new("o", None);
        let mut slide = Slide::draft(SlideContent::Section(SectionContent {
            title: "S".into(),
            description: None,
            image_url: None,
        }));
        slide.style = Some(crate::deck::slide::SlideStyle {
            theme: Some(Theme {
                primary_color: Some("#c30".into()),
                ..Default::default()
            }),
            ..Default::default()
        });
        deck.slides = vec![slide];

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let doc = rt.block_on(Composer::new().compose(&deck));
        match &doc.pages[0].elements[0] {
            Element::Text(t) => assert_eq!(t.color, RGBColor::new(0xCC, 0x33, 0x00)),
            _ => panic!("expected section title"),
        }
    }
}
