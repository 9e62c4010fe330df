use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use super::layout::{Point, Rect, Rgb, spacing};
use super::metrics;
use crate::core::InvoiceError;

/// Face and size of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub bold: bool,
    pub size: f32,
}

impl Font {
    pub const fn regular(size: f32) -> Self {
        Self { bold: false, size }
    }

    pub const fn bold(size: f32) -> Self {
        Self { bold: true, size }
    }

    /// Height of one line of text including descender and leading.
    pub fn line_height(&self) -> f32 {
        self.size * (metrics::ASCENT + metrics::DESCENT) / 1000.0 + self.size * 0.2
    }
}

/// Drawing surface the invoice composer paints on.
///
/// Coordinates are top-left based, relative to the printable area.
pub trait Canvas {
    /// Width and height of the printable area.
    fn size(&self) -> (f32, f32);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, line_width: f32);

    fn dashed_line(&mut self, from: Point, to: Point, color: Rgb, dash: [f32; 2]);

    /// Draw single-line text with its top-left corner at `at` and return
    /// the bounds it occupies.
    fn draw_text(&mut self, text: &str, at: Point, font: Font, color: Rgb) -> Rect;

    fn text_width(&self, text: &str, font: Font) -> f32;

    /// Bounds `text` would occupy at `at`, without drawing.
    fn measure(&self, text: &str, at: Point, font: Font) -> Rect {
        Rect::new(at.x, at.y, self.text_width(text, font), font.line_height())
    }
}

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// [`Canvas`] that records PDF content-stream operations for one page
/// using the standard Helvetica faces.
pub struct LopdfCanvas {
    page_width: f32,
    page_height: f32,
    margin: f32,
    operations: Vec<Operation>,
}

impl Default for LopdfCanvas {
    fn default() -> Self {
        Self::new(spacing::PAGE_WIDTH, spacing::PAGE_HEIGHT, spacing::PAGE_MARGIN)
    }
}

impl LopdfCanvas {
    pub fn new(page_width: f32, page_height: f32, margin: f32) -> Self {
        Self {
            page_width,
            page_height,
            margin,
            operations: Vec::new(),
        }
    }

    /// Operations recorded so far.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    fn pdf_x(&self, x: f32) -> f32 {
        self.margin + x
    }

    /// Flip a top-based y coordinate into PDF space.
    fn pdf_y(&self, y: f32) -> f32 {
        self.page_height - self.margin - y
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn set_fill(&mut self, color: Rgb) {
        let [r, g, b] = color.to_unit();
        self.push("rg", vec![r.into(), g.into(), b.into()]);
    }

    fn set_stroke(&mut self, color: Rgb) {
        let [r, g, b] = color.to_unit();
        self.push("RG", vec![r.into(), g.into(), b.into()]);
    }

    /// Assemble a single-page document from the recorded operations.
    pub fn into_document(self, title: &str) -> Result<Document, InvoiceError> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
        });

        let content = Content {
            operations: self.operations,
        };
        let encoded = content
            .encode()
            .map_err(|e| InvoiceError::Pdf(format!("failed to encode page content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), self.page_width.into(), self.page_height.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let now = Utc::now().format("D:%Y%m%d%H%M%S+00'00'").to_string();
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal(concat!("zugferd-invoice ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(now.clone()),
            "ModDate" => Object::string_literal(now),
        });
        doc.trailer.set("Info", info_id);

        Ok(doc)
    }
}

impl Canvas for LopdfCanvas {
    fn size(&self) -> (f32, f32) {
        (
            self.page_width - 2.0 * self.margin,
            self.page_height - 2.0 * self.margin,
        )
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.set_fill(color);
        let (x, y) = (self.pdf_x(rect.x), self.pdf_y(rect.bottom()));
        self.push("re", vec![x.into(), y.into(), rect.width.into(), rect.height.into()]);
        self.push("f", vec![]);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, line_width: f32) {
        self.set_stroke(color);
        self.push("w", vec![line_width.into()]);
        let (x, y) = (self.pdf_x(rect.x), self.pdf_y(rect.bottom()));
        self.push("re", vec![x.into(), y.into(), rect.width.into(), rect.height.into()]);
        self.push("S", vec![]);
    }

    fn dashed_line(&mut self, from: Point, to: Point, color: Rgb, dash: [f32; 2]) {
        self.set_stroke(color);
        self.push("w", vec![1.0f32.into()]);
        self.push(
            "d",
            vec![Object::Array(vec![dash[0].into(), dash[1].into()]), 0.into()],
        );
        let (x1, y1) = (self.pdf_x(from.x), self.pdf_y(from.y));
        let (x2, y2) = (self.pdf_x(to.x), self.pdf_y(to.y));
        self.push("m", vec![x1.into(), y1.into()]);
        self.push("l", vec![x2.into(), y2.into()]);
        self.push("S", vec![]);
        // Back to solid strokes.
        self.push("d", vec![Object::Array(vec![]), 0.into()]);
    }

    fn draw_text(&mut self, text: &str, at: Point, font: Font, color: Rgb) -> Rect {
        let bounds = self.measure(text, at, font);
        let baseline = at.y + font.size * 0.1 + font.size * metrics::ASCENT / 1000.0;
        let face = if font.bold { BOLD_FONT } else { REGULAR_FONT };
        let (x, y) = (self.pdf_x(at.x), self.pdf_y(baseline));

        self.set_fill(color);
        self.push("BT", vec![]);
        self.push("Tf", vec![Object::Name(face.as_bytes().to_vec()), font.size.into()]);
        self.push("Td", vec![x.into(), y.into()]);
        self.push(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
        bounds
    }

    fn text_width(&self, text: &str, font: Font) -> f32 {
        metrics::text_width(text, font.bold, font.size)
    }
}

/// WinAnsiEncoding code points 0x80..=0x9F; the rest of the encoding
/// matches Latin-1.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// Encode text for the WinAnsi Helvetica faces; unmappable characters,
/// including the C1 controls U+0080..=U+009F, become `?`.
fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c as u32 {
            0x00..=0x7F | 0xA0..=0xFF => c as u8,
            _ => WIN_ANSI_HIGH
                .iter()
                .find(|(ch, _)| *ch == c)
                .map_or(b'?', |(_, code)| *code),
        })
        .collect()
}
