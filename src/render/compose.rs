use lopdf::Document;
use rust_decimal::Decimal;

use super::canvas::{Canvas, Font, LopdfCanvas};
use super::layout::{Point, Rect, Rgb, spacing::*};
use crate::core::{CurrencyCode, Invoice, InvoiceError, Party};

/// Colors, fonts and texts of the rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageStyle {
    pub border: Rgb,
    pub header_fill: Rgb,
    pub amount_fill: Rgb,
    /// Fill of every other table row.
    pub band_fill: Rgb,
    pub inverse_text: Rgb,
    pub body_text: Rgb,
    pub header_font: Font,
    pub regular_font: Font,
    pub bold_font: Font,
    /// chrono format string for the issue date.
    pub date_format: String,
    /// Extra line printed under the seller address.
    pub footer_note: Option<String>,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            border: Rgb::new(142, 170, 219),
            header_fill: Rgb::new(91, 126, 215),
            amount_fill: Rgb::new(65, 104, 209),
            band_fill: Rgb::new(222, 231, 247),
            inverse_text: Rgb::WHITE,
            body_text: Rgb::BLACK,
            header_font: Font::regular(30.0),
            regular_font: Font::regular(9.0),
            bold_font: Font::bold(11.0),
            date_format: "%A %d, %B %Y".to_string(),
            footer_note: None,
        }
    }
}

/// Bounds of every region the composer drew.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub page: Rect,
    pub header: Rect,
    /// Sits inside `header`.
    pub amount_box: Rect,
    pub invoice_info: Rect,
    pub bill_to: Rect,
    pub table: Rect,
    pub grand_total: Rect,
    /// Zero-height strip at the dashed separator.
    pub separator: Rect,
    pub footer: Rect,
}

impl PageLayout {
    /// Top-level flow regions, in drawing order.
    pub fn regions(&self) -> [(&'static str, Rect); 7] {
        [
            ("header", self.header),
            ("invoice_info", self.invoice_info),
            ("bill_to", self.bill_to),
            ("table", self.table),
            ("grand_total", self.grand_total),
            ("separator", self.separator),
            ("footer", self.footer),
        ]
    }

    /// Pairs of flow regions whose bounds overlap.
    pub fn overlaps(&self) -> Vec<(&'static str, &'static str)> {
        let regions = self.regions();
        let mut found = Vec::new();
        for (i, (a, ra)) in regions.iter().enumerate() {
            for (b, rb) in &regions[i + 1..] {
                if ra.intersects(rb) {
                    found.push((*a, *b));
                }
            }
        }
        found
    }

    /// Names of the flow regions that leave the page. The grand total also
    /// counts when it runs into the footer separator.
    pub fn overflowing(&self) -> Vec<&'static str> {
        let mut found: Vec<&'static str> = self
            .regions()
            .iter()
            .filter(|(_, r)| {
                r.x < self.page.x
                    || r.y < self.page.y
                    || r.right() > self.page.right()
                    || r.bottom() > self.page.bottom()
            })
            .map(|(name, _)| *name)
            .collect();
        if self.grand_total.bottom() > self.separator.y && !found.contains(&"grand_total") {
            found.push("grand_total");
        }
        found
    }

    /// True when every region lies inside the page.
    pub fn fits_page(&self) -> bool {
        self.overflowing().is_empty()
    }
}

/// Format an amount with two decimals and the currency symbol or code.
pub fn format_money(amount: Decimal, currency: &CurrencyCode) -> String {
    let value = format!("{:.2}", amount.round_dp(2));
    match currency.symbol() {
        Some(symbol) => format!("{symbol}{value}"),
        None => format!("{value} {}", currency.as_str()),
    }
}

/// Draw the invoice page onto `canvas`, top to bottom. Each region is
/// placed relative to the bounds of the one drawn before it.
pub fn compose_invoice<C: Canvas>(canvas: &mut C, invoice: &Invoice, style: &PageStyle) -> PageLayout {
    let (page_width, page_height) = canvas.size();
    let total = format_money(invoice.total_amount(), &invoice.currency);
    let mut layout = PageLayout {
        page: Rect::new(0.0, 0.0, page_width, page_height),
        ..Default::default()
    };

    canvas.stroke_rect(layout.page, style.border, 1.0);

    // Header band with the amount box on the right.
    layout.header = Rect::new(0.0, 0.0, page_width, HEADER_HEIGHT);
    canvas.fill_rect(layout.header, style.header_fill);
    canvas.draw_text(
        "INVOICE",
        Point::new(MARGIN, HEADER_HEIGHT / 3.0),
        style.header_font,
        style.inverse_text,
    );
    layout.amount_box = Rect::new(AMOUNT_BOX_X, 0.0, page_width - AMOUNT_BOX_X, HEADER_HEIGHT);
    canvas.fill_rect(layout.amount_box, style.amount_fill);
    draw_centered(canvas, "Amount", layout.amount_box, style.regular_font, style.inverse_text);
    draw_centered(
        canvas,
        &total,
        Rect::new(
            AMOUNT_BOX_X,
            LINE_SPACE,
            page_width - AMOUNT_BOX_X,
            HEADER_HEIGHT + 15.0,
        ),
        style.bold_font,
        style.inverse_text,
    );

    // Bill-to block on the left half, number and date right-aligned on the
    // right half.
    let column_width = page_width / 2.0 - MARGIN;
    let info_lines = [
        format!("Invoice Number: {}", invoice.number),
        format!("Date : {}", invoice.issue_date.format(&style.date_format)),
    ];
    let mut info: Option<Rect> = None;
    let mut top = INFO_TOP;
    for line in &info_lines {
        let fitted = fit_text(canvas, line, column_width, style.regular_font);
        let x = page_width - MARGIN - canvas.text_width(&fitted, style.regular_font);
        let bounds = canvas.draw_text(&fitted, Point::new(x, top), style.regular_font, style.body_text);
        info = Some(info.map_or(bounds, |r| r.union(&bounds)));
        top = bounds.bottom() + LINE_SPACE;
    }
    layout.invoice_info = info.unwrap_or_default();

    let mut bill_to = canvas.draw_text(
        "Bill To:",
        Point::new(MARGIN, INFO_TOP),
        style.regular_font,
        style.body_text,
    );
    let mut cursor = bill_to;
    for line in invoice.buyer.as_ref().map(party_lines).unwrap_or_default() {
        let fitted = fit_text(canvas, &line, column_width, style.regular_font);
        cursor = canvas.draw_text(
            &fitted,
            Point::new(MARGIN, cursor.bottom() + LINE_SPACE),
            style.regular_font,
            style.body_text,
        );
        bill_to = bill_to.union(&cursor);
    }
    layout.bill_to = bill_to;

    layout.table = draw_table(
        canvas,
        invoice,
        style,
        Point::new(0.0, cursor.bottom() + TABLE_GAP),
        page_width,
    );

    // Grand total under the table.
    let label = canvas.draw_text(
        "Grand Total: ",
        Point::new(AMOUNT_BOX_X - GRAND_TOTAL_INDENT, layout.table.bottom() + LINE_SPACE),
        style.bold_font,
        style.body_text,
    );
    let amount = canvas.draw_text(
        &total,
        Point::new(label.right() + 4.0, label.y),
        style.bold_font,
        style.body_text,
    );
    layout.grand_total = label.union(&amount);

    // Dashed separator and seller footer.
    let separator_y = page_height - FOOTER_OFFSET;
    canvas.dashed_line(
        Point::new(0.0, separator_y),
        Point::new(page_width, separator_y),
        style.border,
        DASH_PATTERN,
    );
    layout.separator = Rect::new(0.0, separator_y, page_width, 0.0);

    let mut footer_lines = invoice
        .seller
        .as_ref()
        .map(seller_footer_lines)
        .unwrap_or_default();
    footer_lines.extend(style.footer_note.clone());
    let mut top = separator_y + LINE_SPACE * 3.0;
    let mut footer = Rect::new(MARGIN, top, 0.0, 0.0);
    for line in &footer_lines {
        let fitted = fit_text(canvas, line, page_width - 2.0 * MARGIN, style.regular_font);
        let bounds = canvas.draw_text(&fitted, Point::new(MARGIN, top), style.regular_font, style.body_text);
        footer = if footer.width == 0.0 {
            bounds
        } else {
            footer.union(&bounds)
        };
        top = bounds.bottom() + LINE_SPACE;
    }
    layout.footer = footer;

    layout
}

/// Compose the invoice on an A4 page and return the PDF document.
///
/// Fails when a region leaves the page, e.g. when the line items push the
/// totals into the footer area.
pub fn render_pdf(invoice: &Invoice, style: &PageStyle) -> Result<Document, InvoiceError> {
    let mut canvas = LopdfCanvas::default();
    let layout = compose_invoice(&mut canvas, invoice, style);

    let overflowing = layout.overflowing();
    if !overflowing.is_empty() {
        return Err(InvoiceError::Pdf(format!(
            "page region(s) {} do not fit on a single page ({} line items)",
            overflowing.join(", "),
            invoice.lines.len()
        )));
    }
    if let Some((a, b)) = layout.overlaps().first() {
        return Err(InvoiceError::Pdf(format!("page regions {a} and {b} overlap")));
    }

    tracing::debug!(
        number = %invoice.number,
        rows = invoice.lines.len(),
        table_bottom = layout.table.bottom(),
        "composed invoice page"
    );
    canvas.into_document(&format!("Invoice {}", invoice.number))
}

fn draw_centered<C: Canvas>(canvas: &mut C, text: &str, area: Rect, font: Font, color: Rgb) -> Rect {
    let width = canvas.text_width(text, font);
    let at = Point::new(
        area.x + (area.width - width) / 2.0,
        area.y + (area.height - font.line_height()) / 2.0,
    );
    canvas.draw_text(text, at, font, color)
}

const TABLE_HEADERS: [&str; 5] = ["ID", "Product", "Price", "Quantity", "Total"];

fn column_widths(table_width: f32) -> [f32; 5] {
    let other = (table_width - PRODUCT_COLUMN_WIDTH) / 4.0;
    [other, PRODUCT_COLUMN_WIDTH, other, other, other]
}

fn draw_table<C: Canvas>(
    canvas: &mut C,
    invoice: &Invoice,
    style: &PageStyle,
    origin: Point,
    width: f32,
) -> Rect {
    let font = style.regular_font;
    let header_font = Font::bold(font.size);
    let row_height = font.line_height() + 2.0 * CELL_PADDING;
    let widths = column_widths(width);

    let header = TABLE_HEADERS.map(String::from);
    let rows = invoice.lines.iter().map(|line| {
        [
            line.id.clone(),
            line.name.clone(),
            line.unit_price.to_string(),
            line.quantity.to_string(),
            line.line_total.to_string(),
        ]
    });

    let mut y = origin.y;
    draw_row(canvas, &header, origin.x, y, &widths, row_height, header_font, style.inverse_text, Some(style.amount_fill));
    y += row_height;

    for (i, cells) in rows.enumerate() {
        let fill = (i % 2 == 0).then_some(style.band_fill);
        draw_row(canvas, &cells, origin.x, y, &widths, row_height, font, style.body_text, fill);
        y += row_height;
    }

    let bounds = Rect::new(origin.x, origin.y, width, y - origin.y);
    canvas.stroke_rect(bounds, style.border, 0.5);
    bounds
}

#[allow(clippy::too_many_arguments)]
fn draw_row<C: Canvas>(
    canvas: &mut C,
    cells: &[String; 5],
    x: f32,
    y: f32,
    widths: &[f32; 5],
    height: f32,
    font: Font,
    color: Rgb,
    fill: Option<Rgb>,
) {
    let total_width: f32 = widths.iter().sum();
    if let Some(fill) = fill {
        canvas.fill_rect(Rect::new(x, y, total_width, height), fill);
    }
    let mut cell_x = x;
    for (text, width) in cells.iter().zip(widths) {
        let fitted = fit_text(canvas, text, width - 2.0 * CELL_PADDING, font);
        canvas.draw_text(
            &fitted,
            Point::new(cell_x + CELL_PADDING, y + CELL_PADDING),
            font,
            color,
        );
        cell_x += width;
    }
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
fn fit_text<C: Canvas>(canvas: &C, text: &str, max_width: f32, font: Font) -> String {
    if canvas.text_width(text, font) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "...";
        if canvas.text_width(&candidate, font) <= max_width {
            return candidate;
        }
    }
    String::new()
}

fn party_lines(party: &Party) -> Vec<String> {
    let mut lines = vec![format!("{},", party.legal_name)];
    lines.push(format!("{}, {},", party.address.city, party.address.postal_code));
    if let Some(street) = &party.address.street {
        lines.push(format!("{street},"));
    }
    lines.push(party.address.country.to_string());
    if let Some(contact) = &party.contact_name {
        lines.push(format!("Attn: {contact}"));
    }
    lines
}

fn seller_footer_lines(party: &Party) -> Vec<String> {
    let mut lines = vec![party.legal_name.clone()];
    if let Some(street) = &party.address.street {
        lines.push(street.clone());
    }
    lines.push(format!(
        "{} {}, {}",
        party.address.postal_code, party.address.city, party.address.country
    ));
    lines
}
