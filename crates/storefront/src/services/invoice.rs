//! Invoice PDF generation.
//!
//! Invoices are rendered once per download: the bytes are written to the
//! invoice directory (`invoice-<orderId>.pdf`) and streamed back in the
//! same response.

use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_decimal::Decimal;
use thiserror::Error;

use pawshop_core::OrderId;

use crate::models::{OrderItem, order_total};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 8.0;

const TITLE_SIZE: f32 = 24.0;
const BODY_SIZE: f32 = 12.0;

/// Errors during invoice generation.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// PDF rendering failed.
    #[error("pdf rendering failed: {0}")]
    Pdf(String),
    /// Writing the invoice file failed.
    #[error("failed to write invoice file: {0}")]
    Io(#[from] std::io::Error),
}

/// The invoice file name for an order.
#[must_use]
pub fn file_name(order_id: OrderId) -> String {
    format!("invoice-{order_id}.pdf")
}

/// One formatted invoice line, `"<title> - <qty> x $<price>"`.
#[must_use]
pub fn format_line(item: &OrderItem) -> String {
    format!(
        "{} - {} x ${:.2}",
        item.title,
        item.quantity,
        item.unit_price.amount()
    )
}

/// The formatted total line.
#[must_use]
pub fn format_total(total: Decimal) -> String {
    format!("Total Price: ${total:.2}")
}

/// Render the invoice PDF for an order.
///
/// # Errors
///
/// Returns `InvoiceError::Pdf` if rendering fails.
pub fn render(order_id: OrderId, items: &[OrderItem]) -> Result<Vec<u8>, InvoiceError> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Invoice #{order_id}"),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "invoice",
    );

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| InvoiceError::Pdf(e.to_string()))?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| InvoiceError::Pdf(e.to_string()))?;

    let layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    layer.use_text(
        format!("Invoice #{order_id}"),
        TITLE_SIZE,
        Mm(MARGIN_MM),
        Mm(y),
        &bold,
    );
    y -= 2.0 * LINE_HEIGHT_MM;

    layer.use_text("-----------------------", BODY_SIZE, Mm(MARGIN_MM), Mm(y), &regular);
    y -= LINE_HEIGHT_MM;

    for item in items {
        layer.use_text(format_line(item), BODY_SIZE, Mm(MARGIN_MM), Mm(y), &regular);
        y -= LINE_HEIGHT_MM;
    }

    y -= LINE_HEIGHT_MM;
    layer.use_text(
        format_total(order_total(items)),
        BODY_SIZE,
        Mm(MARGIN_MM),
        Mm(y),
        &bold,
    );

    doc.save_to_bytes()
        .map_err(|e| InvoiceError::Pdf(e.to_string()))
}

/// Render an invoice, persist it under the invoice directory, and return
/// the bytes for the response.
///
/// # Errors
///
/// Returns `InvoiceError` if rendering or the file write fails.
pub async fn render_and_store(
    invoice_dir: &Path,
    order_id: OrderId,
    items: &[OrderItem],
) -> Result<Vec<u8>, InvoiceError> {
    let bytes = render(order_id, items)?;

    tokio::fs::create_dir_all(invoice_dir).await?;
    let path: PathBuf = invoice_dir.join(file_name(order_id));
    tokio::fs::write(&path, &bytes).await?;
    tracing::debug!(path = %path.display(), "invoice written");

    Ok(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pawshop_core::{Price, ProductId};

    fn item(title: &str, price: &str, quantity: i32) -> OrderItem {
        OrderItem {
            order_id: OrderId::new(1),
            product_id: ProductId::new(1),
            title: title.to_string(),
            unit_price: Price::parse(price).unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(OrderId::new(17)), "invoice-17.pdf");
    }

    #[test]
    fn test_format_line() {
        let line = format_line(&item("Squeaky Bone", "4.50", 3));
        assert_eq!(line, "Squeaky Bone - 3 x $4.50");
    }

    #[test]
    fn test_format_total() {
        let items = vec![item("Bone", "4.50", 2), item("Ball", "1.00", 1)];
        assert_eq!(format_total(order_total(&items)), "Total Price: $10.00");
    }

    #[test]
    fn test_render_produces_pdf() {
        let items = vec![item("Bone", "4.50", 2)];
        let bytes = render(OrderId::new(5), &items).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_order() {
        let bytes = render(OrderId::new(6), &[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
