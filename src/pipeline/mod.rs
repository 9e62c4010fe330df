//! One generation run: load items, build the invoice, render the page,
//! serialize the structured twin, embed it and persist the PDF.
//!
//! The output file only appears once every step has succeeded.

mod config;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

pub use config::{AttachmentConfig, GeneratorConfig};

use crate::core::*;
use crate::render::{PageStyle, render_pdf};
use crate::source::load_line_items;
use crate::zugferd::{self, Attachment, AttachmentRelationship, embed_attachment};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct GeneratedInvoice {
    /// Where the PDF was written.
    pub path: PathBuf,
    pub invoice: Invoice,
    /// The embedded structured invoice.
    pub xml: Vec<u8>,
    /// Size of the written PDF.
    pub pdf_size: usize,
}

/// Runs the generation steps for one [`GeneratorConfig`].
pub struct InvoiceGenerator {
    config: GeneratorConfig,
    style: PageStyle,
}

impl InvoiceGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let style = config.page_style();
        Self { config, style }
    }

    /// Override the page style derived from the config.
    pub fn with_style(mut self, style: PageStyle) -> Self {
        self.style = style;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Load the line items and assemble the invoice model.
    pub fn build_invoice(&self) -> Result<Invoice, InvoiceError> {
        let cfg = &self.config;
        let items = load_line_items(&cfg.items_path, cfg.total_policy)?;

        let mut invoice = Invoice::new(
            cfg.invoice_number.clone(),
            cfg.resolved_issue_date(),
            cfg.currency.clone(),
        );
        invoice.set_profile_level(cfg.profile);
        invoice.set_buyer(cfg.buyer.clone());
        invoice.set_seller(cfg.seller.clone());
        for item in items {
            invoice.add_line_item(item);
        }
        Ok(invoice)
    }

    /// Render, serialize and embed `invoice`, returning the PDF bytes and
    /// the embedded XML.
    pub fn render_hybrid(&self, invoice: &Invoice) -> Result<(Vec<u8>, Vec<u8>), InvoiceError> {
        let mut doc = render_pdf(invoice, &self.style)?;
        let xml = zugferd::serialize(invoice)?;

        let attachment = Attachment {
            filename: self.config.attachment.filename.clone(),
            mime_type: self.config.attachment.mime_type.clone(),
            relationship: AttachmentRelationship::Alternative,
            description: self.config.attachment.description.clone(),
            modification_date: chrono::Utc::now(),
            data: xml.clone(),
        };
        embed_attachment(&mut doc, &attachment, invoice.profile)?;

        let mut pdf = Vec::new();
        doc.save_to(&mut pdf)
            .map_err(|e| InvoiceError::Pdf(format!("failed to serialize PDF: {e}")))?;
        Ok((pdf, xml))
    }

    /// Run every step and write the PDF to `output_path`.
    #[tracing::instrument(skip(self), fields(number = %self.config.invoice_number))]
    pub fn generate(&self) -> Result<GeneratedInvoice, InvoiceError> {
        let invoice = self.build_invoice()?;
        tracing::info!(
            lines = invoice.lines.len(),
            total = %invoice.total_amount(),
            profile = invoice.profile.conformance_level(),
            "invoice assembled"
        );

        let (pdf, xml) = self.render_hybrid(&invoice)?;
        write_atomically(&self.config.output_path, &pdf)?;
        tracing::info!(
            path = %self.config.output_path.display(),
            bytes = pdf.len(),
            "invoice written"
        );

        Ok(GeneratedInvoice {
            path: self.config.output_path.clone(),
            invoice,
            xml,
            pdf_size: pdf.len(),
        })
    }
}

/// Write through a temporary file in the target directory, then rename it
/// over `path`. On error nothing is left at `path`.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), InvoiceError> {
    let write_err = |e: std::io::Error| InvoiceError::Write(format!("{}: {e}", path.display()));
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");
        std::fs::write(&target, b"old").unwrap();
        write_atomically(&target, b"new").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn atomic_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.pdf");
        assert!(matches!(
            write_atomically(&target, b"x"),
            Err(InvoiceError::Write(_))
        ));
        assert!(!target.exists());
    }
}
