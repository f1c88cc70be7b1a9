//! PDF output with `printpdf`.

use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use tracing::{info, warn};

use super::layout::{Geometry, Page, Weight};
use crate::error::{ReportError, ReportResult};

/// Font used for the whole report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportFont {
    /// Helvetica and Helvetica-Bold from the PDF base fonts
    Builtin,
    /// A TrueType font file, used for every weight
    External(Vec<u8>),
}

impl ReportFont {
    /// Read a TrueType font, falling back to Helvetica if it is missing.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::Builtin;
        };
        match std::fs::read(path) {
            Ok(bytes) => {
                info!(path = %path.display(), "Using report font");
                Self::External(bytes)
            }
            Err(e) => {
                info!(path = %path.display(), error = %e, "Report font not found, falling back to Helvetica");
                Self::Builtin
            }
        }
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn register(doc: &PdfDocumentReference, font: &ReportFont) -> ReportResult<Self> {
        if let ReportFont::External(bytes) = font {
            match doc.add_external_font(bytes.as_slice()) {
                Ok(font) => {
                    return Ok(Self {
                        regular: font.clone(),
                        bold: font,
                    })
                }
                Err(e) => warn!(error = %e, "Report font unusable, falling back to Helvetica"),
            }
        }

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        Ok(Self { regular, bold })
    }

    fn get(&self, weight: Weight) -> &IndirectFontRef {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }
}

/// Render laid-out pages into PDF bytes.
pub fn render_pdf(pages: &[Page], title: &str, geometry: Geometry, font: &ReportFont) -> ReportResult<Vec<u8>> {
    let width = Mm(geometry.page_width);
    let height = Mm(geometry.page_height);

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let fonts = Fonts::register(&doc, font)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_ref, layer_ref) = doc.add_page(width, height, "Layer 1");
            doc.get_page(page_ref).get_layer(layer_ref)
        };

        for item in &page.items {
            layer.use_text(
                item.text.clone(),
                item.size_pt,
                Mm(item.x),
                Mm(geometry.page_height - item.baseline),
                fonts.get(item.weight),
            );
        }
    }

    doc.save_to_bytes().map_err(|e| ReportError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::PlacedText;

    #[test]
    fn test_renders_pdf_bytes() {
        let pages = vec![
            Page {
                items: vec![PlacedText {
                    text: "Bundesfinanzhof".into(),
                    x: 20.0,
                    baseline: 30.0,
                    size_pt: 24.0,
                    weight: Weight::Bold,
                }],
            },
            Page::default(),
        ];

        let bytes = render_pdf(&pages, "Test", Geometry::default(), &ReportFont::Builtin).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_missing_font_falls_back() {
        let font = ReportFont::load(Some(Path::new("/nonexistent/DejaVuSans.ttf")));
        assert_eq!(font, ReportFont::Builtin);
        assert_eq!(ReportFont::load(None), ReportFont::Builtin);
    }
}
