//! PDF drawing with the built-in Helvetica fonts.
//!
//! Built-in fonts only cover the WinAnsi (Windows-1252) character set. Any other character is
//! printed as `?` and a warning is logged, so unsupported text stays visible in the letter
//! instead of vanishing.

use crate::layout::{PlacedLine, PAGE_HEIGHT_PT, PAGE_WIDTH_PT};
use crate::{ExportError, ExportResult};
use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};
use std::io::BufWriter;

/// Characters from 0x80..=0x9F that Windows-1252 maps to printable glyphs.
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

const REPLACEMENT: char = '?';

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRAS.contains(c)
}

/// Replaces each character the built-in fonts cannot draw; returns the text and the count.
fn to_win_ansi(text: &str) -> (String, usize) {
    let mut replaced = 0;
    let encoded = text
        .chars()
        .map(|c| {
            if is_win_ansi(c) {
                c
            } else {
                replaced += 1;
                REPLACEMENT
            }
        })
        .collect();
    (encoded, replaced)
}

/// Draws laid-out pages with the built-in Helvetica fonts and returns the PDF bytes.
pub(crate) fn write_pdf(title: &str, pages: &[Vec<PlacedLine>]) -> ExportResult<Vec<u8>> {
    let width = mm(PAGE_WIDTH_PT);
    let height = mm(PAGE_HEIGHT_PT);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Font(e.to_string()))?;

    let mut replaced = 0;
    for (index, lines) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(width, height, format!("Page {}", index + 1));
            doc.get_page(page).get_layer(layer)
        };
        for line in lines {
            let font = if line.style.is_bold() { &bold } else { &regular };
            let (text, count) = to_win_ansi(&line.text);
            replaced += count;
            layer.use_text(text, line.style.size(), mm(line.x), mm(line.y), font);
        }
    }
    if replaced > 0 {
        tracing::warn!(
            replaced,
            "letter contains characters outside WinAnsi; printed as '{REPLACEMENT}'"
        );
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Render(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| ExportError::Render(e.to_string()))
}
