//! Small hand-built PDFs for tests.

/// Assemble a one-page PDF around a content stream, with a valid xref table.
pub(crate) fn single_page_pdf(content: &str) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    out.into_bytes()
}

/// A purchase order with a ruled two-by-two line item table.
///
/// Page space (top-down): title at top 42, table rulings at 92, 112, 132
/// and x = 50, 150, 250.
pub(crate) fn purchase_order_pdf() -> Vec<u8> {
    let content = "\
BT /F1 10 Tf 50 740 Td (Purchase Order 4500012345) Tj ET
0.5 w
50 700 m 250 700 l S
50 680 m 250 680 l S
50 660 m 250 660 l S
50 700 m 50 660 l S
150 700 m 150 660 l S
250 700 m 250 660 l S
BT /F1 10 Tf 55 686 Td (Line) Tj ET
BT /F1 10 Tf 155 686 Td (Part) Tj ET
BT /F1 10 Tf 55 666 Td (1.1) Tj ET
BT /F1 10 Tf 155 666 Td (ABC123/B) Tj ET";

    single_page_pdf(content)
}
