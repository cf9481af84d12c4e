use beanport_core::IdentifyReport;

/// Render the identify listing: one section per claimed document, then the
/// files nothing claimed.
pub fn render_identify(report: &IdentifyReport) -> String {
    let mut out = String::new();

    for m in &report.matches {
        out.push_str(&format!("*** {}\n", m.source));
        out.push_str(&format!("importer: {}\n", m.importer));
        out.push_str(&format!("account: {}\n\n", m.account));
    }

    if !report.unmatched.is_empty() {
        out.push_str("*** unidentified\n");
        for path in &report.unmatched {
            out.push_str(&format!("{path}\n"));
        }
    }

    out
}
