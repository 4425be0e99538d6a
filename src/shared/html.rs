//! HTML text helpers and the document shell shared by every generated page

use chrono::{DateTime, Local};

const STYLESHEET: &str = "\
body { font-family: system-ui, sans-serif; margin: 2rem; color: #222; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; vertical-align: top; }
th { background: #f3f3f3; white-space: nowrap; }
th a { color: inherit; text-decoration: none; display: block; }
th a:hover { text-decoration: underline; }
td.row-number, th.row-number { color: #777; text-align: right; }
tbody tr:nth-child(even) { background: #fafafa; }
.error { color: #a00; }
footer { margin-top: 2rem; font-size: 0.8rem; color: #777; }";

/// Escape text for use in element content and double-quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Site-wide values every page carries
#[derive(Debug, Clone)]
pub struct PageChrome {
    pub site_title: String,
    pub generated_at: DateTime<Local>,
}

impl PageChrome {
    pub fn new(site_title: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
            generated_at: Local::now(),
        }
    }

    /// Wrap `body` (already HTML) in a complete document.
    /// `back_to_index` adds a link to `index.html` above the heading.
    pub fn document(&self, heading: &str, body: &str, back_to_index: bool) -> String {
        let title = if heading == self.site_title {
            escape(heading)
        } else {
            format!("{} - {}", escape(heading), escape(&self.site_title))
        };
        let nav = if back_to_index {
            "<nav><a href=\"index.html\">&larr; All files</a></nav>\n"
        } else {
            ""
        };

        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{title}</title>\n\
             <style>\n{style}\n</style>\n\
             </head>\n\
             <body>\n\
             {nav}<h1>{heading}</h1>\n\
             {body}\n\
             <footer>Generated {generated}</footer>\n\
             </body>\n\
             </html>\n",
            title = title,
            style = STYLESHEET,
            nav = nav,
            heading = escape(heading),
            body = body,
            generated = self.generated_at.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

/// Inline error paragraph
pub fn error_paragraph(message: &str) -> String {
    format!("<p class=\"error\">{}</p>", escape(message))
}
