// ============================================================
// TABLE RENDERER
// ============================================================
// Turn a TableView into HTML: numbered rows, sortable headers,
// links for URL cells

use url::Url;

use crate::application::use_cases::table_view::TableView;
use crate::domain::csv::SortState;
use crate::domain::manifest::basename;
use crate::shared::html::{escape, PageChrome};

/// Where a header's sort affordance points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortLinks {
    /// Same page with `?sort=<column>&order=<asc|desc>` (served pages)
    Query,
    /// Pre-rendered sibling files (static build)
    StaticPages,
}

impl SortLinks {
    /// Link target for the page with `page_stem` in `state`
    pub fn href(&self, page_stem: &str, state: SortState) -> String {
        match self {
            SortLinks::Query => match state.column_index {
                Some(column_index) => {
                    format!("?sort={}&order={}", column_index, state.order_param())
                }
                None => "?".to_string(),
            },
            SortLinks::StaticPages => variant_page_name(page_stem, state),
        }
    }
}

/// `poe` unsorted -> `poe.html`; sorted by column 2 descending ->
/// `poe.sort-2-desc.html`
pub fn variant_page_name(page_stem: &str, state: SortState) -> String {
    match state.column_index {
        Some(column_index) => format!(
            "{}.sort-{}-{}.html",
            page_stem,
            column_index,
            state.order_param()
        ),
        None => format!("{}.html", page_stem),
    }
}

/// Schemes a generated page will turn into links
const LINK_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// True when the cell text is an absolute URL with a linkable scheme.
/// Other schemes (`javascript:`, `data:`) stay plain text.
pub fn is_url(text: &str) -> bool {
    Url::parse(text.trim())
        .map(|url| LINK_SCHEMES.contains(&url.scheme()))
        .unwrap_or(false)
}

/// The `<table>` element for a view
pub fn render_table(view: &TableView, links: &SortLinks) -> String {
    let table = &view.table;
    let width = table.grid_width();
    let mut html = String::from("<table>\n");

    if !table.headers.is_empty() {
        html.push_str("<thead>\n<tr><th class=\"row-number\">No.</th>");
        for column_index in 0..width {
            html.push_str(&render_header(view, column_index, links));
        }
        html.push_str("</tr>\n</thead>\n");
    }

    html.push_str("<tbody>\n");
    for (position, row) in view.display_rows().iter().enumerate() {
        html.push_str("<tr>");
        html.push_str(&format!("<td class=\"row-number\">{}</td>", position + 1));
        for column_index in 0..width {
            let cell = row.get(column_index).map(String::as_str).unwrap_or("");
            html.push_str(&render_cell(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");

    html
}

/// A full page for a view
pub fn render_table_page(view: &TableView, links: &SortLinks, chrome: &PageChrome) -> String {
    let heading = basename(&view.file_name);
    chrome.document(&heading, &render_table(view, links), true)
}

fn render_header(view: &TableView, column_index: usize, links: &SortLinks) -> String {
    // Columns past the header row only exist in over-long rows
    let Some(label) = view.table.headers.get(column_index) else {
        return "<th></th>".to_string();
    };

    let mut text = escape(label);
    if let Some(indicator) = view.sort.indicator_for(column_index) {
        text.push(' ');
        text.push_str(indicator);
    }

    let next = view.next_sort(column_index);
    let aria_sort = match view.sort.column_index {
        Some(active) if active == column_index => {
            if view.sort.ascending {
                " aria-sort=\"ascending\""
            } else {
                " aria-sort=\"descending\""
            }
        }
        _ => "",
    };

    format!(
        "<th{}><a href=\"{}\">{}</a></th>",
        aria_sort,
        escape(&links.href(&view.page_stem, next)),
        text
    )
}

fn render_cell(cell: &str) -> String {
    if is_url(cell) {
        let text = escape(cell);
        format!(
            "<td><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></td>",
            text, text
        )
    } else {
        format!("<td>{}</td>", escape(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::{SortEvent, Table};
    use crate::infrastructure::csv::parse_table;
    use scraper::{Html, Selector};

    fn view(content: &str) -> TableView {
        TableView::new("bots.csv", parse_table(content))
    }

    fn select_text(html: &str, selector: &str) -> Vec<String> {
        let fragment = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        fragment
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .collect()
    }

    #[test]
    fn test_row_numbers_and_headers() {
        let html = render_table(&view("Name,Score\nb,2\na,1"), &SortLinks::Query);
        assert_eq!(select_text(&html, "thead th"), vec!["No.", "Name", "Score"]);
        assert_eq!(select_text(&html, "tbody td.row-number"), vec!["1", "2"]);
        // the No. header is not a link
        assert_eq!(select_text(&html, "th.row-number a").len(), 0);
    }

    #[test]
    fn test_url_cells_become_links() {
        let html = render_table(
            &view("Site,Note\nhttps://example.com/x,not a url"),
            &SortLinks::Query,
        );
        let fragment = Html::parse_fragment(&html);
        let anchors: Vec<_> = fragment
            .select(&Selector::parse("tbody a").unwrap())
            .collect();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].value().attr("href"), Some("https://example.com/x"));
        assert_eq!(anchors[0].value().attr("target"), Some("_blank"));
        assert_eq!(anchors[0].value().attr("rel"), Some("noopener noreferrer"));
        assert_eq!(select_text(&html, "tbody td"), vec!["1", "https://example.com/x", "not a url"]);
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/x"));
        assert!(is_url("  mailto:someone@example.com "));
        assert!(!is_url("not a url"));
        assert!(!is_url("example.com"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_script_urls_stay_plain_text() {
        assert!(!is_url("javascript:alert(1)"));
        assert!(!is_url("data:text/html,<b>x</b>"));
        assert!(!is_url("file:///etc/passwd"));

        let html = render_table(&view("Link\njavascript:alert(1)"), &SortLinks::Query);
        assert_eq!(select_text(&html, "tbody a").len(), 0);
        assert_eq!(select_text(&html, "tbody td"), vec!["1", "javascript:alert(1)"]);
    }

    #[test]
    fn test_active_header_shows_direction() {
        let mut v = view("Name,Score\nb,2\na,1");
        v.apply(SortEvent::Click(1));
        let html = render_table(&v, &SortLinks::Query);
        assert_eq!(select_text(&html, "thead th"), vec!["No.", "Name", "Score ▲"]);
        assert_eq!(select_text(&html, "tbody tr td:nth-child(2)"), vec!["a", "b"]);
        assert_eq!(select_text(&html, "tbody td.row-number"), vec!["1", "2"]);

        v.apply(SortEvent::Click(1));
        let html = render_table(&v, &SortLinks::Query);
        assert_eq!(select_text(&html, "thead th"), vec!["No.", "Name", "Score ▼"]);
    }

    #[test]
    fn test_header_links_encode_next_state() {
        let v = view("Name,Score\nb,2").with_sort(SortState::ascending(0));
        let fragment = Html::parse_fragment(&render_table(&v, &SortLinks::Query));
        let hrefs: Vec<_> = fragment
            .select(&Selector::parse("thead a").unwrap())
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(hrefs, vec!["?sort=0&order=desc", "?sort=1&order=asc"]);

        let fragment = Html::parse_fragment(&render_table(&v, &SortLinks::StaticPages));
        let hrefs: Vec<_> = fragment
            .select(&Selector::parse("thead a").unwrap())
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(
            hrefs,
            vec!["bots.sort-0-desc.html", "bots.sort-1-asc.html"]
        );
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let html = render_table(&view("a,b,c\n1\n1,2,3,4"), &SortLinks::Query);
        // extra unlabeled header for the fourth cell
        assert_eq!(select_text(&html, "thead th"), vec!["No.", "a", "b", "c", ""]);
        assert_eq!(select_text(&html, "thead a").len(), 3);
        let fragment = Html::parse_fragment(&html);
        let row_sel = Selector::parse("tbody tr").unwrap();
        let td_sel = Selector::parse("td").unwrap();
        for row in fragment.select(&row_sel) {
            assert_eq!(row.select(&td_sel).count(), 5);
        }
    }

    #[test]
    fn test_cells_are_escaped() {
        let html = render_table(&view("<b>h</b>\n<script>x</script>"), &SortLinks::Query);
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_empty_table_has_no_header_row() {
        let v = TableView::new("empty.csv", Table::default());
        let html = render_table(&v, &SortLinks::Query);
        assert!(!html.contains("<thead>"));
        assert!(html.contains("<tbody>"));
    }

    #[test]
    fn test_variant_page_names() {
        assert_eq!(variant_page_name("poe", SortState::unsorted()), "poe.html");
        assert_eq!(
            variant_page_name("poe", SortState::descending(2)),
            "poe.sort-2-desc.html"
        );
    }

    #[test]
    fn test_page_has_back_link_and_title() {
        let chrome = PageChrome::new("CSV Files");
        let html = render_table_page(&view("a\n1"), &SortLinks::StaticPages, &chrome);
        assert!(html.contains("<h1>bots</h1>"));
        assert!(html.contains("href=\"index.html\""));
    }
}
