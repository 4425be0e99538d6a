// ============================================================
// SITE BUILDER USE CASE
// ============================================================
// Write index.html plus one page (and its sorted variants) per
// manifest entry into the output directory

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::use_cases::index_page::{
    load_manifest, render_index_error, render_index_page,
};
use crate::application::use_cases::table_renderer::{
    render_table_page, variant_page_name, SortLinks,
};
use crate::application::use_cases::table_view::{TableLoader, TableView};
use crate::domain::csv::SortState;
use crate::domain::error::Result;
use crate::infrastructure::fetchers::ResourceFetcher;
use crate::infrastructure::storage::{ensure_output_dir, write_page};
use crate::shared::html::{error_paragraph, PageChrome};

/// Outcome of one build
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub pages_written: usize,
    /// `(file name, error message)` for entries rendered as error pages
    pub failed: Vec<(String, String)>,
}

pub struct SiteBuilder {
    fetcher: Arc<dyn ResourceFetcher>,
    manifest_file: String,
    chrome: PageChrome,
}

impl SiteBuilder {
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher>,
        manifest_file: impl Into<String>,
        chrome: PageChrome,
    ) -> Self {
        Self {
            fetcher,
            manifest_file: manifest_file.into(),
            chrome,
        }
    }

    /// Build the site. A manifest that cannot be loaded still produces an
    /// index page carrying the error, then fails the build. A CSV file that
    /// cannot be loaded gets an error page and is listed in the report.
    pub async fn build(&self, output_dir: &Path) -> Result<BuildReport> {
        let output_dir = ensure_output_dir(output_dir)?;
        let mut report = BuildReport::default();

        let manifest = match load_manifest(&self.fetcher, &self.manifest_file).await {
            Ok(manifest) => manifest,
            Err(err) => {
                let html = render_index_error(&err, &self.manifest_file, &self.chrome);
                write_page(&output_dir, "index.html", &html)?;
                return Err(err);
            }
        };

        write_page(&output_dir, "index.html", &render_index_page(&manifest, &self.chrome))?;
        report.pages_written += 1;

        let loader = TableLoader::new(self.fetcher.clone());
        for entry in &manifest.entries {
            match loader.load(&entry.file_name).await {
                Ok(view) => {
                    if entry.page_stem() != view.page_stem {
                        warn!(
                            file = %entry.file_name,
                            page = %entry.page_name(),
                            "Page name taken; using a numbered page"
                        );
                    }
                    let view = view.with_page_stem(entry.page_stem());
                    report.pages_written += self.write_table_pages(&output_dir, view)?;
                }
                Err(err) => {
                    warn!(file = %entry.file_name, error = %err, "Writing error page");
                    let message = format!("Error loading {}: {}", entry.file_name, err);
                    let html = self.chrome.document(
                        &entry.display_title(),
                        &error_paragraph(&message),
                        true,
                    );
                    write_page(&output_dir, &entry.page_name(), &html)?;
                    report.pages_written += 1;
                    report.failed.push((entry.file_name.clone(), err.to_string()));
                }
            }
        }

        if report.failed.is_empty() {
            info!(
                output_dir = %output_dir.display(),
                pages = report.pages_written,
                "Site built"
            );
        } else {
            error!(
                output_dir = %output_dir.display(),
                pages = report.pages_written,
                failed = report.failed.len(),
                "Site built with errors"
            );
        }

        Ok(report)
    }

    /// The unsorted page plus an ascending and a descending variant per column
    fn write_table_pages(&self, output_dir: &Path, view: TableView) -> Result<usize> {
        let mut states = vec![SortState::unsorted()];
        for column_index in 0..view.table.column_count() {
            states.push(SortState::ascending(column_index));
            states.push(SortState::descending(column_index));
        }

        for state in &states {
            let variant = view.clone().with_sort(*state);
            let html = render_table_page(&variant, &SortLinks::StaticPages, &self.chrome);
            let page_name = variant_page_name(&view.page_stem, *state);
            write_page(output_dir, &page_name, &html)?;
        }

        Ok(states.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::infrastructure::fetchers::directory::DirectoryFetcher;
    use crate::infrastructure::fetchers::memory::MemoryFetcher;
    use scraper::{Html, Selector};
    use std::fs;
    use tempfile::tempdir;

    fn builder(fetcher: MemoryFetcher) -> SiteBuilder {
        SiteBuilder::new(Arc::new(fetcher), "csv_files.json", PageChrome::new("Bots"))
    }

    fn first_column(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("tbody tr td:nth-child(2)").unwrap();
        document
            .select(&selector)
            .map(|td| td.text().collect::<String>())
            .collect()
    }

    #[tokio::test]
    async fn test_builds_index_pages_and_variants() {
        let dir = tempdir().unwrap();
        let fetcher = MemoryFetcher::default()
            .with_file("csv_files.json", r#"["poe.csv"]"#)
            .with_file("poe.csv", "Bot,Points\nbeta,10\nAlpha,2\ngamma,33\n");

        let report = builder(fetcher).build(dir.path()).await.unwrap();
        assert_eq!(report.pages_written, 1 + 1 + 4);
        assert!(report.failed.is_empty());

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("href=\"poe.html\""));

        let unsorted = fs::read_to_string(dir.path().join("poe.html")).unwrap();
        assert_eq!(first_column(&unsorted), vec!["beta", "Alpha", "gamma"]);

        let by_points = fs::read_to_string(dir.path().join("poe.sort-1-asc.html")).unwrap();
        let document = Html::parse_document(&by_points);
        let selector = Selector::parse("tbody tr td:nth-child(3)").unwrap();
        let points: Vec<String> = document
            .select(&selector)
            .map(|td| td.text().collect())
            .collect();
        assert_eq!(points, vec!["2", "10", "33"]);
        assert!(by_points.contains("href=\"poe.sort-1-desc.html\""));

        let by_bot_desc = fs::read_to_string(dir.path().join("poe.sort-0-desc.html")).unwrap();
        assert_eq!(first_column(&by_bot_desc), vec!["gamma", "beta", "Alpha"]);
    }

    #[tokio::test]
    async fn test_colliding_page_names_keep_index_and_both_tables() {
        let dir = tempdir().unwrap();
        let fetcher = MemoryFetcher::default()
            .with_file("csv_files.json", r#"["index.csv", "poe.csv", "old/poe.csv"]"#)
            .with_file("index.csv", "Name
from-index
")
            .with_file("poe.csv", "Name
from-poe
")
            .with_file("old/poe.csv", "Name
from-old-poe
");

        let report = builder(fetcher).build(dir.path()).await.unwrap();
        assert!(report.failed.is_empty());

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("href=\"index-2.html\""));
        assert!(index.contains("href=\"poe.html\""));
        assert!(index.contains("href=\"poe-2.html\""));
        assert!(!index.contains("<table>"));

        let read = |name: &str| fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(first_column(&read("index-2.html")), vec!["from-index"]);
        assert_eq!(first_column(&read("poe.html")), vec!["from-poe"]);
        assert_eq!(first_column(&read("poe-2.html")), vec!["from-old-poe"]);
        assert!(read("poe-2.html").contains("href=\"poe-2.sort-0-asc.html\""));
        assert_eq!(first_column(&read("poe-2.sort-0-desc.html")), vec!["from-old-poe"]);
    }

    #[tokio::test]
    async fn test_nested_entries_build_from_directory() {
        let source = tempdir().unwrap();
        fs::create_dir(source.path().join("data")).unwrap();
        fs::write(source.path().join("csv_files.json"), r#"["data/poe.csv"]"#).unwrap();
        fs::write(source.path().join("data/poe.csv"), "Bot
beta
alpha
").unwrap();

        let out = tempdir().unwrap();
        let fetcher = DirectoryFetcher::new(source.path().to_path_buf());
        let report = SiteBuilder::new(Arc::new(fetcher), "csv_files.json", PageChrome::new("Bots"))
            .build(out.path())
            .await
            .unwrap();
        assert!(report.failed.is_empty(), "{:?}", report.failed);

        let page = fs::read_to_string(out.path().join("poe.sort-0-asc.html")).unwrap();
        assert_eq!(first_column(&page), vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_missing_csv_gets_error_page() {
        let dir = tempdir().unwrap();
        let fetcher = MemoryFetcher::default()
            .with_file("csv_files.json", r#"{"gone.csv": "Gone"}"#);

        let report = builder(fetcher).build(dir.path()).await.unwrap();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "gone.csv");

        let page = fs::read_to_string(dir.path().join("gone.html")).unwrap();
        assert!(page.contains("Error loading gone.csv"));
    }

    #[tokio::test]
    async fn test_missing_manifest_writes_error_index_and_fails() {
        let dir = tempdir().unwrap();
        let err = builder(MemoryFetcher::default())
            .build(dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("csvdeck manifest"));
    }
}
