use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::domain::error::{AppError, Result};

/// Stem of the generated index page; no table page may take it
pub const INDEX_PAGE_STEM: &str = "index";

/// One CSV file listed in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub file_name: String,
    pub title: Option<String>,
    page_stem: String,
}

impl ManifestEntry {
    pub fn new(file_name: impl Into<String>, title: Option<String>) -> Self {
        let file_name = file_name.into();
        let page_stem = basename(&file_name);
        Self {
            file_name,
            title,
            page_stem,
        }
    }

    /// Stem shared by this entry's page and its sorted variants
    pub fn page_stem(&self) -> &str {
        &self.page_stem
    }

    /// Title for the index link; falls back to the file's basename
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => basename(&self.file_name),
        }
    }

    /// Generated page for this file
    pub fn page_name(&self) -> String {
        format!("{}.html", self.page_stem)
    }
}

/// The list of CSV files a site is built from.
///
/// On disk it is either a JSON array of file names or a JSON object mapping
/// file names to display titles. Entry order follows the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Entries whose basenames collide (with each other or with the index
    /// page) get a numeric suffix: `poe`, `poe-2`, `index-2`.
    pub fn new(mut entries: Vec<ManifestEntry>) -> Self {
        assign_page_stems(&mut entries);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;

        let entries = match document {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(file_name) => Ok(ManifestEntry::new(file_name, None)),
                    other => Err(AppError::ParseError(format!(
                        "Manifest list entries must be file names, found {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
            Value::Object(map) => map
                .into_iter()
                .map(|(file_name, title)| match title {
                    Value::String(title) => Ok(ManifestEntry::new(file_name, Some(title))),
                    Value::Null => Ok(ManifestEntry::new(file_name, None)),
                    other => Err(AppError::ParseError(format!(
                        "Manifest title for {} must be a string, found {}",
                        file_name, other
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(AppError::ParseError(format!(
                    "Manifest must be a JSON array or object, found {}",
                    other
                )))
            }
        };

        Ok(Self::new(entries))
    }

    /// Plain list form: `["a.csv", "b.csv"]`
    pub fn to_list_json(&self) -> Result<String> {
        let names: Vec<&str> = self.entries.iter().map(|e| e.file_name.as_str()).collect();
        Ok(serde_json::to_string_pretty(&names)?)
    }

    /// Titled form: `{"a.csv": "Title"}`; untitled entries get their basename
    pub fn to_titled_json(&self) -> Result<String> {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|e| (e.file_name.clone(), Value::String(e.display_title())))
            .collect();
        Ok(serde_json::to_string_pretty(&Value::Object(map))?)
    }

    pub fn title_for(&self, file_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.file_name == file_name)
            .and_then(|e| e.title.as_deref())
    }

    /// Entry whose generated page is `page_name`
    pub fn find_by_page(&self, page_name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.page_name() == page_name)
    }
}

fn assign_page_stems(entries: &mut [ManifestEntry]) {
    // Compared case-insensitively so pages stay distinct on case-folding filesystems
    let mut taken: HashSet<String> = HashSet::from([INDEX_PAGE_STEM.to_string()]);
    for entry in entries.iter_mut() {
        let base = basename(&entry.file_name);
        let mut stem = base.clone();
        let mut suffix = 2;
        while !taken.insert(stem.to_lowercase()) {
            stem = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        entry.page_stem = stem;
    }
}

/// `data/poe.csv` -> `poe`
pub fn basename(file_name: &str) -> String {
    let last = file_name.rsplit('/').next().unwrap_or(file_name);
    strip_csv_extension(last).to_string()
}

pub fn strip_csv_extension(file_name: &str) -> &str {
    let len = file_name.len();
    if len >= 4
        && file_name.is_char_boundary(len - 4)
        && file_name[len - 4..].eq_ignore_ascii_case(".csv")
    {
        &file_name[..len - 4]
    } else {
        file_name
    }
}

/// Reject names that cannot refer to a CSV file before anything is fetched
pub fn validate_file_name(file_name: &str) -> Result<()> {
    let trimmed = file_name.trim();
    if trimmed.is_empty() || trimmed == ".csv" {
        return Err(AppError::ValidationError(format!(
            "Invalid CSV file name provided: {:?}",
            file_name
        )));
    }
    Ok(())
}
