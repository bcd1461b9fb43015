use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The search loop may stop once `SCAN_SLACK * limit` candidates have
/// accumulated. A latency bound, not a recall guarantee.
const SCAN_SLACK: usize = 3;

/// Static province/department index, built once on first use.
pub static ARGENTINA: Lazy<GeoIndex> = Lazy::new(|| {
    let dataset: GeoDataset =
        serde_json::from_str(include_str!("../data/argentina.json")).unwrap();
    GeoIndex::from_dataset(&dataset)
});

#[derive(Debug, Clone, Deserialize)]
pub struct GeoDataset {
    pub provinces: Vec<GeoProvince>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoProvince {
    pub id: String,
    pub name: String,
    pub departments: Vec<GeoDepartment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoDepartment {
    pub id: String,
    pub name: String,
}

/// One selectable (province, department) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoOption {
    pub province_id: String,
    pub province: String,
    pub department_id: String,
    pub department: String,
    /// `"Provincia, Departamento"`, what gets displayed and persisted.
    pub label: String,
    /// Normalized haystack, never shown.
    #[serde(skip)]
    tokens: String,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Queries shorter than this produce no results (a hint state, not an
    /// error).
    pub min_chars: usize,
    pub limit: usize,
    /// Whether an empty query lists the first `limit` options.
    pub show_on_empty: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            min_chars: 2,
            limit: 12,
            show_on_empty: false,
        }
    }
}

pub struct GeoIndex {
    options: Vec<GeoOption>,
}

impl GeoIndex {
    /// Flatten the nested dataset into one searchable option per
    /// (province, department) pair, in dataset order.
    pub fn from_dataset(dataset: &GeoDataset) -> Self {
        let mut options = Vec::new();

        for province in &dataset.provinces {
            for department in &province.departments {
                let label = format!("{}, {}", province.name, department.name);
                let tokens = normalize(&format!(
                    "{} {} {}",
                    province.name, department.name, label
                ));
                options.push(GeoOption {
                    province_id: province.id.clone(),
                    province: province.name.clone(),
                    department_id: department.id.clone(),
                    department: department.name.clone(),
                    label,
                    tokens,
                });
            }
        }

        GeoIndex { options }
    }

    pub fn options(&self) -> &[GeoOption] {
        &self.options
    }

    /// Incremental-search lookup.
    ///
    /// Word-prefix matches rank above plain substring matches, each tier in
    /// dataset order. Total: malformed input degrades to an empty result.
    pub fn search(&self, raw_query: &str, options: &SearchOptions) -> Vec<&GeoOption> {
        let query = normalize(raw_query);

        if !options.show_on_empty && query.chars().count() < options.min_chars {
            return Vec::new();
        }
        if query.is_empty() {
            return self.options.iter().take(options.limit).collect();
        }

        let mut word_prefix = Vec::new();
        let mut substring = Vec::new();

        for option in &self.options {
            if option.tokens.contains(&query) {
                if option.tokens.starts_with(&query)
                    || option.tokens.split(' ').any(|word| word.starts_with(&query))
                {
                    word_prefix.push(option);
                } else {
                    substring.push(option);
                }
            }
            if word_prefix.len() + substring.len() >= options.limit * SCAN_SLACK {
                break;
            }
        }

        word_prefix
            .into_iter()
            .chain(substring)
            .take(options.limit)
            .collect()
    }
}

/// Lowercase, strip diacritics, collapse every non-alphanumeric run to a
/// single space, trim. Used for both the index and incoming queries.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.chars().flat_map(char::to_lowercase).map(fold_diacritic) {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

// Covers the Latin accents that occur in the dataset and in what users type
// for it, matching how NFD + diacritic-stripping treats them (ñ -> n).
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}
