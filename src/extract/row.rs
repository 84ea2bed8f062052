use serde::Serialize;
use std::fmt;

/// Column order of the tabular output; every row supplies all of them
pub const CSV_COLUMNS: [&str; 21] = [
    "result_type",
    "keyword",
    "domain",
    "page",
    "rank_group",
    "rank_absolute",
    "position",
    "url",
    "title",
    "description",
    "extended_snippet",
    "breadcrumb",
    "website_name",
    "references_source",
    "references_url",
    "references_text",
    "references_markdown",
    "ai_mode_summary",
    "ai_mode_citations_count",
    "ai_mode_primary_domain",
    "ai_mode_primary_url",
];

/// Kind of record a row represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// An organic listing
    Organic,
    /// One citation of an AI overview panel
    AiOverview,
    /// An AI mode summary or one of its citations
    AiMode,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organic => "organic",
            Self::AiOverview => "ai_overview",
            Self::AiMode => "ai_mode",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized output record
///
/// Fields a row type does not use stay `None`; they are omitted from JSON and
/// written as empty cells in CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerpRow {
    pub result_type: ResultType,
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_group: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_absolute: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references_markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_mode_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_mode_citations_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_mode_primary_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_mode_primary_url: Option<String>,
}

impl SerpRow {
    /// Creates a row with only the type and keyword set
    pub fn new(result_type: ResultType, keyword: impl Into<String>) -> Self {
        Self {
            result_type,
            keyword: keyword.into(),
            domain: None,
            page: None,
            rank_group: None,
            rank_absolute: None,
            position: None,
            url: None,
            title: None,
            description: None,
            extended_snippet: None,
            breadcrumb: None,
            website_name: None,
            references_source: None,
            references_url: None,
            references_text: None,
            references_markdown: None,
            ai_mode_summary: None,
            ai_mode_citations_count: None,
            ai_mode_primary_domain: None,
            ai_mode_primary_url: None,
        }
    }

    /// Renders the row as CSV cells in `CSV_COLUMNS` order
    pub fn to_record(&self) -> Vec<String> {
        fn text(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }
        fn number<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(T::to_string).unwrap_or_default()
        }

        vec![
            self.result_type.as_str().to_string(),
            self.keyword.clone(),
            text(&self.domain),
            number(&self.page),
            number(&self.rank_group),
            number(&self.rank_absolute),
            text(&self.position),
            text(&self.url),
            text(&self.title),
            text(&self.description),
            text(&self.extended_snippet),
            text(&self.breadcrumb),
            text(&self.website_name),
            text(&self.references_source),
            text(&self.references_url),
            text(&self.references_text),
            text(&self.references_markdown),
            text(&self.ai_mode_summary),
            number(&self.ai_mode_citations_count),
            text(&self.ai_mode_primary_domain),
            text(&self.ai_mode_primary_url),
        ]
    }
}
