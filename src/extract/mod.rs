//! Response-to-row extraction
//!
//! Turns raw provider documents into flat [`SerpRow`] records:
//! - organic listings (`type == "organic"`)
//! - AI overview citations (`type == "ai_overview"` on the organic endpoint)
//! - AI mode summaries and citations (`type == "ai_overview"` on the AI mode endpoint)
//!
//! All extractors are pure functions of the document and the fallback keyword.
//! Missing or malformed fields never fail extraction; they yield empty cells.

mod response;
mod row;

pub use response::{Component, Item, Reference, SerpResponse, SubItem, Task, TaskData, TaskResult};
pub use row::{ResultType, SerpRow, CSV_COLUMNS};

use response::non_empty;
use serde_json::Value;

const ORGANIC: &str = "organic";
const AI_OVERVIEW: &str = "ai_overview";

/// Extracts one row per organic listing
///
/// # Arguments
///
/// * `response` - Raw document returned by the organic endpoint
/// * `keyword_fallback` - Keyword used when the document does not echo one
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use serp_harvest::extract::extract_organic_rows;
///
/// let response = json!({"tasks": [{"result": [{"items": [
///     {"type": "organic", "rank_group": 1, "domain": "example.com"}
/// ]}]}]});
/// let rows = extract_organic_rows(&response, "shoes");
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].keyword, "shoes");
/// ```
pub fn extract_organic_rows(response: &Value, keyword_fallback: &str) -> Vec<SerpRow> {
    organic_rows(&SerpResponse::from_value(response), keyword_fallback)
}

/// Extracts one row per AI overview citation
///
/// Citations are collected from the overview itself, from each nested element,
/// and from each component of a nested element. The markdown attached to a
/// citation is the closest non-empty markdown walking outwards.
pub fn extract_ai_overview_rows(response: &Value, keyword_fallback: &str) -> Vec<SerpRow> {
    ai_overview_rows(&SerpResponse::from_value(response), keyword_fallback)
}

/// Extracts AI mode rows: one summary row per answer followed by one row per citation
pub fn extract_ai_mode_rows(response: &Value, keyword_fallback: &str) -> Vec<SerpRow> {
    ai_mode_rows(&SerpResponse::from_value(response), keyword_fallback)
}

pub fn organic_rows(response: &SerpResponse, keyword_fallback: &str) -> Vec<SerpRow> {
    response
        .items(keyword_fallback)
        .filter(|(_, item)| item.is_type(ORGANIC))
        .map(|(keyword, item)| {
            let mut row = SerpRow::new(ResultType::Organic, keyword);
            row.page = item.page;
            row.rank_group = item.rank_group;
            row.rank_absolute = item.rank_absolute;
            row.position = item.position.clone();
            row.domain = item.domain.clone();
            row.url = item.url.clone();
            row.title = item.title.clone();
            row.description = item.description.clone();
            row.extended_snippet = item.extended_snippet.clone();
            row.breadcrumb = item.breadcrumb.clone();
            row.website_name = item.website_name.clone();
            row
        })
        .collect()
}

pub fn ai_overview_rows(response: &SerpResponse, keyword_fallback: &str) -> Vec<SerpRow> {
    let mut rows = Vec::new();

    for (keyword, item) in response.items(keyword_fallback) {
        if !item.is_type(AI_OVERVIEW) {
            continue;
        }

        let item_markdown = non_empty(item.markdown.as_deref());
        for reference in &item.references {
            rows.push(citation_row(ResultType::AiOverview, keyword, reference, item_markdown));
        }

        for sub_item in &item.items {
            let sub_markdown = non_empty(sub_item.markdown.as_deref()).or(item_markdown);
            for reference in &sub_item.references {
                rows.push(citation_row(ResultType::AiOverview, keyword, reference, sub_markdown));
            }

            for component in &sub_item.components {
                let component_markdown = non_empty(component.markdown.as_deref()).or(sub_markdown);
                for reference in &component.references {
                    rows.push(citation_row(
                        ResultType::AiOverview,
                        keyword,
                        reference,
                        component_markdown,
                    ));
                }
            }
        }
    }

    rows
}

pub fn ai_mode_rows(response: &SerpResponse, keyword_fallback: &str) -> Vec<SerpRow> {
    let mut rows = Vec::new();

    for (keyword, item) in response.items(keyword_fallback) {
        // The AI mode endpoint reports its answer as an ai_overview item
        if !item.is_type(AI_OVERVIEW) {
            continue;
        }

        let markdown = non_empty(item.markdown.as_deref());
        let primary = item.references.first();
        let primary_domain = primary.and_then(|r| r.domain.clone()).unwrap_or_default();
        let primary_url = primary.and_then(|r| r.url.clone()).unwrap_or_default();

        let mut summary = SerpRow::new(ResultType::AiMode, keyword);
        summary.ai_mode_summary = Some(markdown.unwrap_or_default().to_string());
        summary.ai_mode_citations_count = Some(item.references.len());
        summary.domain = Some(primary_domain.clone());
        summary.ai_mode_primary_domain = Some(primary_domain);
        summary.ai_mode_primary_url = Some(primary_url);
        rows.push(summary);

        for reference in &item.references {
            rows.push(citation_row(ResultType::AiMode, keyword, reference, markdown));
        }
    }

    rows
}

fn citation_row(
    result_type: ResultType,
    keyword: &str,
    reference: &Reference,
    markdown: Option<&str>,
) -> SerpRow {
    let mut row = SerpRow::new(result_type, keyword);
    row.domain = reference.domain.clone();
    row.references_source = reference.source_label();
    row.references_url = reference.url.clone();
    row.references_text = reference.text.clone();
    row.references_markdown = markdown.map(str::to_string);
    row
}
