//! Typed view of a provider SERP response
//!
//! The provider returns `tasks[].result[].items[]`, where every level may be
//! missing, null, or carry an unexpected type. Every field here is decoded
//! leniently: anything that does not fit the expected shape is treated as
//! absent instead of failing the whole document.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Root of a provider response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SerpResponse {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tasks: Vec<Task>,
}

impl SerpResponse {
    /// Decodes a raw response document; a document of the wrong shape decodes as empty
    pub fn from_value(value: &Value) -> Self {
        match Self::deserialize(value) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Response document has unexpected shape: {}", e);
                Self::default()
            }
        }
    }

    /// Iterates every result item paired with the keyword it belongs to
    ///
    /// The keyword is taken from the result, then from the task request data,
    /// then from `fallback`.
    pub fn items<'a>(&'a self, fallback: &'a str) -> impl Iterator<Item = (&'a str, &'a Item)> + 'a {
        self.tasks.iter().flat_map(move |task| {
            let task_keyword = task
                .data
                .as_ref()
                .and_then(|data| non_empty(data.keyword.as_deref()))
                .unwrap_or(fallback);

            task.result.iter().flat_map(move |result| {
                let keyword = non_empty(result.keyword.as_deref()).unwrap_or(task_keyword);
                result.items.iter().map(move |item| (keyword, item))
            })
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<TaskData>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub result: Vec<TaskResult>,
}

/// Echo of the request parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskData {
    #[serde(default, deserialize_with = "lenient")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskResult {
    #[serde(default, deserialize_with = "lenient")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub items: Vec<Item>,
}

/// One SERP element; `item_type` discriminates organic listings from AI overviews
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub item_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub rank_group: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub rank_absolute: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub extended_snippet: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub breadcrumb: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub website_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub markdown: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub references: Vec<Reference>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub items: Vec<SubItem>,
}

impl Item {
    pub fn is_type(&self, item_type: &str) -> bool {
        self.item_type.as_deref() == Some(item_type)
    }
}

/// Nested AI overview element
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubItem {
    #[serde(default, deserialize_with = "lenient")]
    pub markdown: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub references: Vec<Reference>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Component {
    #[serde(default, deserialize_with = "lenient")]
    pub markdown: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub references: Vec<Reference>,
}

/// A citation attached to an AI overview or AI mode answer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reference {
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

impl Reference {
    /// Source label, falling back to the reference title
    pub fn source_label(&self) -> Option<String> {
        non_empty(self.source.as_deref())
            .or_else(|| non_empty(self.title.as_deref()))
            .map(str::to_string)
    }
}

/// Treats empty strings like missing values when choosing between fallbacks
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Decodes any value, mapping null and type mismatches to `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decodes a list, dropping elements of the wrong shape; non-lists become empty
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(elements) => elements
            .into_iter()
            .filter_map(|element| serde_json::from_value(element).ok())
            .collect(),
        _ => Vec::new(),
    })
}
