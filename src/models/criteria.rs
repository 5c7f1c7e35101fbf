use serde::{Deserialize, Serialize};

/// Which field the search query matches against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBy {
    #[default]
    Name,
    Issue,
}

impl SearchBy {
    pub fn label(self) -> &'static str {
        match self {
            SearchBy::Name => "Repository Name",
            SearchBy::Issue => "Issue Title",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SearchBy::Name => SearchBy::Issue,
            SearchBy::Issue => SearchBy::Name,
        }
    }
}

/// Last-used search form values, persisted as a single JSON slot so the
/// search view can restore them after navigating away.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub search_by: SearchBy,
    pub query: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stars: Option<u32>,
}
