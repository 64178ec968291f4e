use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Surface a write arrived through; stored as the revision's `method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Transport {
    Http,
    Grpc,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Http => "HTTP",
            Transport::Grpc => "GRPC",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "HTTP" => Ok(Transport::Http),
            "GRPC" => Ok(Transport::Grpc),
            other => Err(format!("unknown transport `{other}`")),
        }
    }
}

/// The two taxonomies attached to revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    Category,
    Tag,
}

impl TaxonomyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::Tag => "tag",
        }
    }

    pub(crate) fn table(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::Tag => "tag",
        }
    }

    pub(crate) fn link_table(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "post_categories",
            TaxonomyKind::Tag => "post_tags",
        }
    }

    pub(crate) fn link_column(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category_id",
            TaxonomyKind::Tag => "tag_id",
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
