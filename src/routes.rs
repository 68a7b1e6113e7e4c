//! Route table and hash parsing.
//!
//! Routing here is membership-only: a page name is navigable iff it is in
//! the [`RouteTable`]. Everything else resolves to the default page.

use crate::error::ConfigError;
use std::collections::BTreeSet;

/// Fixed set of navigable logical pages plus the fallback page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pages: BTreeSet<String>,
    default_page: String,
}

impl RouteTable {
    /// Build a table. The default page must be one of `pages`.
    pub fn new<I, S>(pages: I, default_page: impl Into<String>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages: BTreeSet<String> = pages
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.is_empty())
            .collect();
        let default_page = default_page.into();
        if !pages.contains(&default_page) {
            return Err(ConfigError::Invalid {
                message: format!("default page '{}' is not a route", default_page),
            });
        }
        Ok(Self {
            pages,
            default_page,
        })
    }

    /// Whether `page` is navigable.
    pub fn contains(&self, page: &str) -> bool {
        self.pages.contains(page)
    }

    /// The fallback page for unknown names.
    pub fn default_page(&self) -> &str {
        &self.default_page
    }

    /// `requested` if navigable, otherwise the default page.
    pub fn resolve<'a>(&'a self, requested: &'a str) -> &'a str {
        if self.contains(requested) {
            requested
        } else {
            &self.default_page
        }
    }

    /// All pages, sorted.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(String::as_str)
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always `false`: a table holds at least its default page.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Page name carried by a location hash: `"#world"` → `Some("world")`.
///
/// An absent or empty hash yields `None`; the caller falls back to the
/// default page.
pub fn page_from_hash(hash: &str) -> Option<&str> {
    let page = hash.strip_prefix('#').unwrap_or(hash);
    (!page.is_empty()).then_some(page)
}
