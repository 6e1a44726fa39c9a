//! Breed taxonomy loading and flattening
//!
//! The taxonomy source returns `category -> [subcategory]`. The selector needs
//! a flat list of `{id, label}` options:
//! - A category without subcategories becomes one option keyed by the category
//! - Each subcategory becomes `category/sub` labelled `"sub category"`

use crate::error::TaxonomyError;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Status reported by a healthy taxonomy response
pub const SUCCESS_STATUS: &str = "success";

/// `GET /breeds/list/all` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedsResponse {
    /// Category name to subcategory names
    pub message: IndexMap<String, Vec<String>>,
    pub status: String,
}

/// Selector option derived from the taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonomyOption {
    /// `category` or `category/subcategory`
    pub id: String,
    pub label: String,
}

impl TaxonomyOption {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Source of the breed taxonomy
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxonomySource: Send + Sync {
    /// Fetch the raw category mapping
    async fn fetch_breeds(&self) -> Result<BreedsResponse, TaxonomyError>;
}

/// Flatten a category mapping into selector options
#[must_use]
pub fn flatten(categories: &IndexMap<String, Vec<String>>) -> Vec<TaxonomyOption> {
    let mut options = Vec::with_capacity(categories.values().map(|s| s.len().max(1)).sum());

    for (category, subcategories) in categories {
        if subcategories.is_empty() {
            options.push(TaxonomyOption::new(category.clone(), category.clone()));
            continue;
        }
        options.extend(subcategories.iter().map(|sub| {
            TaxonomyOption::new(format!("{category}/{sub}"), format!("{sub} {category}"))
        }));
    }

    options
}

/// Fetch and flatten the taxonomy
///
/// # Errors
/// Returns the source error unchanged; the caller decides how to degrade.
pub async fn load_options(
    source: &dyn TaxonomySource,
) -> Result<Vec<TaxonomyOption>, TaxonomyError> {
    let response = source.fetch_breeds().await?;

    if response.status != SUCCESS_STATUS {
        tracing::warn!(status = %response.status, "taxonomy reported non-success status");
    }

    let options = flatten(&response.message);
    tracing::debug!(
        categories = response.message.len(),
        options = options.len(),
        "taxonomy flattened"
    );
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn mapping(entries: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(c, subs)| ((*c).to_string(), subs.iter().map(|s| (*s).to_string()).collect()))
            .collect()
    }

    #[test]
    fn empty_category_yields_single_option() {
        let options = flatten(&mapping(&[("pug", &[])]));
        assert_eq!(options, vec![TaxonomyOption::new("pug", "pug")]);
    }

    #[test]
    fn subcategories_yield_composite_ids() {
        let options = flatten(&mapping(&[("cat", &["a", "b"])]));

        assert_eq!(options.len(), 2);
        assert!(options.contains(&TaxonomyOption::new("cat/a", "a cat")));
        assert!(options.contains(&TaxonomyOption::new("cat/b", "b cat")));
        assert!(!options.iter().any(|o| o.id == "cat"));
    }

    #[test]
    fn empty_mapping_yields_nothing() {
        assert!(flatten(&IndexMap::new()).is_empty());
    }

    #[tokio::test]
    async fn load_options_flattens_source() {
        let mut source = MockTaxonomySource::new();
        source.expect_fetch_breeds().times(1).returning(|| {
            Ok(BreedsResponse {
                message: mapping(&[("hound", &["afghan", "basset"]), ("pug", &[])]),
                status: SUCCESS_STATUS.to_string(),
            })
        });

        let options = load_options(&source).await.unwrap();
        assert_eq!(options.len(), 3);
    }

    #[tokio::test]
    async fn load_options_keeps_message_on_odd_status() {
        let mut source = MockTaxonomySource::new();
        source.expect_fetch_breeds().returning(|| {
            Ok(BreedsResponse {
                message: mapping(&[("pug", &[])]),
                status: "degraded".to_string(),
            })
        });

        let options = load_options(&source).await.unwrap();
        assert_eq!(options, vec![TaxonomyOption::new("pug", "pug")]);
    }

    #[tokio::test]
    async fn load_options_propagates_failure() {
        let mut source = MockTaxonomySource::new();
        source
            .expect_fetch_breeds()
            .returning(|| Err(TaxonomyError::Transport("offline".to_string())));

        assert!(load_options(&source).await.is_err());
    }

    proptest! {
        #[test]
        fn prop_every_pair_appears_exactly_once(
            raw in prop::collection::btree_map(
                "[a-z]{1,8}",
                prop::collection::btree_set("[a-z]{1,8}", 0..5),
                0..8,
            )
        ) {
            let categories: IndexMap<String, Vec<String>> = raw
                .iter()
                .map(|(c, subs)| (c.clone(), subs.iter().cloned().collect()))
                .collect();

            let options = flatten(&categories);
            let expected: usize = categories.values().map(|s| s.len().max(1)).sum();
            prop_assert_eq!(options.len(), expected);

            let ids: HashSet<&str> = options.iter().map(|o| o.id.as_str()).collect();
            prop_assert_eq!(ids.len(), options.len());

            for (category, subs) in &categories {
                if subs.is_empty() {
                    prop_assert!(options.contains(&TaxonomyOption::new(category.clone(), category.clone())));
                } else {
                    for sub in subs {
                        let option = TaxonomyOption::new(format!("{category}/{sub}"), format!("{sub} {category}"));
                        prop_assert!(options.contains(&option));
                    }
                }
            }
        }
    }
}
