//! Builders for pairs, pages and pre-filled caches.

use std::sync::Arc;

use crate::cache::{QueryCache, QueryData, QueryKey};
use crate::domain::{Category, PairId, TokenPair};
use crate::source::PairPage;

/// Create a pair whose symbol is the upper-cased id.
pub fn pair(id: &str, category: Category, price: f64) -> TokenPair {
    TokenPair::new(id, id.to_uppercase(), category, price)
}

/// `n` pairs `token-0 .. token-{n-1}` in `category`, priced `10.0 + i`.
pub fn make_pairs(n: usize, category: Category) -> Vec<TokenPair> {
    (0..n)
        .map(|i| pair(&format!("token-{i}"), category, 10.0 + i as f64))
        .collect()
}

/// Wrap pairs in a page reporting `total = pairs.len()`.
pub fn page(pairs: Vec<TokenPair>, has_more: bool) -> PairPage {
    PairPage {
        total: pairs.len(),
        pairs,
        has_more,
    }
}

/// A cache holding one `new` column page of [`make_pairs`]`(n)`.
pub fn column_cache(n: usize) -> Arc<QueryCache> {
    let cache = Arc::new(QueryCache::default());
    cache.set_data(
        &QueryKey::Column(Category::New),
        QueryData::Pages(vec![page(make_pairs(n, Category::New), false)]),
    );
    cache
}

/// The cached copy of `token-{i}`.
///
/// # Panics
///
/// Panics if the cache does not hold that pair.
pub fn pair_at(cache: &QueryCache, i: usize) -> TokenPair {
    let id = PairId::new(format!("token-{i}"));
    cache
        .pair(&id)
        .unwrap_or_else(|| panic!("{id} is not cached"))
}
