use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commerce::{Cart, CommerceError, Product};

/// The effect of a cart mutation that was addressed by item rather than by user.
///
/// Carries the owning user so callers can find the cache keys to invalidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartChange {
    pub user_id: Uuid,
    /// The cart after the mutation, or `None` when it became empty and was deleted.
    pub cart: Option<Cart>,
}

impl CartChange {
    pub fn was_deleted(&self) -> bool {
        self.cart.is_none()
    }
}

/// Inclusive price bounds. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl PriceRange {
    /// Creates a range, rejecting a lower bound above the upper bound.
    pub fn new(min: Option<u64>, max: Option<u64>) -> Result<Self, CommerceError> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(CommerceError::InvalidPriceRange { min, max });
            }
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, price: u64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

/// Ordering of a product search. Unknown values fall back to ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSort {
    #[default]
    PriceAsc,
    PriceDesc,
}

impl PriceSort {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("price_desc") => PriceSort::PriceDesc,
            _ => PriceSort::PriceAsc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSort::PriceAsc => "price_asc",
            PriceSort::PriceDesc => "price_desc",
        }
    }
}

impl fmt::Display for PriceSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page of a listing. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    /// Creates a page. `limit` is capped at [`Page::MAX_LIMIT`].
    pub fn new(number: u32, limit: u32) -> Result<Self, CommerceError> {
        if number == 0 {
            return Err(CommerceError::InvalidPagination("page"));
        }
        if limit == 0 {
            return Err(CommerceError::InvalidPagination("limit"));
        }
        Ok(Self {
            number,
            limit: limit.min(Self::MAX_LIMIT),
        })
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Price-filtered, price-sorted, paginated product query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSearch {
    pub price: PriceRange,
    pub sort: PriceSort,
    pub page: Page,
}

impl ProductSearch {
    /// Runs the search over an unordered set of products.
    ///
    /// Products with equal prices are ordered by name, then ID, so that
    /// consecutive pages never overlap.
    pub fn apply(&self, products: impl IntoIterator<Item = Product>) -> Vec<Product> {
        let mut matching: Vec<Product> = products
            .into_iter()
            .filter(|p| self.price.contains(p.price))
            .collect();
        matching.sort_by(|a, b| {
            let by_price = match self.sort {
                PriceSort::PriceAsc => a.price.cmp(&b.price),
                PriceSort::PriceDesc => b.price.cmp(&a.price),
            };
            by_price.then_with(|| a.name.cmp(&b.name)).then_with(|| a.id.cmp(&b.id))
        });
        matching
            .into_iter()
            .skip(usize::try_from(self.page.offset()).unwrap_or(usize::MAX))
            .take(self.page.limit as usize)
            .collect()
    }
}
