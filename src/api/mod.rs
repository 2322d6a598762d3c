//! Typed resource clients for the admin API surface.
//!
//! Every collection endpoint shares the same pagination contract: cursor +
//! page size in, `items`/`cursor`/`totalCount` out. [`PageQuery`] renders
//! those as query parameters.

pub mod accounts;
pub mod api_keys;
pub mod environments;
pub mod experiments;
pub mod features;
pub mod goals;
pub mod notifications;
pub mod organizations;
pub mod projects;
pub mod pushes;
pub mod segments;

use strum::AsRefStr;

/// Sort key for collection endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderBy {
    Name,
    CreatedAt,
    UpdatedAt,
}

/// Sort direction for collection endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Common list-endpoint parameters.
///
/// # Example
/// ```
/// use flagdeck::api::{OrderBy, OrderDirection, PageQuery};
///
/// let query = PageQuery::default()
///     .page_size(50)
///     .order_by(OrderBy::CreatedAt, OrderDirection::Desc)
///     .search("checkout");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
    page_size: Option<u32>,
    cursor: Option<String>,
    order_by: Option<OrderBy>,
    order_direction: Option<OrderDirection>,
    search: Option<String>,
}

impl PageQuery {
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Continue from a cursor returned by a previous page.
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn order_by(mut self, key: OrderBy, direction: OrderDirection) -> Self {
        self.order_by = Some(key);
        self.order_direction = Some(direction);
        self
    }

    pub fn search(mut self, keyword: impl Into<String>) -> Self {
        self.search = Some(keyword.into());
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(size) = self.page_size {
            params.push(("pageSize".to_string(), size.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            params.push(("cursor".to_string(), cursor.clone()));
        }
        if let Some(order_by) = self.order_by {
            params.push(("orderBy".to_string(), order_by.as_ref().to_string()));
        }
        if let Some(direction) = self.order_direction {
            params.push((
                "orderDirection".to_string(),
                direction.as_ref().to_string(),
            ));
        }
        if let Some(search) = &self.search {
            params.push(("searchKeyword".to_string(), search.clone()));
        }
        params
    }
}
