//! The marketplace list endpoints and how a `ListQuery` maps onto each.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::{ApiClient, ListSource};
use crate::error::Result;
use crate::list::ListPage;
use crate::query::{ListQuery, join_ids};
use crate::types::{Category, Order, OrderItem, Product, Promotion};

/// Query-string pairs for one request.
pub type QueryParams = Vec<(String, String)>;

type ParamBuilder = Arc<dyn Fn(&ListQuery) -> QueryParams + Send + Sync>;

/// A list endpoint of the marketplace API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Products,
    Trending,
    NewArrivals,
    Deals,
    MerchantOrders,
    CustomerOrders,
    Promotions,
    Categories,
}

impl Resource {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Resource::Products => "api/v1/product",
            Resource::Trending => "api/v1/trending-product",
            Resource::NewArrivals => "api/v1/new-arrival-product",
            Resource::Deals => "api/v1/dealofday-product",
            Resource::MerchantOrders => "api/v1/order/orderbymerchant",
            Resource::CustomerOrders => "api/v1/order/getorderbystatus",
            Resource::Promotions => "api/v1/promotion",
            Resource::Categories => "api/v1/categories/getall",
        }
    }

    /// Field of the `data` object holding the item array.
    pub fn items_field(&self) -> &'static str {
        match self {
            Resource::Products => "product",
            Resource::Trending | Resource::NewArrivals | Resource::Deals => "products",
            Resource::MerchantOrders => "order_items",
            Resource::CustomerOrders => "order",
            Resource::Promotions => "promotion",
            Resource::Categories => "category",
        }
    }

    /// Path of the app page that shows this list, used for filter URLs.
    pub fn app_path(&self) -> &'static str {
        match self {
            Resource::Products => "/application/product/list",
            Resource::Trending => "/trending",
            Resource::NewArrivals => "/new-arrival",
            Resource::Deals => "/deal-of-the-day",
            Resource::MerchantOrders => "/merchant/order/list",
            Resource::CustomerOrders => "/profile/orders",
            Resource::Promotions => "/promotion",
            Resource::Categories => "/category",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Resource::Products => "products",
            Resource::Trending => "trending products",
            Resource::NewArrivals => "new arrivals",
            Resource::Deals => "deals of the day",
            Resource::MerchantOrders => "merchant orders",
            Resource::CustomerOrders => "orders",
            Resource::Promotions => "promotions",
            Resource::Categories => "categories",
        }
    }

    /// Whether the endpoint pages its results. The category list does not.
    pub fn is_paginated(&self) -> bool {
        !matches!(self, Resource::Categories)
    }
}

/// A [`ListSource`] backed by one API endpoint.
pub struct ResourceSource<T> {
    client: ApiClient,
    resource: Resource,
    build: ParamBuilder,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceSource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            resource: self.resource,
            build: Arc::clone(&self.build),
            _item: PhantomData,
        }
    }
}

impl<T> ResourceSource<T> {
    pub fn new(
        client: ApiClient,
        resource: Resource,
        build: impl Fn(&ListQuery) -> QueryParams + Send + Sync + 'static,
    ) -> Self {
        Self {
            client,
            resource,
            build: Arc::new(build),
            _item: PhantomData,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Query-string pairs this source sends for `query`.
    pub fn params(&self, query: &ListQuery) -> QueryParams {
        (self.build)(query)
    }
}

impl ResourceSource<Product> {
    pub fn products(client: ApiClient) -> Self {
        Self::new(client, Resource::Products, product_params)
    }

    pub fn trending(client: ApiClient) -> Self {
        Self::new(client, Resource::Trending, trending_params)
    }

    pub fn new_arrivals(client: ApiClient) -> Self {
        Self::new(client, Resource::NewArrivals, new_arrival_params)
    }

    pub fn deals(client: ApiClient) -> Self {
        Self::new(client, Resource::Deals, page_params)
    }
}

impl ResourceSource<OrderItem> {
    pub fn merchant_orders(client: ApiClient, merchant_id: u64) -> Self {
        Self::new(client, Resource::MerchantOrders, move |query| {
            merchant_order_params(merchant_id, query)
        })
    }
}

impl ResourceSource<Order> {
    pub fn customer_orders(client: ApiClient, user_id: u64) -> Self {
        Self::new(client, Resource::CustomerOrders, move |query| {
            customer_order_params(user_id, query)
        })
    }
}

impl ResourceSource<Promotion> {
    pub fn promotions(client: ApiClient) -> Self {
        Self::new(client, Resource::Promotions, page_params)
    }
}

impl ResourceSource<Category> {
    pub fn categories(client: ApiClient) -> Self {
        Self::new(client, Resource::Categories, |_| QueryParams::new())
    }
}

impl<T> ListSource for ResourceSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Item = T;

    async fn fetch_page(
        &self,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> Result<ListPage<T>> {
        let params = self.params(query);
        tracing::debug!(
            endpoint = self.resource.endpoint(),
            query = %query,
            "fetching list page"
        );
        let items = self
            .client
            .get_list(
                self.resource.endpoint(),
                &params,
                self.resource.items_field(),
                cancel,
            )
            .await?;
        if self.resource.is_paginated() {
            Ok(ListPage::new(items, query.per_page))
        } else {
            Ok(ListPage::complete(items))
        }
    }
}

/// `page` and `per_page`, sent by every paginated endpoint.
pub fn page_params(query: &ListQuery) -> QueryParams {
    vec![
        ("page".to_string(), query.page.to_string()),
        ("per_page".to_string(), query.per_page.to_string()),
    ]
}

fn push_ids(params: &mut QueryParams, key: &str, ids: &[u64]) {
    if !ids.is_empty() {
        params.push((key.to_string(), join_ids(ids)));
    }
}

fn push_status(params: &mut QueryParams, status: Option<u32>) {
    if let Some(status) = status {
        params.push(("status".to_string(), status.to_string()));
    }
}

pub fn product_params(query: &ListQuery) -> QueryParams {
    let mut params = page_params(query);
    push_ids(&mut params, "category_id", &query.filters.category_ids);
    push_ids(&mut params, "shop_id", &query.filters.shop_ids);
    params
}

pub fn trending_params(query: &ListQuery) -> QueryParams {
    let mut params = page_params(query);
    push_ids(&mut params, "category_id", &query.filters.category_ids);
    params
}

/// New arrivals take their category from the generic `filter` option,
/// falling back to explicit category ids.
pub fn new_arrival_params(query: &ListQuery) -> QueryParams {
    let mut params = page_params(query);
    let categories = if query.filters.options.is_empty() {
        &query.filters.category_ids
    } else {
        &query.filters.options
    };
    push_ids(&mut params, "category_id", categories);
    if !query.sort.is_default() {
        params.push(("sort".to_string(), query.sort.to_string()));
    }
    params
}

pub fn merchant_order_params(merchant_id: u64, query: &ListQuery) -> QueryParams {
    let mut params = vec![("merchant_id".to_string(), merchant_id.to_string())];
    params.extend(page_params(query));
    push_ids(&mut params, "category_id", &query.filters.category_ids);
    push_status(&mut params, query.filters.status);
    params
}

pub fn customer_order_params(user_id: u64, query: &ListQuery) -> QueryParams {
    let mut params = vec![("user_id".to_string(), user_id.to_string())];
    params.extend(page_params(query));
    push_status(&mut params, query.filters.status);
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ListFilters, SortOption};

    fn pairs(params: &QueryParams) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_product_params_omit_empty_filters() {
        let query = ListQuery::new(10).at_page(3);
        assert_eq!(
            pairs(&product_params(&query)),
            vec![("page", "3"), ("per_page", "10")]
        );
    }

    #[test]
    fn test_product_params_join_id_lists() {
        let query = ListQuery::new(20).with_filters(
            ListFilters::new()
                .with_categories(vec![1, 2])
                .with_shops(vec![7]),
        );
        assert_eq!(
            pairs(&product_params(&query)),
            vec![
                ("page", "1"),
                ("per_page", "20"),
                ("category_id", "1,2"),
                ("shop_id", "7")
            ]
        );
    }

    #[test]
    fn test_trending_ignores_shop_filter() {
        let query = ListQuery::new(5).with_filters(
            ListFilters::new()
                .with_categories(vec![4])
                .with_shops(vec![7]),
        );
        let params = trending_params(&query);
        assert!(params.iter().all(|(k, _)| k != "shop_id"));
        assert!(params.contains(&("category_id".to_string(), "4".to_string())));
    }

    #[test]
    fn test_new_arrival_params_use_filter_option_and_sort() {
        let query = ListQuery::new(10)
            .with_filters(ListFilters::new().with_options(vec![8]).with_categories(vec![1]))
            .with_sort(SortOption::PriceDesc);
        assert_eq!(
            pairs(&new_arrival_params(&query)),
            vec![
                ("page", "1"),
                ("per_page", "10"),
                ("category_id", "8"),
                ("sort", "price_desc")
            ]
        );

        let fallback =
            ListQuery::new(10).with_filters(ListFilters::new().with_categories(vec![1]));
        assert!(
            new_arrival_params(&fallback).contains(&("category_id".to_string(), "1".to_string()))
        );
    }

    #[test]
    fn test_order_params() {
        let query = ListQuery::new(10).with_filters(
            ListFilters::new()
                .with_categories(vec![3])
                .with_status(Some(2)),
        );
        assert_eq!(
            pairs(&merchant_order_params(42, &query)),
            vec![
                ("merchant_id", "42"),
                ("page", "1"),
                ("per_page", "10"),
                ("category_id", "3"),
                ("status", "2")
            ]
        );
        assert_eq!(
            pairs(&customer_order_params(9, &query)),
            vec![
                ("user_id", "9"),
                ("page", "1"),
                ("per_page", "10"),
                ("status", "2")
            ]
        );
    }

    #[test]
    fn test_resource_endpoints_and_fields() {
        assert_eq!(Resource::Products.items_field(), "product");
        assert_eq!(Resource::Deals.endpoint(), "api/v1/dealofday-product");
        assert_eq!(Resource::MerchantOrders.items_field(), "order_items");
        assert_eq!(Resource::CustomerOrders.items_field(), "order");
        assert_eq!(Resource::Categories.endpoint(), "api/v1/categories/getall");
        assert!(!Resource::Categories.is_paginated());
        assert!(Resource::Promotions.is_paginated());
    }

    #[test]
    fn test_categories_send_no_params() {
        let client = ApiClient::new("http://localhost:1").unwrap();
        let source = ResourceSource::categories(client);
        assert!(source.params(&ListQuery::new(10).at_page(2)).is_empty());
    }

    #[test]
    fn test_source_uses_its_builder() {
        let client = ApiClient::new("http://localhost:1").unwrap();
        let source = ResourceSource::merchant_orders(client, 5);
        assert_eq!(source.resource(), Resource::MerchantOrders);
        assert_eq!(source.params(&ListQuery::new(2))[0].1, "5");
    }
}
