//! REST collections exposed by the shipdesk API.

use serde_json::{json, Value};

use shipdesk_list::{
    ChoicesFilter, FieldKind, ListConfig, NullFilter, PaginationMode, QueryStyle, RangeFilter,
    RecordId,
};

use crate::request::{ApiRequest, Method};

/// How a resource changes the status of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRoute {
    /// `PATCH {detail}` with `{"status": ...}`.
    PatchDetail,
    /// `PUT {detail}` with `{"status": ...}`.
    PutDetail,
    /// `PUT {base}{id}/{suffix}` with `{"status": ...}`.
    Put {
        /// Collection path the id is appended to.
        base: &'static str,
        /// Sub-endpoint after the id.
        suffix: &'static str,
    },
}

/// A named REST collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Short name used on the command line.
    pub name: &'static str,
    /// Human-readable plural label.
    pub label: &'static str,
    /// Path listing the collection.
    pub list_path: &'static str,
    /// Collection path that detail ids are appended to.
    pub detail_base: &'static str,
    /// Field identifying a record in detail URLs.
    pub id_field: &'static str,
    /// Spelling of list parameters.
    pub query_style: QueryStyle,
    /// Whether the endpoint paginates.
    pub pagination: PaginationMode,
    /// Status update endpoint, if the resource has a status.
    pub status_route: Option<StatusRoute>,
}

impl Resource {
    /// Shipping marks.
    pub const SHIPPING_MARKS: Self = Self {
        name: "shipping-marks",
        label: "Shipping marks",
        list_path: "/buysellapi/shipping-marks/",
        detail_base: "/buysellapi/shipping-marks/",
        id_field: "id",
        query_style: QueryStyle::Search,
        pagination: PaginationMode::Server,
        status_route: None,
    };

    /// Container trackings.
    pub const TRACKINGS: Self = Self {
        name: "trackings",
        label: "Trackings",
        list_path: "/buysellapi/trackings/",
        detail_base: "/buysellapi/trackings/",
        id_field: "id",
        query_style: QueryStyle::Ordering,
        pagination: PaginationMode::Client,
        status_route: Some(StatusRoute::PatchDetail),
    };

    /// Store products, addressed by slug.
    pub const PRODUCTS: Self = Self {
        name: "products",
        label: "Products",
        list_path: "/buysellapi/products/",
        detail_base: "/buysellapi/products/",
        id_field: "slug",
        query_style: QueryStyle::Ordering,
        pagination: PaginationMode::Client,
        status_route: None,
    };

    /// Customer orders (admin view).
    pub const ORDERS: Self = Self {
        name: "orders",
        label: "Orders",
        list_path: "/buysellapi/admin/orders/",
        detail_base: "/buysellapi/orders/",
        id_field: "id",
        query_style: QueryStyle::Ordering,
        pagination: PaginationMode::Client,
        status_route: Some(StatusRoute::PutDetail),
    };

    /// Buy4me purchase requests (admin view).
    pub const BUY4ME_REQUESTS: Self = Self {
        name: "buy4me",
        label: "Buy4Me requests",
        list_path: "/buysellapi/admin/buy4me-requests/",
        detail_base: "/buysellapi/buy4me-requests/",
        id_field: "id",
        query_style: QueryStyle::Ordering,
        pagination: PaginationMode::Client,
        status_route: Some(StatusRoute::Put {
            base: "/buysellapi/admin/buy4me-requests/",
            suffix: "status/",
        }),
    };

    /// Invoices, paginated by the server.
    pub const INVOICES: Self = Self {
        name: "invoices",
        label: "Invoices",
        list_path: "/buysellapi/invoices/",
        detail_base: "/buysellapi/invoices/",
        id_field: "id",
        query_style: QueryStyle::Ordering,
        pagination: PaginationMode::Server,
        status_route: Some(StatusRoute::PatchDetail),
    };

    /// User accounts.
    pub const USERS: Self = Self {
        name: "users",
        label: "Users",
        list_path: "/buysellapi/users/",
        detail_base: "/buysellapi/users/",
        id_field: "id",
        query_style: QueryStyle::Ordering,
        pagination: PaginationMode::Client,
        status_route: Some(StatusRoute::Put {
            base: "/buysellapi/users/",
            suffix: "update/",
        }),
    };

    /// Product categories, addressed by slug.
    pub const CATEGORIES: Self = Self {
        name: "categories",
        label: "Categories",
        list_path: "/buysellapi/categories/",
        detail_base: "/buysellapi/categories/",
        id_field: "slug",
        query_style: QueryStyle::Ordering,
        pagination: PaginationMode::Client,
        status_route: None,
    };

    /// Every known resource.
    pub const ALL: [Self; 8] = [
        Self::SHIPPING_MARKS,
        Self::TRACKINGS,
        Self::PRODUCTS,
        Self::ORDERS,
        Self::BUY4ME_REQUESTS,
        Self::INVOICES,
        Self::USERS,
        Self::CATEGORIES,
    ];

    /// Looks a resource up by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.name == name)
    }

    /// Path of one record.
    #[must_use]
    pub fn detail_path(&self, id: &RecordId) -> String {
        format!("{}{id}/", self.detail_base)
    }

    /// Path of the status sub-endpoint, if any.
    #[must_use]
    pub fn status_path(&self, id: &RecordId) -> Option<String> {
        match self.status_route? {
            StatusRoute::PatchDetail | StatusRoute::PutDetail => Some(self.detail_path(id)),
            StatusRoute::Put { base, suffix } => Some(format!("{base}{id}/{suffix}")),
        }
    }

    /// Builds the request setting one record's status.
    #[must_use]
    pub fn status_request(&self, id: &RecordId, status: &str) -> Option<ApiRequest> {
        let method = match self.status_route? {
            StatusRoute::PatchDetail => Method::Patch,
            StatusRoute::PutDetail | StatusRoute::Put { .. } => Method::Put,
        };
        let path = self.status_path(id)?;
        Some(ApiRequest::new(method, path).json(status_body(status)))
    }

    /// List view configuration for the admin screen of this resource.
    #[must_use]
    pub fn list_config(&self) -> ListConfig {
        let config = ListConfig::new()
            .id_field(self.id_field)
            .pagination(self.pagination);
        match self.name {
            "orders" | "buy4me" | "invoices" => sales_view(self.name, config),
            _ => logistics_view(self.name, config),
        }
    }
}

/// Columns of the shipping and catalog screens.
fn logistics_view(name: &str, config: ListConfig) -> ListConfig {
    match name {
        "shipping-marks" => config
            .list_display(&["markId", "name", "fullAddress", "createdAt"])
            // the endpoint always returns newest first; no sortable columns
            .search_fields(&["markId", "name", "fullAddress", "shippingMark"]),
        "trackings" => config
            .list_display(&["tracking_number", "shipping_mark", "status", "cbm", "eta"])
            .search_fields(&["tracking_number", "shipping_mark", "container_number", "eta"])
            .sortable("tracking_number", FieldKind::Text)
            .sortable("shipping_mark", FieldKind::Text)
            .sortable("status", FieldKind::Text)
            .sortable("cbm", FieldKind::Number)
            .sortable("date_added", FieldKind::Date)
            .ordering("-date_added")
            .filter(
                ChoicesFilter::new("status", "Status")
                    .choice("pending", "Pending")
                    .choice("in_transit", "In transit")
                    .choice("arrived", "Arrived")
                    .choice("delivered", "Delivered"),
            )
            .filter(NullFilter::new("eta", "ETA")),
        "products" => config
            .list_display(&["name", "price", "stock", "created_at"])
            .search_fields(&["name", "description", "slug"])
            .sortable("name", FieldKind::Text)
            .sortable("price", FieldKind::Number)
            .sortable("stock", FieldKind::Number)
            .sortable("created_at", FieldKind::Date)
            .filter(
                RangeFilter::new("stock", "Stock")
                    .range("out", "Out of stock", None, Some(0))
                    .range("low", "Low (1-10)", Some(1), Some(10))
                    .range("in", "In stock (11+)", Some(11), None),
            ),
        "users" => config
            .list_display(&["username", "full_name", "email", "status", "date_joined"])
            .search_fields(&[
                "username",
                "full_name",
                "email",
                "shipping_mark.mark_id",
                "shipping_mark.name",
            ])
            .sortable("username", FieldKind::Text)
            .sortable("email", FieldKind::Text)
            .sortable("date_joined", FieldKind::Date)
            .ordering("-date_joined"),
        "categories" => config
            .list_display(&["name", "slug"])
            .search_fields(&["name", "slug"])
            .sortable("name", FieldKind::Text)
            .ordering("name"),
        _ => config,
    }
}

/// Columns of the order, Buy4me and invoice screens.
fn sales_view(name: &str, config: ListConfig) -> ListConfig {
    match name {
        "orders" => config
            .list_display(&["id", "customer_name", "status", "total_amount", "created_at"])
            .search_fields(&["id", "customer_name", "customer_email", "customer_phone"])
            .sortable("id", FieldKind::Number)
            .sortable("status", FieldKind::Text)
            .sortable("total_amount", FieldKind::Number)
            .sortable("created_at", FieldKind::Date)
            .ordering("-created_at")
            .filter(
                ChoicesFilter::new("status", "Status")
                    .choice("pending", "Pending")
                    .choice("processing", "Processing")
                    .choice("shipped", "Shipped")
                    .choice("delivered", "Delivered")
                    .choice("cancelled", "Cancelled"),
            ),
        "buy4me" => config
            .list_display(&["id", "title", "user_email", "status", "created_at"])
            .search_fields(&["title", "user_email", "product_url", "tracking_number"])
            .sortable("id", FieldKind::Number)
            .sortable("status", FieldKind::Text)
            .sortable("created_at", FieldKind::Date)
            .ordering("-created_at")
            .filter(
                ChoicesFilter::new("status", "Status")
                    .choice("pending", "Pending")
                    .choice("quoted", "Quoted")
                    .choice("paid", "Paid")
                    .choice("ordered", "Ordered")
                    .choice("shipped", "Shipped")
                    .choice("delivered", "Delivered")
                    .choice("cancelled", "Cancelled"),
            ),
        "invoices" => config
            .list_display(&[
                "invoice_number",
                "customer_name",
                "total_amount",
                "status",
                "created_at",
            ])
            .search_fields(&["invoice_number", "customer_name", "customer_email"])
            .sortable("invoice_number", FieldKind::Text)
            .sortable("total_amount", FieldKind::Number)
            .sortable("created_at", FieldKind::Date)
            .ordering("-created_at")
            .filter(
                ChoicesFilter::new("status", "Status")
                    .choice("draft", "Draft")
                    .choice("pending", "Pending")
                    .choice("paid", "Paid")
                    .choice("overdue", "Overdue")
                    .choice("cancelled", "Cancelled"),
            ),
        _ => config,
    }
}

fn status_body(status: &str) -> Value {
    json!({ "status": status })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(Resource::by_name("orders"), Some(Resource::ORDERS));
        assert_eq!(Resource::by_name("containers"), None);
        for resource in Resource::ALL {
            assert_eq!(Resource::by_name(resource.name), Some(resource));
        }
    }

    #[test]
    fn test_detail_path() {
        let id = RecordId::from("iphone-15");
        assert_eq!(
            Resource::PRODUCTS.detail_path(&id),
            "/buysellapi/products/iphone-15/"
        );
    }

    #[test]
    fn test_status_requests() {
        let id = RecordId::from(12_u64);

        let req = Resource::BUY4ME_REQUESTS.status_request(&id, "paid").unwrap();
        assert_eq!(req.method, Method::Put);
        assert_eq!(req.path, "/buysellapi/admin/buy4me-requests/12/status/");
        assert_eq!(req.body, Some(json!({"status": "paid"})));

        let req = Resource::TRACKINGS.status_request(&id, "arrived").unwrap();
        assert_eq!(req.method, Method::Patch);
        assert_eq!(req.path, "/buysellapi/trackings/12/");

        let req = Resource::USERS.status_request(&id, "suspended").unwrap();
        assert_eq!(req.path, "/buysellapi/users/12/update/");

        assert!(Resource::PRODUCTS.status_request(&id, "x").is_none());
    }

    #[test]
    fn test_list_configs() {
        let config = Resource::ORDERS.list_config();
        assert_eq!(config.field_kind("created_at"), Some(FieldKind::Date));
        assert!(config.filter_for("status").is_some());

        let config = Resource::SHIPPING_MARKS.list_config();
        assert_eq!(config.pagination, PaginationMode::Server);

        let config = Resource::PRODUCTS.list_config();
        assert_eq!(config.id_field, "slug");
        assert!(config.filter_for("stock").is_some());

        let config = Resource::INVOICES.list_config();
        assert_eq!(config.pagination, PaginationMode::Server);
        assert!(config.filter_for("status").is_some());
    }
}
