mod envelope;
mod error;
mod operations;
mod requests;
mod types;

pub use envelope::{ApiResponse, ResponseStatus};
pub use error::CommerceError;
pub use operations::{
    add_cart_item, line_total, order_total, remove_cart_item, remove_cart_items,
    set_cart_item_quantity, validate_product, validate_status_transition, validate_user,
};
pub use requests::{
    AddCartItemRequest, CreateOrderRequest, CreateProductRequest, CreateUserRequest,
    ListOrdersQuery, ListProductsQuery, ProductSearchQuery, RemoveCartItemsRequest,
    UpdateCartItemRequest, UpdateOrderStatusRequest, UpdateProductRequest, UpdateUserRequest,
};
pub use types::{Cart, CartItem, Order, OrderLine, OrderStatus, Product, ProductCount, User};
