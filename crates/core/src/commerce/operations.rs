use chrono::Utc;
use uuid::Uuid;

use super::error::CommerceError;
use super::types::{Cart, CartItem, OrderLine, OrderStatus, Product, User};

/// Price of `quantity` units, saturating instead of overflowing.
pub fn line_total(unit_price: u64, quantity: u32) -> u64 {
    unit_price.saturating_mul(u64::from(quantity))
}

/// Sum of all order lines.
pub fn order_total(lines: &[OrderLine]) -> u64 {
    lines
        .iter()
        .map(|line| line_total(line.unit_price, line.quantity))
        .fold(0u64, u64::saturating_add)
}

/// Validates a user before creation or update.
pub fn validate_user(user: &User) -> Result<(), CommerceError> {
    if user.name.trim().is_empty() {
        return Err(CommerceError::MissingField("name"));
    }
    if user.name.len() > 100 {
        return Err(CommerceError::TooLong {
            field: "name",
            max: 100,
        });
    }
    Ok(())
}

/// Validates a product before creation or update.
pub fn validate_product(product: &Product) -> Result<(), CommerceError> {
    if product.name.trim().is_empty() {
        return Err(CommerceError::MissingField("name"));
    }
    if product.name.len() > 200 {
        return Err(CommerceError::TooLong {
            field: "name",
            max: 200,
        });
    }
    if product.product_type.trim().is_empty() {
        return Err(CommerceError::MissingField("product_type"));
    }
    Ok(())
}

/// Appends an item to a cart, rejecting a second line for the same product.
pub fn add_cart_item(cart: &mut Cart, item: CartItem) -> Result<(), CommerceError> {
    if cart.items.iter().any(|i| i.product_id == item.product_id) {
        return Err(CommerceError::DuplicateProduct(item.product_id));
    }
    cart.items.push(item);
    cart.updated_at = Utc::now();
    Ok(())
}

/// Removes one item by its item ID and returns it.
pub fn remove_cart_item(cart: &mut Cart, item_id: Uuid) -> Result<CartItem, CommerceError> {
    let index = cart
        .items
        .iter()
        .position(|i| i.id == item_id)
        .ok_or(CommerceError::ItemNotFound(item_id))?;
    cart.updated_at = Utc::now();
    Ok(cart.items.remove(index))
}

/// Removes every item whose ID is listed. Returns how many were removed.
pub fn remove_cart_items(cart: &mut Cart, item_ids: &[Uuid]) -> usize {
    let before = cart.items.len();
    cart.items.retain(|i| !item_ids.contains(&i.id));
    let removed = before - cart.items.len();
    if removed > 0 {
        cart.updated_at = Utc::now();
    }
    removed
}

/// Sets the quantity of the line holding `product_id` and recomputes its total.
pub fn set_cart_item_quantity(
    cart: &mut Cart,
    product_id: Uuid,
    quantity: u32,
) -> Result<(), CommerceError> {
    if quantity == 0 {
        return Err(CommerceError::InvalidQuantity);
    }
    let item = cart
        .items
        .iter_mut()
        .find(|i| i.product_id == product_id)
        .ok_or(CommerceError::ItemNotFound(product_id))?;
    item.quantity = quantity;
    item.total_price = line_total(item.unit_price, quantity);
    cart.updated_at = Utc::now();
    Ok(())
}

/// Checks that an order may move from `from` to `to`.
///
/// Setting the current status again is accepted as a no-op.
pub fn validate_status_transition(from: OrderStatus, to: OrderStatus) -> Result<(), CommerceError> {
    use OrderStatus::*;

    let allowed = from == to
        || matches!(
            (from, to),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Shipping)
                | (Confirmed, Cancelled)
                | (Shipping, Delivered)
        );
    if allowed {
        Ok(())
    } else {
        Err(CommerceError::InvalidStatusTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: Uuid, unit_price: u64, quantity: u32) -> CartItem {
        CartItem {
            id: Uuid::new_v4(),
            product_id,
            name: "Monitor".to_string(),
            image: None,
            color: None,
            unit_price,
            quantity,
            discount: None,
            total_price: line_total(unit_price, quantity),
        }
    }

    #[test]
    fn test_line_total_saturates() {
        assert_eq!(line_total(250, 4), 1_000);
        assert_eq!(line_total(u64::MAX, 2), u64::MAX);
    }

    #[test]
    fn test_order_total() {
        let lines = vec![
            OrderLine {
                product_id: Uuid::new_v4(),
                name: "A".to_string(),
                quantity: 2,
                unit_price: 100,
            },
            OrderLine {
                product_id: Uuid::new_v4(),
                name: "B".to_string(),
                quantity: 1,
                unit_price: 50,
            },
        ];
        assert_eq!(order_total(&lines), 250);
        assert_eq!(order_total(&[]), 0);
    }

    #[test]
    fn test_add_duplicate_product_rejected() {
        let mut cart = Cart::new(Uuid::new_v4());
        let product_id = Uuid::new_v4();
        add_cart_item(&mut cart, item(product_id, 100, 1)).unwrap();

        let result = add_cart_item(&mut cart, item(product_id, 100, 2));

        assert_eq!(result, Err(CommerceError::DuplicateProduct(product_id)));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_item_by_id() {
        let mut cart = Cart::new(Uuid::new_v4());
        let first = item(Uuid::new_v4(), 100, 1);
        let second = item(Uuid::new_v4(), 200, 1);
        let first_id = first.id;
        add_cart_item(&mut cart, first).unwrap();
        add_cart_item(&mut cart, second).unwrap();

        let removed = remove_cart_item(&mut cart, first_id).unwrap();

        assert_eq!(removed.id, first_id);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(
            remove_cart_item(&mut cart, first_id),
            Err(CommerceError::ItemNotFound(first_id))
        );
    }

    #[test]
    fn test_remove_many_items() {
        let mut cart = Cart::new(Uuid::new_v4());
        let items: Vec<CartItem> = (0..3).map(|_| item(Uuid::new_v4(), 10, 1)).collect();
        let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        for i in items {
            add_cart_item(&mut cart, i).unwrap();
        }

        let removed = remove_cart_items(&mut cart, &[ids[0], ids[2], Uuid::new_v4()]);

        assert_eq!(removed, 2);
        assert_eq!(cart.items[0].id, ids[1]);
    }

    #[test]
    fn test_set_quantity_recomputes_total() {
        let mut cart = Cart::new(Uuid::new_v4());
        let product_id = Uuid::new_v4();
        add_cart_item(&mut cart, item(product_id, 150, 1)).unwrap();

        set_cart_item_quantity(&mut cart, product_id, 4).unwrap();

        assert_eq!(cart.items[0].quantity, 4);
        assert_eq!(cart.items[0].total_price, 600);
        assert_eq!(
            set_cart_item_quantity(&mut cart, product_id, 0),
            Err(CommerceError::InvalidQuantity)
        );
    }

    #[test]
    fn test_status_transitions() {
        use OrderStatus::*;
        assert!(validate_status_transition(Pending, Confirmed).is_ok());
        assert!(validate_status_transition(Confirmed, Cancelled).is_ok());
        assert!(validate_status_transition(Shipping, Delivered).is_ok());
        assert!(validate_status_transition(Shipping, Shipping).is_ok());
        assert!(validate_status_transition(Shipping, Cancelled).is_err());
        assert!(validate_status_transition(Delivered, Pending).is_err());
        assert!(validate_status_transition(Cancelled, Confirmed).is_err());
    }

    #[test]
    fn test_validate_user_and_product() {
        assert!(validate_user(&User::new("Ann")).is_ok());
        assert_eq!(
            validate_user(&User::new("  ")),
            Err(CommerceError::MissingField("name"))
        );
        assert!(validate_product(&Product::new("X1", "LAPTOP", 10)).is_ok());
        assert_eq!(
            validate_product(&Product::new("X1", "", 10)),
            Err(CommerceError::MissingField("product_type"))
        );
    }
}
