pub mod cart;
pub mod health;
pub mod media;
pub mod products;
pub mod purchases;
pub mod requests;
pub mod services;
pub mod tutorials;
pub mod users;

use chrono::{NaiveDate, Utc};
use model::entities::cart_item;
use rust_decimal::Decimal;

use crate::error::{ApiError, ApiResult};

/// Date stamped on catalog rows and requests when the client sends none.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn ensure_non_negative_price(field: &str, price: Decimal) -> ApiResult<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ApiError::BadRequest(format!("{} must not be negative", field)));
    }
    Ok(())
}

pub(crate) fn ensure_positive_quantity(quantity: i32) -> ApiResult<()> {
    if quantity <= 0 {
        return Err(ApiError::BadRequest(
            "Quantity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Cart lines hold between one and [`cart_item::MAX_QUANTITY`] units.
pub(crate) fn ensure_cart_quantity(quantity: i32) -> ApiResult<()> {
    ensure_positive_quantity(quantity)?;
    if quantity > cart_item::MAX_QUANTITY {
        return Err(cart_quantity_exceeded());
    }
    Ok(())
}

pub(crate) fn cart_quantity_exceeded() -> ApiError {
    ApiError::BadRequest(format!(
        "Cart quantity cannot exceed {}",
        cart_item::MAX_QUANTITY
    ))
}
