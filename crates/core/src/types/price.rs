//! Non-negative product price using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC` and kept as [`Decimal`] in memory so cart
//! totals never accumulate float error. On the wire they are plain JSON
//! numbers, which is what the storefront's `Product.price: number` expects.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The input is not a finite decimal number.
    #[error("price must be a valid number")]
    NotANumber,
    /// More than two decimal places.
    #[error("price must have at most 2 decimal places")]
    TooPrecise,
    /// Does not fit `NUMERIC(12, 2)`.
    #[error("price must be at most {}", Price::MAX_AMOUNT)]
    TooLarge,
}

/// A product price (always `>= 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Largest amount the `price NUMERIC(12, 2)` column holds (`9999999999.99`).
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

    /// Decimal places kept by the column.
    const SCALE: u32 = 2;

    /// Create a price from a decimal amount.
    ///
    /// Trailing zeros are ignored, so `9.990` is accepted as `9.99`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero,
    /// `PriceError::TooPrecise` for more than two decimal places and
    /// `PriceError::TooLarge` above [`Price::MAX_AMOUNT`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        let amount = amount.normalize();
        if amount.scale() > Self::SCALE {
            return Err(PriceError::TooPrecise);
        }
        if amount > Self::MAX_AMOUNT {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount))
    }

    /// Create a price from a JSON number or numeric string.
    ///
    /// Accepts what a browser form typically produces after `parseFloat`
    /// (a number) as well as string amounts such as `"9.99"`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` for `null`, booleans, objects,
    /// non-numeric strings and non-finite values, plus the range errors of
    /// [`Price::new`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PriceError> {
        let amount = match value {
            serde_json::Value::Number(n) => {
                // serde_json prints the shortest round-trip form, so 9.99 stays 9.99
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map_err(|_| PriceError::NotANumber)?
            }
            serde_json::Value::String(s) => {
                Decimal::from_str(s.trim()).map_err(|_| PriceError::NotANumber)?
            }
            _ => return Err(PriceError::NotANumber),
        };
        Self::new(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert_eq!(Price::new(Decimal::new(-1, 2)), Err(PriceError::Negative));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_from_json_number() {
        let price = Price::from_json(&json!(9.99)).unwrap();
        assert_eq!(price.amount(), Decimal::new(999, 2));

        let price = Price::from_json(&json!(25)).unwrap();
        assert_eq!(price.amount(), Decimal::from(25));
    }

    #[test]
    fn test_from_json_numeric_string() {
        let price = Price::from_json(&json!(" 12.50 ")).unwrap();
        assert_eq!(price.amount(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_from_json_invalid() {
        assert_eq!(Price::from_json(&json!(null)), Err(PriceError::NotANumber));
        assert_eq!(Price::from_json(&json!("abc")), Err(PriceError::NotANumber));
        assert_eq!(Price::from_json(&json!(true)), Err(PriceError::NotANumber));
        assert_eq!(Price::from_json(&json!(-3)), Err(PriceError::Negative));
    }

    #[test]
    fn test_fits_two_decimal_column() {
        assert_eq!(
            Price::from_json(&json!(9.999)),
            Err(PriceError::TooPrecise)
        );
        assert_eq!(
            Price::from_json(&json!("0.0001")),
            Err(PriceError::TooPrecise)
        );
        assert_eq!(Price::from_json(&json!(1e12)), Err(PriceError::TooLarge));
        assert_eq!(
            Price::new(Decimal::new(1_000_000_000_000, 2)),
            Err(PriceError::TooLarge)
        );

        let max = Price::new(Decimal::new(999_999_999_999, 2)).unwrap();
        assert_eq!(max.amount(), Price::MAX_AMOUNT);

        let trailing = Price::from_json(&json!("9.990")).unwrap();
        assert_eq!(trailing.amount(), Decimal::new(999, 2));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let price = Price::new(Decimal::new(999, 2)).unwrap();
        let value = serde_json::to_value(price).unwrap();
        assert!(value.is_number());
        assert!((value.as_f64().unwrap() - 9.99).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::new(25, 0)).unwrap();
        assert_eq!(price.to_string(), "$25.00");
    }
}
