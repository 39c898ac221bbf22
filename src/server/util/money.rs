//! Checked arithmetic on integer cent amounts.

use crate::server::error::{request::RequestError, Error};

/// Sums cent amounts, failing with a validation error instead of overflowing `i64`.
pub fn total_cents<I>(amounts: I) -> Result<i64, Error>
where
    I: IntoIterator<Item = i64>,
{
    amounts.into_iter().try_fold(0i64, |total, amount| {
        total.checked_add(amount).ok_or_else(|| {
            Error::from(RequestError::validation(
                "Amount total exceeds the supported range",
            ))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::total_cents;
    use crate::server::error::{request::RequestError, Error};

    #[test]
    fn sums_amounts() {
        assert_eq!(total_cents(Vec::new()).unwrap(), 0);
        assert_eq!(total_cents([150_000, 2_500, -500]).unwrap(), 152_000);
    }

    #[test]
    fn rejects_overflow() {
        let half = i64::MAX / 2 + 1;

        let result = total_cents([half, half]);

        assert!(matches!(
            result,
            Err(Error::RequestError(RequestError::Validation(_)))
        ));
    }
}
