// src/common/validation.rs
//
// Validadores `custom` compartilhados pelos payloads.

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::common::error::AppError;

/// Maior valor que cabe numa coluna NUMERIC(12, 2): 9.999.999.999,99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Obrigatório depois do trim: `"   "` não conta como preenchido.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Este campo es obligatorio".into());
        return Err(err);
    }
    Ok(())
}

/// Valor monetário entre 0 e `MAX_AMOUNT`.
pub fn validate_amount(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("El valor no puede ser negativo".into());
        return Err(err);
    }
    if *val > MAX_AMOUNT {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &MAX_AMOUNT);
        err.message = Some("El valor excede el máximo permitido".into());
        return Err(err);
    }
    Ok(())
}

/// `precio * cantidad` sem overflow e dentro de NUMERIC(12, 2).
pub fn line_amount(precio: Decimal, cantidad: i32) -> Result<Decimal, AppError> {
    precio
        .checked_mul(Decimal::from(cantidad))
        .filter(|amount| *amount <= MAX_AMOUNT)
        .ok_or_else(|| AppError::bad_request("El monto de la línea excede el máximo permitido"))
}

/// Soma de montos; acima de `MAX_AMOUNT` é erro de negócio.
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, AppError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .filter(|total| *total <= MAX_AMOUNT)
        .ok_or_else(|| AppError::bad_request("El monto total excede el máximo permitido"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_amount_fits_numeric_12_2() {
        assert_eq!(MAX_AMOUNT, Decimal::new(999_999_999_999, 2));
    }

    #[test]
    fn whitespace_only_is_blank() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" Mouse ").is_ok());
    }

    #[test]
    fn amounts_are_bounded() {
        assert!(validate_amount(&Decimal::ZERO).is_ok());
        assert!(validate_amount(&MAX_AMOUNT).is_ok());
        assert!(validate_amount(&Decimal::new(-5, 1)).is_err());
        assert!(validate_amount(&Decimal::new(100_000_000_000, 0)).is_err());
    }

    #[test]
    fn huge_line_is_a_bad_request_not_a_panic() {
        let err = line_amount(Decimal::from_i128_with_scale(10_i128.pow(27), 0), 100).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        assert_eq!(line_amount(Decimal::new(999, 2), 3).unwrap(), Decimal::new(2997, 2));
    }

    #[test]
    fn sum_rejects_totals_beyond_the_column() {
        assert_eq!(
            sum_amounts([Decimal::new(150, 2), Decimal::new(250, 2)]).unwrap(),
            Decimal::new(400, 2)
        );
        let err = sum_amounts([MAX_AMOUNT, Decimal::ONE]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(sum_amounts([]).unwrap(), Decimal::ZERO);
    }
}
