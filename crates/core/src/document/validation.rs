//! Input validation for document headers and lines.

use rust_decimal::Decimal;

use crate::document::error::DocumentError;
use crate::document::line::{AMOUNT_SCALE, QUANTITY_SCALE};
use crate::document::types::{DocumentHeader, DocumentLineInput};
use crate::stock::movement::MovementResolver;

/// Maximum length of a document reference.
pub const MAX_REFERENCE_LEN: usize = 255;

/// Stateless validator for document input.
pub struct DocumentValidator;

impl DocumentValidator {
    /// Validates a header together with its full line set.
    ///
    /// Checks run header first, then lines in input order; the first
    /// violation is returned.
    pub fn validate(
        header: &DocumentHeader,
        lines: &[DocumentLineInput],
    ) -> Result<(), DocumentError> {
        Self::validate_header(header)?;

        if lines.is_empty() {
            return Err(DocumentError::NoLines);
        }

        let signed =
            MovementResolver::allows_signed_quantity(header.domain, &header.document_type);
        for (index, line) in lines.iter().enumerate() {
            Self::validate_line(index + 1, line, signed, &header.document_type)?;
        }

        Ok(())
    }

    /// Validates header fields and warehouse requirements.
    pub fn validate_header(header: &DocumentHeader) -> Result<(), DocumentError> {
        if header.document_type.trim().is_empty() {
            return Err(DocumentError::MissingDocumentType);
        }

        if let Some(reference) = &header.reference
            && reference.chars().count() > MAX_REFERENCE_LEN
        {
            return Err(DocumentError::ReferenceTooLong {
                max: MAX_REFERENCE_LEN,
            });
        }

        if MovementResolver::moves_stock(header.domain, &header.document_type) {
            let Some(source) = header.warehouse_id else {
                return Err(DocumentError::WarehouseRequired {
                    domain: header.domain.to_string(),
                    document_type: header.document_type.clone(),
                });
            };

            if MovementResolver::is_transfer(header.domain, &header.document_type) {
                let destination = header
                    .destination_warehouse_id
                    .ok_or(DocumentError::DestinationWarehouseRequired)?;
                if destination == source {
                    return Err(DocumentError::SameWarehouseTransfer(source));
                }
            }
        }

        Ok(())
    }

    /// Validates one line. `line` is the 1-based line number.
    pub fn validate_line(
        line: usize,
        input: &DocumentLineInput,
        allow_signed_quantity: bool,
        document_type: &str,
    ) -> Result<(), DocumentError> {
        if input.quantity.is_zero() {
            return Err(DocumentError::ZeroQuantity { line });
        }
        if input.quantity < Decimal::ZERO && !allow_signed_quantity {
            return Err(DocumentError::NegativeQuantity {
                line,
                document_type: document_type.to_string(),
            });
        }
        if input.quantity.abs() < Decimal::new(1, QUANTITY_SCALE) {
            return Err(DocumentError::QuantityBelowMinimum { line });
        }

        Self::validate_scale(line, "quantity", Some(input.quantity), QUANTITY_SCALE)?;

        if input.unit_price < Decimal::ZERO {
            return Err(DocumentError::NegativePrice { line });
        }
        if let Some(cost) = input.unit_cost
            && cost < Decimal::ZERO
        {
            return Err(DocumentError::NegativeCost { line });
        }

        Self::validate_percent(line, "discount_percent", input.discount_percent)?;
        Self::validate_percent(line, "tax_percent", input.tax_percent)?;

        Self::validate_scale(line, "unit_price", Some(input.unit_price), AMOUNT_SCALE)?;
        Self::validate_scale(line, "unit_cost", input.unit_cost, AMOUNT_SCALE)?;
        Self::validate_scale(line, "discount_percent", input.discount_percent, AMOUNT_SCALE)?;
        Self::validate_scale(line, "tax_percent", input.tax_percent, AMOUNT_SCALE)?;

        Ok(())
    }

    /// Rejects values the persisted column would silently round.
    /// Trailing zeros do not count (`1.5000` fits two places).
    fn validate_scale(
        line: usize,
        field: &'static str,
        value: Option<Decimal>,
        max: u32,
    ) -> Result<(), DocumentError> {
        match value {
            Some(value) if value.normalize().scale() > max => {
                Err(DocumentError::TooManyDecimals { line, field, max })
            }
            _ => Ok(()),
        }
    }

    fn validate_percent(
        line: usize,
        field: &'static str,
        value: Option<Decimal>,
    ) -> Result<(), DocumentError> {
        match value {
            Some(value) if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED => {
                Err(DocumentError::PercentOutOfRange { line, field, value })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::types::DocumentDomain;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use stockflow_shared::types::{ProductId, WarehouseId};

    fn header(domain: DocumentDomain, document_type: &str) -> DocumentHeader {
        DocumentHeader {
            domain,
            document_type: document_type.to_string(),
            warehouse_id: Some(WarehouseId(1)),
            destination_warehouse_id: None,
            partner_id: None,
            related_entity: None,
            document_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            due_date: None,
            notes: None,
            reference: None,
        }
    }

    fn line(quantity: Decimal) -> DocumentLineInput {
        DocumentLineInput {
            product_id: ProductId(1),
            quantity,
            unit_price: dec!(10),
            unit_cost: None,
            discount_percent: None,
            tax_percent: None,
            description: None,
            notes: None,
        }
    }

    #[test]
    fn test_valid_sale_invoice() {
        let result = DocumentValidator::validate(
            &header(DocumentDomain::Sale, "invoice"),
            &[line(dec!(10))],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_lines_rejected() {
        let result = DocumentValidator::validate(&header(DocumentDomain::Sale, "invoice"), &[]);
        assert!(matches!(result, Err(DocumentError::NoLines)));
    }

    #[test]
    fn test_zero_quantity_rejected_everywhere() {
        let result = DocumentValidator::validate(
            &header(DocumentDomain::Stock, "adjustment"),
            &[line(dec!(0))],
        );
        assert!(matches!(result, Err(DocumentError::ZeroQuantity { line: 1 })));
    }

    #[test]
    fn test_negative_quantity_only_for_signed_kinds() {
        let invoice = DocumentValidator::validate(
            &header(DocumentDomain::Sale, "invoice"),
            &[line(dec!(1)), line(dec!(-2))],
        );
        assert!(matches!(
            invoice,
            Err(DocumentError::NegativeQuantity { line: 2, .. })
        ));

        let adjustment = DocumentValidator::validate(
            &header(DocumentDomain::Stock, "adjustment"),
            &[line(dec!(-5))],
        );
        assert!(adjustment.is_ok());
    }

    #[test]
    fn test_quantity_below_precision_rejected() {
        let result = DocumentValidator::validate(
            &header(DocumentDomain::Sale, "invoice"),
            &[line(dec!(0.0004))],
        );
        assert!(matches!(
            result,
            Err(DocumentError::QuantityBelowMinimum { line: 1 })
        ));
    }

    #[test]
    fn test_excess_precision_rejected() {
        let quantity = DocumentValidator::validate(
            &header(DocumentDomain::Sale, "invoice"),
            &[line(dec!(1.0005))],
        );
        assert!(matches!(
            quantity,
            Err(DocumentError::TooManyDecimals { line: 1, field: "quantity", max: 3 })
        ));

        let mut input = line(dec!(1));
        input.unit_price = dec!(0.125);
        let price =
            DocumentValidator::validate(&header(DocumentDomain::Sale, "invoice"), &[input]);
        let err = price.unwrap_err();
        assert_eq!(err.error_code(), "TOO_MANY_DECIMALS");
        assert_eq!(err.field().as_deref(), Some("lines[0].unit_price"));
    }

    #[test]
    fn test_trailing_zeros_are_not_excess_precision() {
        let mut input = line(dec!(2.5000));
        input.unit_price = dec!(10.500);
        input.tax_percent = Some(dec!(20.000));
        let result =
            DocumentValidator::validate(&header(DocumentDomain::Sale, "invoice"), &[input]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut input = line(dec!(1));
        input.unit_price = dec!(-0.01);
        let result =
            DocumentValidator::validate(&header(DocumentDomain::Sale, "invoice"), &[input]);
        assert!(matches!(result, Err(DocumentError::NegativePrice { line: 1 })));
    }

    #[test]
    fn test_percent_bounds() {
        let mut input = line(dec!(1));
        input.discount_percent = Some(dec!(100));
        input.tax_percent = Some(dec!(0));
        assert!(
            DocumentValidator::validate(&header(DocumentDomain::Sale, "invoice"), &[input.clone()])
                .is_ok()
        );

        input.tax_percent = Some(dec!(100.5));
        let result =
            DocumentValidator::validate(&header(DocumentDomain::Sale, "invoice"), &[input]);
        assert!(matches!(
            result,
            Err(DocumentError::PercentOutOfRange {
                field: "tax_percent",
                ..
            })
        ));
    }

    #[test]
    fn test_warehouse_required_when_stock_moves() {
        let mut h = header(DocumentDomain::Purchase, "receipt");
        h.warehouse_id = None;
        let result = DocumentValidator::validate(&h, &[line(dec!(1))]);
        assert!(matches!(result, Err(DocumentError::WarehouseRequired { .. })));

        let mut quote = header(DocumentDomain::Sale, "quote");
        quote.warehouse_id = None;
        assert!(DocumentValidator::validate(&quote, &[line(dec!(1))]).is_ok());
    }

    #[test]
    fn test_transfer_requires_distinct_destination() {
        let mut h = header(DocumentDomain::Stock, "transfer");
        let missing = DocumentValidator::validate(&h, &[line(dec!(1))]);
        assert!(matches!(
            missing,
            Err(DocumentError::DestinationWarehouseRequired)
        ));

        h.destination_warehouse_id = Some(WarehouseId(1));
        let same = DocumentValidator::validate(&h, &[line(dec!(1))]);
        assert!(matches!(same, Err(DocumentError::SameWarehouseTransfer(_))));

        h.destination_warehouse_id = Some(WarehouseId(2));
        assert!(DocumentValidator::validate(&h, &[line(dec!(1))]).is_ok());
    }

    #[test]
    fn test_reference_length() {
        let mut h = header(DocumentDomain::Sale, "invoice");
        h.reference = Some("x".repeat(MAX_REFERENCE_LEN + 1));
        let result = DocumentValidator::validate(&h, &[line(dec!(1))]);
        assert!(matches!(result, Err(DocumentError::ReferenceTooLong { .. })));
    }
}
