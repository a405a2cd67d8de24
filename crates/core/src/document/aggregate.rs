//! Document aggregate: a validated header with numbered, priced lines.

use rust_decimal::Decimal;
use stockflow_shared::types::ProductId;

use crate::document::error::DocumentError;
use crate::document::line::{DocumentTotals, LineAmounts, LineCalculator};
use crate::document::types::{DocumentHeader, DocumentLineInput};
use crate::document::validation::DocumentValidator;

/// A line ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedLine {
    /// 1-based position within the document.
    pub line_number: i32,
    /// Product on this line.
    pub product_id: ProductId,
    /// Signed quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Explicit unit cost, if any.
    pub unit_cost: Option<Decimal>,
    /// Discount percentage (0 when absent).
    pub discount_percent: Decimal,
    /// Tax percentage (0 when absent).
    pub tax_percent: Decimal,
    /// Computed amounts.
    pub amounts: LineAmounts,
    /// Line description.
    pub description: Option<String>,
    /// Line notes.
    pub notes: Option<String>,
}

/// A validated document with computed line amounts and header totals.
///
/// This is the only way to obtain persisted line amounts, so totals can
/// never disagree with their lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDocument {
    /// Header fields.
    pub header: DocumentHeader,
    /// Lines numbered 1..N in input order.
    pub lines: Vec<PreparedLine>,
    /// Header totals summed from `lines`.
    pub totals: DocumentTotals,
}

impl PreparedDocument {
    /// Validates input and computes every derived amount.
    pub fn prepare(
        header: DocumentHeader,
        lines: &[DocumentLineInput],
    ) -> Result<Self, DocumentError> {
        DocumentValidator::validate(&header, lines)?;

        let prepared: Vec<PreparedLine> = lines
            .iter()
            .zip(1..)
            .map(|(input, line_number)| prepare_line(line_number, input))
            .collect();
        let totals = DocumentTotals::from_lines(prepared.iter().map(|line| &line.amounts));

        Ok(Self {
            header,
            lines: prepared,
            totals,
        })
    }
}

fn prepare_line(line_number: i32, input: &DocumentLineInput) -> PreparedLine {
    let discount_percent = input.discount_percent.unwrap_or(Decimal::ZERO);
    let tax_percent = input.tax_percent.unwrap_or(Decimal::ZERO);
    let amounts =
        LineCalculator::calculate(input.quantity, input.unit_price, discount_percent, tax_percent);

    PreparedLine {
        line_number,
        product_id: input.product_id,
        quantity: input.quantity,
        unit_price: input.unit_price,
        unit_cost: input.unit_cost,
        discount_percent,
        tax_percent,
        amounts,
        description: input.description.clone(),
        notes: input.notes.clone(),
    }
}
