//! Sequence generator backed by `numbering_systems`.
//!
//! A template row holds the format string and the next counter value. Codes
//! are rendered from the pre-increment value and the counter is advanced with
//! a compare-and-swap, so two writers racing on the same template cannot both
//! consume the same number.

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
};
use stockflow_core::document::DocumentDomain;
use stockflow_core::numbering::{
    CodeTemplate, JOURNAL_DOMAIN, JOURNAL_PREFIX, JOURNAL_TYPE, document_prefix, fallback_code,
};
use tracing::debug;

use crate::entities::sea_orm_active_enums::DocumentDomain as DbDocumentDomain;
use crate::entities::{document_headers, journal_stock, numbering_systems};

use super::error::SequenceError;

/// Repository for numbering templates and code generation.
#[derive(Debug, Clone)]
pub struct SequenceRepository {
    db: DatabaseConnection,
}

impl SequenceRepository {
    /// Creates a new sequence repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Renders the next code of the active template for `(domain, code_type)`
    /// and advances its counter, in a transaction of its own.
    ///
    /// Returns `None` when no active template is registered.
    pub async fn next(
        &self,
        domain: &str,
        code_type: &str,
    ) -> Result<Option<String>, SequenceError> {
        let txn = self.db.begin().await?;
        let code = Self::next_in(&txn, domain, code_type, Utc::now().date_naive()).await?;
        txn.commit().await?;
        Ok(code)
    }

    /// Same as [`Self::next`] but runs on the caller's connection, so the
    /// counter only advances if the caller commits.
    pub async fn next_in<C: ConnectionTrait>(
        conn: &C,
        domain: &str,
        code_type: &str,
        today: NaiveDate,
    ) -> Result<Option<String>, SequenceError> {
        // A second writer on this template blocks here until the first
        // commits, then reads the advanced counter.
        let Some(template) = active_template(domain, code_type)
            .lock_exclusive()
            .one(conn)
            .await?
        else {
            return Ok(None);
        };

        let current = template.next_value;
        let code = CodeTemplate::new(&template.template).render(current, today);

        let result = numbering_systems::Entity::update_many()
            .col_expr(numbering_systems::Column::NextValue, Expr::value(current + 1))
            .col_expr(
                numbering_systems::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(numbering_systems::Column::Id.eq(template.id))
            .filter(numbering_systems::Column::NextValue.eq(current))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(SequenceError::ConcurrentModification {
                domain: domain.to_string(),
                code_type: code_type.to_string(),
            });
        }

        debug!(domain, code_type, code = %code, "Generated code from template");
        Ok(Some(code))
    }

    /// Returns the counter value the next code will consume.
    pub async fn current_value(
        &self,
        domain: &str,
        code_type: &str,
    ) -> Result<Option<i64>, SequenceError> {
        let template = active_template(domain, code_type).one(&self.db).await?;
        Ok(template.map(|t| t.next_value))
    }
}

fn active_template(domain: &str, code_type: &str) -> Select<numbering_systems::Entity> {
    numbering_systems::Entity::find()
        .filter(numbering_systems::Column::Domain.eq(domain))
        .filter(numbering_systems::Column::CodeType.eq(code_type))
        .filter(numbering_systems::Column::IsActive.eq(true))
        .order_by_asc(numbering_systems::Column::Id)
}

/// Assigns a document code from its template, or the `SINV-2026-0001`
/// style fallback counted over documents of the same kind.
pub(crate) async fn document_code<C: ConnectionTrait>(
    conn: &C,
    domain: DocumentDomain,
    document_type: &str,
    today: NaiveDate,
    padding: usize,
) -> Result<String, SequenceError> {
    if let Some(code) =
        SequenceRepository::next_in(conn, domain.as_str(), document_type, today).await?
    {
        return Ok(code);
    }

    let existing = document_headers::Entity::find()
        .filter(document_headers::Column::Domain.eq(DbDocumentDomain::from(domain)))
        .filter(document_headers::Column::DocumentType.eq(document_type))
        .count(conn)
        .await?;
    let prefix = document_prefix(domain.as_str(), document_type);

    Ok(first_free_code::<_, document_headers::Entity>(
        conn,
        document_headers::Column::Code,
        &prefix,
        today.year(),
        existing + 1,
        padding,
    )
    .await?)
}

/// Assigns a ledger entry code from the `stock/journal_stock` template, or
/// `JST-YYYY-NNNN` counted over the whole journal.
pub(crate) async fn journal_code<C: ConnectionTrait>(
    conn: &C,
    today: NaiveDate,
    padding: usize,
) -> Result<String, SequenceError> {
    if let Some(code) =
        SequenceRepository::next_in(conn, JOURNAL_DOMAIN, JOURNAL_TYPE, today).await?
    {
        return Ok(code);
    }

    let existing = journal_stock::Entity::find().count(conn).await?;

    Ok(first_free_code::<_, journal_stock::Entity>(
        conn,
        journal_stock::Column::Code,
        JOURNAL_PREFIX,
        today.year(),
        existing + 1,
        padding,
    )
    .await?)
}

/// Bumps the count until the fallback code is not taken.
async fn first_free_code<C, E>(
    conn: &C,
    column: E::Column,
    prefix: &str,
    year: i32,
    start: u64,
    padding: usize,
) -> Result<String, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let mut count = start;
    loop {
        let code = fallback_code(prefix, year, count, padding);
        let taken = E::find()
            .filter(column.eq(code.as_str()))
            .one(conn)
            .await?;
        if taken.is_none() {
            return Ok(code);
        }
        count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_template_is_locked_before_counter_advance() {
        let sql = active_template(JOURNAL_DOMAIN, JOURNAL_TYPE)
            .lock_exclusive()
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.ends_with("FOR UPDATE"), "{sql}");
        assert!(sql.contains(r#""code_type" = 'journal_stock'"#), "{sql}");
    }

    #[test]
    fn test_current_value_read_takes_no_lock() {
        let sql = active_template("sale", "invoice")
            .build(DbBackend::Postgres)
            .to_string();
        assert!(!sql.contains("FOR UPDATE"), "{sql}");
    }
}
