//! Transaction operations

use rusqlite::{params, Row};
use tracing::info;

use super::{format_datetime, parse_datetime, TransactionStore};
use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionKind, TransactionSeed, OPENING_BALANCE};

impl TransactionStore {
    /// List the complete transaction set for a user
    ///
    /// Ordered by date descending for convenience; feed consumers must not
    /// rely on wire order.
    pub fn list(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, raw_description, amount, date, kind, category, clean_description, created_at
            FROM transactions
            WHERE user_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )?;

        let transactions = stmt
            .query_map(params![user_id], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Number of transactions recorded for a user
    pub fn count(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Persist enrichment results for one transaction
    ///
    /// Partial update: only the two classifier fields are touched. Writing
    /// the same values twice leaves state unchanged; conflicting values are
    /// last-write-wins. A successful write bumps the user's feed.
    pub fn write_enrichment(
        &self,
        user_id: &str,
        transaction_id: i64,
        category: &str,
        clean_description: &str,
    ) -> Result<()> {
        let conn = self.conn()?;

        let updated = conn.execute(
            r#"
            UPDATE transactions
            SET category = ?, clean_description = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![category, clean_description, transaction_id, user_id],
        )?;

        if updated == 0 {
            return Err(Error::Write(format!(
                "transaction {} not found for user {}",
                transaction_id, user_id
            )));
        }

        self.notify(user_id);
        Ok(())
    }

    /// Bulk-insert seed records for a user
    ///
    /// Atomic: either all records are created or none are. Fresh ids are
    /// assigned by the store; the feed is bumped once after commit.
    pub fn seed(&self, user_id: &str, records: &[TransactionSeed]) -> Result<Vec<i64>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            tx.execute(
                r#"
                INSERT INTO transactions (user_id, raw_description, amount, date, kind)
                VALUES (?, ?, ?, ?, ?)
                "#,
                params![
                    user_id,
                    record.raw_description,
                    record.amount,
                    format_datetime(&record.date),
                    record.kind.as_str(),
                ],
            )?;
            ids.push(tx.last_insert_rowid());
        }

        tx.commit()?;
        info!(user = %user_id, records = ids.len(), "Seeded transactions");

        self.notify(user_id);
        Ok(ids)
    }

    /// Account balance: opening balance plus the signed sum of all amounts
    pub fn balance(&self, user_id: &str) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(OPENING_BALANCE + total)
    }

    fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
        let kind: String = row.get(5)?;
        let kind = kind.parse::<TransactionKind>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, e.into())
        })?;

        let date: String = row.get(4)?;
        let created_at: String = row.get(8)?;

        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            raw_description: row.get(2)?,
            amount: row.get(3)?,
            date: parse_datetime(&date),
            kind,
            category: row.get(6)?,
            clean_description: row.get(7)?,
            created_at: parse_datetime(&created_at),
        })
    }
}
