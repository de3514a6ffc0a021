//! Chart of accounts repository.
//!
//! Owns per-business account rows: seeding the default chart at onboarding
//! and resolving accounts by their stable role codes. Postings never look
//! accounts up by name; tenants may rename accounts freely without breaking
//! the engine.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use khata_core::chart::{default_chart, AccountRole};

use crate::entities::accounts;

/// Error types for chart operations.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// No account with this code exists for the business.
    #[error("Account not found: {code}")]
    AccountNotFound {
        /// The unresolvable account code.
        code: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ChartError {
    /// Returns the stable error code for logs and CLI output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Outcome of a chart initialization call.
///
/// A repeat call is a success, not an error, so onboarding retries are safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartInit {
    /// The default chart was created.
    Created {
        /// Number of accounts created.
        count: usize,
    },
    /// The business already has accounts; nothing was changed.
    AlreadyInitialized,
}

/// Chart of accounts repository.
#[derive(Debug, Clone)]
pub struct ChartRepository {
    db: DatabaseConnection,
}

impl ChartRepository {
    /// Creates a new chart repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Seeds the default chart of accounts for a business.
    ///
    /// Idempotent: if the business already has any accounts, this is a
    /// no-op returning [`ChartInit::AlreadyInitialized`]. The check and the
    /// inserts run in one transaction so two concurrent onboarding calls
    /// cannot both seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn initialize_chart(&self, business_id: Uuid) -> Result<ChartInit, ChartError> {
        let txn = self.db.begin().await?;

        let existing = accounts::Entity::find()
            .filter(accounts::Column::BusinessId.eq(business_id))
            .count(&txn)
            .await?;
        if existing > 0 {
            txn.commit().await?;
            return Ok(ChartInit::AlreadyInitialized);
        }

        let seeds = default_chart();
        let now = chrono::Utc::now().into();
        let models: Vec<accounts::ActiveModel> = seeds
            .iter()
            .map(|seed| accounts::ActiveModel {
                id: Set(Uuid::new_v4()),
                business_id: Set(business_id),
                code: Set(seed.code.to_string()),
                name: Set(seed.name.to_string()),
                account_type: Set(seed.account_type.into()),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .collect();

        let count = models.len();
        accounts::Entity::insert_many(models).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(%business_id, count, "chart of accounts initialized");
        Ok(ChartInit::Created { count })
    }

    /// Resolves an account by its stable code inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::AccountNotFound`] if the business has no account
    /// with this code.
    pub async fn resolve_by_code(
        &self,
        txn: &DatabaseTransaction,
        business_id: Uuid,
        code: &str,
    ) -> Result<accounts::Model, ChartError> {
        accounts::Entity::find()
            .filter(accounts::Column::BusinessId.eq(business_id))
            .filter(accounts::Column::Code.eq(code))
            .one(txn)
            .await?
            .ok_or_else(|| ChartError::AccountNotFound {
                code: code.to_string(),
            })
    }

    /// Resolves the concrete account fulfilling a role for this business.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::AccountNotFound`] if the chart was never
    /// initialized for the business.
    pub async fn resolve_role(
        &self,
        txn: &DatabaseTransaction,
        business_id: Uuid,
        role: AccountRole,
    ) -> Result<accounts::Model, ChartError> {
        self.resolve_by_code(txn, business_id, role.code()).await
    }

    /// Lists a business's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(&self, business_id: Uuid) -> Result<Vec<accounts::Model>, ChartError> {
        let rows = accounts::Entity::find()
            .filter(accounts::Column::BusinessId.eq(business_id))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}
