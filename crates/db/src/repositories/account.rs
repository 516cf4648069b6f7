//! Account repository for chart of accounts lookups.
//!
//! Accounts are maintained outside this crate; posting only needs to resolve
//! codes and know whether an account is a summary (has children).

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use paybook_core::ledger::{AccountInfo, AccountType, LedgerError};
use paybook_shared::types::AccountId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::ledger_db_error;
use crate::entities::accounts;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Unique account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Code of the parent (summary) account.
    pub parent_code: Option<String>,
}

impl CreateAccountInput {
    /// Creates input for a top-level account.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            parent_code: None,
        }
    }

    /// Places the account under `parent_code`.
    #[must_use]
    pub fn under(mut self, parent_code: impl Into<String>) -> Self {
        self.parent_code = Some(parent_code.into());
        self
    }
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the parent code is unknown, or a database
    /// error (including a duplicate code).
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, LedgerError> {
        let parent_id = match &input.parent_code {
            Some(code) => Some(
                self.find_by_code(code)
                    .await?
                    .ok_or_else(|| LedgerError::AccountNotFound(code.clone()))?
                    .id,
            ),
            None => None,
        };

        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            parent_id: Set(parent_id),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        account.insert(&self.db).await.map_err(ledger_db_error)
    }

    /// Finds an account by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<accounts::Model>, LedgerError> {
        accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(ledger_db_error)
    }

    /// Activates or deactivates an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for unknown codes.
    pub async fn set_active(&self, code: &str, is_active: bool) -> Result<(), LedgerError> {
        let account = self
            .find_by_code(code)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;

        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(is_active);
        active.update(&self.db).await.map_err(ledger_db_error)?;
        Ok(())
    }

    /// Resolves account codes to posting information.
    ///
    /// Unknown codes are simply absent from the map.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn resolve_codes<C>(
        conn: &C,
        codes: &[&str],
    ) -> Result<HashMap<String, AccountInfo>, LedgerError>
    where
        C: ConnectionTrait,
    {
        let unique: HashSet<&str> = codes.iter().copied().collect();
        let found = accounts::Entity::find()
            .filter(accounts::Column::Code.is_in(unique))
            .all(conn)
            .await
            .map_err(ledger_db_error)?;

        if found.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<Uuid> = found.iter().map(|a| a.id).collect();
        let parents: HashSet<Uuid> = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::ParentId)
            .filter(accounts::Column::ParentId.is_in(ids))
            .into_tuple::<Option<Uuid>>()
            .all(conn)
            .await
            .map_err(ledger_db_error)?
            .into_iter()
            .flatten()
            .collect();

        Ok(found
            .into_iter()
            .map(|account| {
                let info = AccountInfo {
                    id: AccountId::from_uuid(account.id),
                    has_children: parents.contains(&account.id),
                    code: account.code.clone(),
                    name: account.name,
                    account_type: account.account_type.into(),
                    is_active: account.is_active,
                };
                (account.code, info)
            })
            .collect())
    }
}
