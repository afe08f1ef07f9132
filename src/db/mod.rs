use sea_orm::{ entity::prelude::*, ConnectionTrait, Set, Unchanged };

use crate::error::Result;
use crate::token;

pub mod entity;
pub use entity::*;

/// Idempotent token store over `restaurant_tables`.
///
/// Methods are generic over the connection so they run inside the batch
/// transaction; storage errors propagate to the orchestrator, which rolls
/// back the whole run.
pub struct TableStore {
    token_length: usize,
}

impl TableStore {
    pub fn new(token_length: usize) -> Self {
        Self { token_length }
    }

    /// Ensure a row exists for `(restaurant_id, name)` and return its id and
    /// permanent token.
    ///
    /// - row absent: insert with a fresh token
    /// - row present, token null/blank: assign a fresh token in place
    /// - row present, token set: return it unchanged, zero writes
    ///
    /// A token is the secret baked into a printed artifact; overwriting one
    /// would invalidate codes already on tables.
    pub async fn ensure<C: ConnectionTrait>(
        &self,
        conn: &C,
        restaurant_id: Option<i32>,
        name: &str
    ) -> Result<(i32, String)> {
        let mut query = restaurant_table::Entity
            ::find()
            .filter(restaurant_table::Column::Name.eq(name));
        query = match restaurant_id {
            Some(rid) => query.filter(restaurant_table::Column::RestaurantId.eq(rid)),
            None => query.filter(restaurant_table::Column::RestaurantId.is_null()),
        };

        if let Some(row) = query.one(conn).await? {
            if let Some(existing) = row.token.as_deref() {
                if !existing.trim().is_empty() {
                    return Ok((row.id, existing.to_string()));
                }
            }

            let fresh = token::generate(self.token_length);
            let id = row.id;
            let mut active: restaurant_table::ActiveModel = row.into();
            active.token = Set(Some(fresh.clone()));
            active.update(conn).await?;
            return Ok((id, fresh));
        }

        let fresh = token::generate(self.token_length);
        let inserted = (restaurant_table::ActiveModel {
            restaurant_id: Set(restaurant_id),
            name: Set(name.to_string()),
            token: Set(Some(fresh.clone())),
            ..Default::default()
        }).insert(conn).await?;

        Ok((inserted.id, fresh))
    }

    /// Persist the derived state for a row: the constructed access URL and the
    /// rendered artifact path. The token column is intentionally untouched.
    pub async fn save_artifact<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
        url: &str,
        qr_code_path: &str
    ) -> Result<()> {
        let update = restaurant_table::ActiveModel {
            id: Unchanged(id),
            url: Set(Some(url.to_string())),
            qr_code_path: Set(Some(qr_code_path.to_string())),
            ..Default::default()
        };
        update.update(conn).await?;
        Ok(())
    }
}
