use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::errors::InternalError;
use crate::errors::internal::{BusinessError, CatalogKind, is_unique_violation};
use crate::types::db::{brand, service, specialization};

/// A row from any of the three catalogs
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub kind: CatalogKind,
    pub id: i32,
    pub name: String,
}

/// Read and seed the service, brand and specialization catalogs
///
/// Businesses only reference catalog rows; they are managed from the CLI.
pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn add(
        &self,
        conn: &impl ConnectionTrait,
        kind: CatalogKind,
        name: &str,
    ) -> Result<CatalogEntry, InternalError> {
        let now = Utc::now().timestamp();
        let name = name.trim().to_string();

        let inserted = match kind {
            CatalogKind::Service => service::ActiveModel {
                name: Set(name.clone()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map(|m| m.id),
            CatalogKind::Brand => brand::ActiveModel {
                name: Set(name.clone()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map(|m| m.id),
            CatalogKind::Specialization => specialization::ActiveModel {
                name: Set(name.clone()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map(|m| m.id),
        };

        let id = inserted.map_err(|e| {
            if is_unique_violation(&e) {
                BusinessError::CatalogEntryExists {
                    kind,
                    name: name.clone(),
                }
                .into()
            } else {
                InternalError::database("insert_catalog_entry", e)
            }
        })?;

        tracing::info!(kind = %kind, id, name = %name, "Catalog entry added");
        Ok(CatalogEntry { kind, id, name })
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntry>, InternalError> {
        let rows: Vec<(i32, String)> = match kind {
            CatalogKind::Service => service::Entity::find()
                .order_by_asc(service::Column::Id)
                .all(conn)
                .await
                .map(|rows| rows.into_iter().map(|r| (r.id, r.name)).collect()),
            CatalogKind::Brand => brand::Entity::find()
                .order_by_asc(brand::Column::Id)
                .all(conn)
                .await
                .map(|rows| rows.into_iter().map(|r| (r.id, r.name)).collect()),
            CatalogKind::Specialization => specialization::Entity::find()
                .order_by_asc(specialization::Column::Id)
                .all(conn)
                .await
                .map(|rows| rows.into_iter().map(|r| (r.id, r.name)).collect()),
        }
        .map_err(|e| InternalError::database("list_catalog", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| CatalogEntry { kind, id, name })
            .collect())
    }
}
