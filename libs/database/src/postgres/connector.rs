use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::info;

use super::PostgresConfig;
use crate::common::{RetryConfig, retry_with_backoff};

/// Connect from config, retrying with exponential backoff on failure.
///
/// Useful at startup when the database container may still be booting.
/// `None` uses [`PostgresConfig::retry_config`].
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> Result<DatabaseConnection, DbErr> {
    let retry_config = retry_config.unwrap_or_else(|| config.retry_config());
    let options = config.into_connect_options();
    let attempt = || {
        let opts = options.clone();
        async move {
            let db = Database::connect(opts).await?;
            info!("Successfully connected to PostgreSQL database");
            Ok::<_, DbErr>(db)
        }
    };

    retry_with_backoff(attempt, retry_config).await
}

/// Create the table backing `entity` unless it already exists.
///
/// This is plain provisioning derived from the entity definition, not a
/// versioned migration: existing tables are left untouched.
pub async fn create_table_if_not_exists<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    info!(table = %entity.table_name(), "Ensured table exists");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    mod widget {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
        #[sea_orm(table_name = "widgets")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub name: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    #[tokio::test]
    async fn test_create_table_if_not_exists_issues_guarded_ddl() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        create_table_if_not_exists(&db, widget::Entity).await.unwrap();

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("CREATE TABLE IF NOT EXISTS"));
        assert!(log.contains("widgets"));
    }
}
