use async_trait::async_trait;
use database::postgres::create_table_if_not_exists;
use sea_orm::ActiveValue::Set;
use std::sync::Arc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{TaskError, TaskResult},
    models::{NewTask, SaveTask, Task, TaskFilter, TaskOrder},
    repository::TaskRepository,
};

pub struct PgTaskRepository {
    db: Arc<DatabaseConnection>,
}

impl PgTaskRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create the `tasks` table if it is missing.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        create_table_if_not_exists(&self.db, entity::Entity).await
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let mut query = entity::Entity::find();

        if let Some(completed) = filter.completed {
            query = query.filter(entity::Column::Completed.eq(completed));
        }

        query = match filter.order_by {
            Some(TaskOrder::CompletedAsc) => query.order_by_asc(entity::Column::Completed),
            Some(TaskOrder::CompletedDesc) => query.order_by_desc(entity::Column::Completed),
            None => query,
        };

        let models = query
            .order_by_asc(entity::Column::Id)
            .limit(filter.limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let model = entity::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn save(&self, input: SaveTask) -> TaskResult<Task> {
        match input.id {
            Some(id) => {
                let active_model = entity::ActiveModel {
                    id: Set(id),
                    title: Set(input.title),
                    completed: Set(input.completed),
                };

                let model = active_model.update(self.db.as_ref()).await.map_err(|e| match e {
                    DbErr::RecordNotUpdated => TaskError::NotFound(id),
                    other => TaskError::Database(other),
                })?;

                tracing::info!(task_id = %id, "Updated task");
                Ok(model.into())
            }
            None => {
                let active_model: entity::ActiveModel =
                    NewTask::new(input.title, input.completed).into();
                let model = active_model.insert(self.db.as_ref()).await?;

                tracing::info!(task_id = %model.id, "Created task");
                Ok(model.into())
            }
        }
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;

        if result.rows_affected > 0 {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn count(&self) -> TaskResult<u64> {
        Ok(entity::Entity::find().count(self.db.as_ref()).await?)
    }

    async fn insert(&self, input: Vec<NewTask>) -> TaskResult<Vec<Task>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let models: Vec<entity::Model> = input
            .into_iter()
            .map(|new| entity::Model {
                id: Uuid::now_v7(),
                title: new.title,
                completed: new.completed,
            })
            .collect();

        let active_models = models.iter().cloned().map(|m| entity::ActiveModel {
            id: Set(m.id),
            title: Set(m.title),
            completed: Set(m.completed),
        });
        entity::Entity::insert_many(active_models)
            .exec(self.db.as_ref())
            .await?;

        tracing::info!(count = models.len(), "Inserted tasks");
        Ok(models.into_iter().map(Into::into).collect())
    }
}
