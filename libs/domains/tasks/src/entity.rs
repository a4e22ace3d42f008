use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the tasks table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Task {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            completed: model.completed,
        }
    }
}

impl From<crate::models::NewTask> for ActiveModel {
    fn from(input: crate::models::NewTask) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            title: Set(input.title),
            completed: Set(input.completed),
        }
    }
}
