//! Tasks Domain
//!
//! Task list storage, the admin-only bulk completion update and the HTTP
//! endpoints over them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /tasks, /TasksController/setAll
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, admin guard, seeding
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs, filters
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{PgTaskRepository, TaskService, handlers};
//! use sea_orm::Database;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Arc::new(Database::connect("postgres://...").await?);
//!
//! let repository = PgTaskRepository::new(db);
//! repository.ensure_schema().await?;
//!
//! let service = TaskService::new(repository);
//! service.seed_if_empty().await?;
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{TaskError, TaskResult};
pub use handlers::ApiDoc;
pub use models::{
    CountResponse, NewTask, SaveTask, SetAllRequest, SetAllResponse, Task, TaskFilter, TaskOrder,
    UpdateTask,
};
pub use postgres::PgTaskRepository;
pub use repository::{InMemoryTaskRepository, TaskRepository};
pub use service::TaskService;
