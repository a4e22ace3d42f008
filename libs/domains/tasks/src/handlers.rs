use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::errors::responses::{
    BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
    InternalServerErrorResponse, NotFoundResponse,
};
use axum_helpers::{UuidPath, ValidatedJson};
use domain_users::CurrentUser;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::TaskResult;
use crate::models::{
    CountResponse, NewTask, SetAllRequest, SetAllResponse, Task, TaskFilter, TaskOrder, UpdateTask,
};
use crate::repository::TaskRepository;
use crate::service::TaskService;

pub const TAG: &str = "tasks";

/// OpenAPI documentation for Tasks API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_tasks,
        count_tasks,
        create_task,
        get_task,
        update_task,
        delete_task,
        set_all,
    ),
    components(
        schemas(
            Task,
            NewTask,
            UpdateTask,
            TaskFilter,
            TaskOrder,
            CountResponse,
            SetAllRequest,
            SetAllResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Task list endpoints")
    )
)]
pub struct ApiDoc;

/// Create the tasks router. Routes are mounted at the API root.
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/count", get(count_tasks))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/TasksController/setAll", post(set_all))
        .with_state(shared_service)
}

/// List tasks with optional filters
#[utoipa::path(
    get,
    path = "/tasks",
    tag = TAG,
    params(TaskFilter),
    responses(
        (status = 200, description = "List of tasks", body = Vec<Task>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Query(filter): Query<TaskFilter>,
) -> TaskResult<Json<Vec<Task>>> {
    let tasks = service.find(filter).await?;
    Ok(Json(tasks))
}

/// Count all tasks
#[utoipa::path(
    get,
    path = "/tasks/count",
    tag = TAG,
    responses(
        (status = 200, description = "Number of stored tasks", body = CountResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn count_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
) -> TaskResult<Json<CountResponse>> {
    let count = service.count().await?;
    Ok(Json(CountResponse { count }))
}

/// Create a new task
#[utoipa::path(
    post,
    path = "/tasks",
    tag = TAG,
    request_body = NewTask,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    ValidatedJson(input): ValidatedJson<NewTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    UuidPath(id): UuidPath,
) -> TaskResult<Json<Task>> {
    let task = service.get(id).await?;
    Ok(Json(task))
}

/// Overwrite a task
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> TaskResult<Json<Task>> {
    let task = service.update(id, input).await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    UuidPath(id): UuidPath,
) -> TaskResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set the completion state of every task (admin only)
#[utoipa::path(
    post,
    path = "/TasksController/setAll",
    tag = TAG,
    request_body = SetAllRequest,
    responses(
        (status = 200, description = "All tasks updated", body = SetAllResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn set_all<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    user: CurrentUser,
    Json(input): Json<SetAllRequest>,
) -> TaskResult<Json<SetAllResponse>> {
    let updated = service.set_all(user.as_ref(), input.completed).await?;
    Ok(Json(SetAllResponse { updated }))
}
