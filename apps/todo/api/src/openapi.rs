use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "Task list with session sign-in and an admin-only bulk update"
    ),
    servers(
        (url = "/api", description = "API base path")
    )
)]
struct BaseDoc;

/// Combined document: the base info plus every domain's paths.
///
/// Domain routes are mounted at the API root, so their documents are merged
/// rather than nested under a prefix.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = BaseDoc::openapi();
        doc.merge(domain_users::ApiDoc::openapi());
        doc.merge(domain_tasks::ApiDoc::openapi());
        doc
    }
}
