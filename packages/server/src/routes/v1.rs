use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/collections", collection_routes(config))
        .routes(routes!(
            handlers::collection::get_active_collection,
            handlers::collection::deactivate_collection
        ))
        .routes(routes!(handlers::publish::derive_hashes))
        .nest("/roles", role_routes())
}

fn collection_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let records = OpenApiRouter::new()
        .routes(routes!(
            handlers::collection::get_collection,
            handlers::collection::upsert_collection
        ))
        .routes(routes!(handlers::collection::activate_collection));

    let publish = OpenApiRouter::new()
        .routes(routes!(handlers::publish::publish_collection))
        .layer(handlers::publish::publish_body_limit(&config.publish));

    records.merge(publish)
}

fn role_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::role::list_roles,
            handlers::role::create_role,
            handlers::role::delete_role
        ))
        .routes(routes!(handlers::role::lookup_role))
}
