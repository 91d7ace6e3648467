use std::sync::Arc;

use axum::Router;

use crate::{
    db::entities::{
        blog_post, customer, gallery_image, interaction, lead, newsletter_subscriber, project,
        service, statistic, team_member, testimonial, translation, user,
    },
    routes::crud_router::CrudApiRouter,
    services::ServiceContext,
    state::AppState,
};

/// Plural path segment of every table managed through the admin API.
pub const MANAGED_ENTITIES: &[&str] = &[
    "projects",
    "gallery-images",
    "testimonials",
    "services",
    "team-members",
    "statistics",
    "blog-posts",
    "translations",
    "customers",
    "leads",
    "interactions",
    "newsletter-subscribers",
    "users",
];

pub fn router(state: &AppState) -> Router<Arc<AppState>> {
    let services = ServiceContext::from_state(state);

    Router::new()
        .merge(CrudApiRouter::new(services.entity::<project::Entity>(), "/projects").router())
        .merge(
            CrudApiRouter::new(services.entity::<gallery_image::Entity>(), "/gallery-images")
                .router(),
        )
        .merge(
            CrudApiRouter::new(services.entity::<testimonial::Entity>(), "/testimonials").router(),
        )
        .merge(CrudApiRouter::new(services.entity::<service::Entity>(), "/services").router())
        .merge(
            CrudApiRouter::new(services.entity::<team_member::Entity>(), "/team-members").router(),
        )
        .merge(CrudApiRouter::new(services.entity::<statistic::Entity>(), "/statistics").router())
        .merge(CrudApiRouter::new(services.entity::<blog_post::Entity>(), "/blog-posts").router())
        .merge(
            CrudApiRouter::new(services.entity::<translation::Entity>(), "/translations").router(),
        )
        .merge(CrudApiRouter::new(services.entity::<customer::Entity>(), "/customers").router())
        .merge(CrudApiRouter::new(services.entity::<lead::Entity>(), "/leads").router())
        .merge(
            CrudApiRouter::new(services.entity::<interaction::Entity>(), "/interactions").router(),
        )
        .merge(
            CrudApiRouter::new(
                services.entity::<newsletter_subscriber::Entity>(),
                "/newsletter-subscribers",
            )
            .router(),
        )
        .merge(CrudApiRouter::new(services.entity::<user::Entity>(), "/users").router())
}
