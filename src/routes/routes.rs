use actix_web::web;

use super::admin::admin_handlers;
use super::groups::groups_handlers;
use crate::store::GroupStore;

pub fn groups_configure<S: GroupStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-groups")
            .route("", web::get().to(groups_handlers::groups_get))
            .route("/", web::get().to(groups_handlers::groups_get))
            .route("/list", web::get().to(groups_handlers::get_group_list::<S>))
            .route("/refresh", web::post().to(groups_handlers::refresh_groups::<S>))
            .route("/add", web::post().to(groups_handlers::add_group::<S>))
            .route("/edit", web::post().to(groups_handlers::edit_group::<S>))
            .route("/delete", web::post().to(groups_handlers::delete_group::<S>))
            .route("/verify", web::post().to(groups_handlers::verify_group::<S>))
    );
}

pub fn admin_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-admin")
            .route("/status", web::get().to(admin_handlers::admin_status))
            .route("/enter", web::post().to(admin_handlers::enter_admin))
            .route("/exit", web::post().to(admin_handlers::exit_admin))
    );
}

/// Every directory route, for a store of type `S`.
pub fn configure<S: GroupStore + 'static>(cfg: &mut web::ServiceConfig) {
    groups_configure::<S>(cfg);
    admin_configure(cfg);
}
