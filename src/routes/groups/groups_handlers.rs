use std::sync::Mutex;

use actix_web::{web, HttpResponse, Responder, ResponseError};
use log::info;

use super::groups_models::{
    AddGroupRequest, AddGroupResponse, DeleteGroupRequest, EditGroupRequest, GetGroupListQuery,
    GetGroupListResponse, GroupDefaultResponse, RefreshGroupsResponse, VerifyGroupRequest,
};
use crate::admin::AdminGate;
use crate::directory::Directory;
use crate::routes::admin::admin_handlers::lock_gate;
use crate::store::GroupStore;

// Default handler for the groups root
pub async fn groups_get() -> impl Responder {
    HttpResponse::Ok().body("Hello, this is the Group Directory endpoint.")
}

// Filtered view of the local list, with the sync status
pub async fn get_group_list<S: GroupStore + 'static>(
    directory: web::Data<Directory<S>>,
    query: web::Query<GetGroupListQuery>,
) -> impl Responder {
    info!(
        "Received request to list groups (search: {:?}, category: {})",
        query.search, query.category
    );
    let groups = directory.view(&query.search, query.category).await;
    HttpResponse::Ok().json(GetGroupListResponse {
        status: directory.status().await.into(),
        total: groups.len(),
        groups,
    })
}

pub async fn refresh_groups<S: GroupStore + 'static>(directory: web::Data<Directory<S>>) -> impl Responder {
    info!("Received request to refresh groups");
    let result = directory.refresh().await;
    let response = RefreshGroupsResponse {
        success: result.is_ok(),
        message: match &result {
            Ok(()) => "Groups reloaded".to_string(),
            Err(e) => e.to_string(),
        },
        status: directory.status().await.into(),
        total: directory.groups().await.len(),
    };

    match result {
        Ok(()) => HttpResponse::Ok().json(response),
        Err(e) => HttpResponse::build(e.status_code()).json(response),
    }
}

// Anyone may submit a group; it starts unverified
pub async fn add_group<S: GroupStore + 'static>(
    directory: web::Data<Directory<S>>,
    request: web::Json<AddGroupRequest>,
) -> impl Responder {
    let fields = request.into_inner().fields;
    info!("Received request to add group {}", fields.name);

    match directory.create(fields).await {
        Ok(group) => HttpResponse::Ok().json(AddGroupResponse {
            success: true,
            message: "Group created successfully".to_string(),
            group,
        }),
        Err(e) => e.error_response(),
    }
}

pub async fn edit_group<S: GroupStore + 'static>(
    directory: web::Data<Directory<S>>,
    gate: web::Data<Mutex<AdminGate>>,
    request: web::Json<EditGroupRequest>,
) -> impl Responder {
    if let Err(e) = lock_gate(&gate).require_unlocked() {
        return e.error_response();
    }
    let EditGroupRequest { id, fields } = request.into_inner();
    info!("Received request to edit group {}", id);

    match directory.edit_save(&id, fields).await {
        Ok(()) => HttpResponse::Ok().json(GroupDefaultResponse {
            success: true,
            message: "Group updated successfully".to_string(),
        }),
        Err(e) => e.error_response(),
    }
}

pub async fn delete_group<S: GroupStore + 'static>(
    directory: web::Data<Directory<S>>,
    gate: web::Data<Mutex<AdminGate>>,
    request: web::Json<DeleteGroupRequest>,
) -> impl Responder {
    if let Err(e) = lock_gate(&gate).require_unlocked() {
        return e.error_response();
    }
    info!("Received request to delete group {}", request.id);

    match directory.remove(&request.id).await {
        Ok(()) => HttpResponse::Ok().json(GroupDefaultResponse {
            success: true,
            message: "Group deleted successfully".to_string(),
        }),
        Err(e) => e.error_response(),
    }
}

pub async fn verify_group<S: GroupStore + 'static>(
    directory: web::Data<Directory<S>>,
    gate: web::Data<Mutex<AdminGate>>,
    request: web::Json<VerifyGroupRequest>,
) -> impl Responder {
    if let Err(e) = lock_gate(&gate).require_unlocked() {
        return e.error_response();
    }
    info!("Received request to set verification of group {} to {}", request.id, request.is_verified);

    match directory.set_verified(&request.id, request.is_verified).await {
        Ok(()) => HttpResponse::Ok().json(GroupDefaultResponse {
            success: true,
            message: if request.is_verified {
                "Group verified".to_string()
            } else {
                "Group unverified".to_string()
            },
        }),
        Err(e) => e.error_response(),
    }
}
