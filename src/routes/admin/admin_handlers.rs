use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_web::{web, HttpResponse, Responder, ResponseError};
use log::{error, info};

use super::admin_models::{AdminDefaultResponse, EnterAdminRequest};
use crate::admin::{AdminGate, Attempt, GateState};
use crate::error::DirectoryError;

pub(crate) fn lock_gate(gate: &Mutex<AdminGate>) -> MutexGuard<'_, AdminGate> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}

pub async fn admin_status(gate: web::Data<Mutex<AdminGate>>) -> impl Responder {
    let state = lock_gate(&gate).state();
    HttpResponse::Ok().json(AdminDefaultResponse {
        success: true,
        message: format!("Admin mode is {}", describe(state)),
        state,
    })
}

pub async fn enter_admin(
    gate: web::Data<Mutex<AdminGate>>,
    request: web::Json<EnterAdminRequest>,
) -> impl Responder {
    info!("Received request to enter admin mode");
    let attempt = lock_gate(&gate).attempt(request.password.as_deref());

    // bcrypt runs on the blocking pool with the gate released
    let result = match attempt {
        Attempt::Settled(state) => Ok(state),
        Attempt::Verify(check) => match web::block(move || check.run()).await {
            Ok(matched) => lock_gate(&gate).conclude(matched),
            Err(e) => {
                error!("Admin password check did not complete: {}", e);
                Err(DirectoryError::AuthorizationMismatch)
            }
        },
    };

    match result {
        Ok(state) => HttpResponse::Ok().json(AdminDefaultResponse {
            success: state == GateState::Unlocked,
            message: format!("Admin mode is {}", describe(state)),
            state,
        }),
        Err(e) => e.error_response(),
    }
}

pub async fn exit_admin(gate: web::Data<Mutex<AdminGate>>) -> impl Responder {
    info!("Received request to exit admin mode");
    let state = lock_gate(&gate).exit();
    HttpResponse::Ok().json(AdminDefaultResponse {
        success: true,
        message: format!("Admin mode is {}", describe(state)),
        state,
    })
}

fn describe(state: GateState) -> &'static str {
    match state {
        GateState::Locked => "locked",
        GateState::Unlocked => "unlocked",
    }
}
