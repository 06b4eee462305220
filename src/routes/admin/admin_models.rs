use serde::{Deserialize, Serialize};

use crate::admin::GateState;

// a missing or empty password is a cancelled prompt
#[derive(Deserialize)]
pub struct EnterAdminRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct AdminDefaultResponse {
    pub success: bool,
    pub message: String,
    pub state: GateState,
}
