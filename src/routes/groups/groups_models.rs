use serde::{Deserialize, Serialize};

use crate::directory::SyncStatus;
use crate::filter::CategoryFilter;
use crate::models::{Group, GroupFields, GroupId};

#[derive(Deserialize)]
pub struct GetGroupListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: CategoryFilter,
}

// sync status as shown to the display
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncStatusBody {
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<SyncStatus> for SyncStatusBody {
    fn from(status: SyncStatus) -> Self {
        match status {
            SyncStatus::Loading => SyncStatusBody { state: "loading".into(), kind: None, message: None },
            SyncStatus::Ready => SyncStatusBody { state: "ready".into(), kind: None, message: None },
            SyncStatus::Failed(e) => SyncStatusBody {
                state: "failed".into(),
                kind: Some(e.kind().into()),
                message: Some(e.to_string()),
            },
        }
    }
}

// filtered list of groups
#[derive(Serialize)]
pub struct GetGroupListResponse {
    pub status: SyncStatusBody,
    pub total: usize,
    pub groups: Vec<Group>,
}

#[derive(Serialize)]
pub struct RefreshGroupsResponse {
    pub success: bool,
    pub message: String,
    pub status: SyncStatusBody,
    pub total: usize,
}

#[derive(Deserialize)]
pub struct AddGroupRequest {
    #[serde(flatten)]
    pub fields: GroupFields,
}

#[derive(Serialize)]
pub struct AddGroupResponse {
    pub success: bool,
    pub message: String,
    pub group: Group,
}

#[derive(Deserialize)]
pub struct EditGroupRequest {
    pub id: GroupId,
    #[serde(flatten)]
    pub fields: GroupFields,
}

#[derive(Deserialize)]
pub struct DeleteGroupRequest {
    pub id: GroupId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyGroupRequest {
    pub id: GroupId,
    pub is_verified: bool,
}

#[derive(Serialize)]
pub struct GroupDefaultResponse {
    pub success: bool,
    pub message: String,
}
