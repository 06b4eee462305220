pub mod admin {
    pub mod admin_handlers;
    pub mod admin_models;
}

pub mod groups {
    pub mod groups_handlers;
    pub mod groups_models;
}

#[allow(clippy::module_inception)]
pub mod routes;
