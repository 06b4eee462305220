pub mod category;
pub mod group;

pub use category::Category;
pub use group::{Group, GroupFields, GroupId, GroupPatch};
