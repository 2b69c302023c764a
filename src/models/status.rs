//! Status codes shared by every entity

/// Publication status. The numeric ids are what the store and the wire carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Enabled,
    Disabled,
    Deleted,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Enabled, Status::Disabled, Status::Deleted];

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Status::Enabled),
            2 => Some(Status::Disabled),
            3 => Some(Status::Deleted),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            Status::Enabled => 1,
            Status::Disabled => 2,
            Status::Deleted => 3,
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            Status::Enabled => "enabled",
            Status::Disabled => "disabled",
            Status::Deleted => "deleted",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Status::Enabled => "Published",
            Status::Disabled => "Unpublished",
            Status::Deleted => "Deleted",
        }
    }
}
