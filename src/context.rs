// src/context.rs

/// Actor/session context supplied by the caller at the boundary.
///
/// The only session semantic this core consumes is the current user, used as
/// the default salesperson when a property is created without one.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    pub current_user_id: i64,
}

impl SessionContext {
    pub fn new(current_user_id: i64) -> Self {
        Self { current_user_id }
    }
}
