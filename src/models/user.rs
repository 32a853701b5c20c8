use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::UserRoleType;
use crate::entities::users;

/// User data returned from the repository (without credentials)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub verified: bool,
    pub datecreated: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            firstname: model.firstname,
            lastname: model.lastname,
            email: model.email,
            verified: model.verified,
            datecreated: model.datecreated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<UserRoleType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<UserRoleType>,
}
