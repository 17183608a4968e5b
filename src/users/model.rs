use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RegisterUser {
    #[schemars(length(min = 1))]
    pub name: String,
    #[schemars(length(min = 1))]
    pub email: String,
    #[schemars(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: Option<UserResponse>,
}
