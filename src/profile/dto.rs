use serde::{Deserialize, Serialize};

use crate::auth::validation::{
    name_rules, new_password_rules, phone_rules, Checks, Rule, Validate, PASSWORD_MISMATCH,
};
use crate::error::FieldErrors;

pub const CURRENT_PASSWORD_REQUIRED: &str = "Current password is required";

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub phone_number: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

impl Validate for ProfileUpdateRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Checks::new()
            .field("name", &self.name, &name_rules())
            .field("phone_number", &self.phone_number, &phone_rules())
            .finish()
    }
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Checks::new()
            .field(
                "current_password",
                &self.current_password,
                &[Rule::MinChars(6, CURRENT_PASSWORD_REQUIRED)],
            )
            .field("new_password", &self.new_password, &new_password_rules())
            .field(
                "confirm_new_password",
                &self.confirm_new_password,
                &[Rule::Equals(&self.new_password, PASSWORD_MISMATCH)],
            )
            .finish()
    }
}
