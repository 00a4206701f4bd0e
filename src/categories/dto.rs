use serde::{Deserialize, Serialize};

use crate::auth::validation::{Checks, Rule, Validate};
use crate::error::FieldErrors;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: Option<String>,
}

impl Validate for CreateCategoryRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut checks = Checks::new().field(
            "name",
            &self.name,
            &[Rule::MinChars(1, "Category name is required")],
        );
        if let Some(color) = &self.color {
            checks = checks.field("color", color, &[Rule::HexColor]);
        }
        checks.finish()
    }
}

/// Filter dropdown entry.
#[derive(Debug, Serialize)]
pub struct CategoryOption {
    pub name: String,
    pub color: String,
}
