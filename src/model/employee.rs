use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Alice Doe",
        "email": "alice@company.com",
        "address": "12 Main St",
        "salary": 52000,
        "image": "image_1700000000.png",
        "category_id": 3,
        "category_name": "Engineering"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Alice Doe")]
    pub name: String,

    #[schema(example = "alice@company.com")]
    pub email: String,

    #[schema(example = "12 Main St", nullable = true)]
    pub address: Option<String>,

    #[schema(example = 52000, nullable = true)]
    pub salary: Option<i64>,

    /// Reference to an externally stored image, file name only.
    #[schema(example = "image_1700000000.png", nullable = true)]
    pub image: Option<String>,

    #[schema(example = 3)]
    pub category_id: u64,

    /// Joined from `categories` on reads.
    #[schema(example = "Engineering", nullable = true)]
    pub category_name: Option<String>,
}
