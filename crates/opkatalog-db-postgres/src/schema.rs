//! Create-if-missing schema for the operations table.

use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::error::Result;

/// Name of the single table holding all operation records.
pub const OPERATIONS_TABLE: &str = "op_katalog_operations";

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS op_katalog_operations (
    id SERIAL PRIMARY KEY,
    user_id VARCHAR(255) DEFAULT 'default',
    date DATE,
    patient_id VARCHAR(255),
    patient_name VARCHAR(255),
    patient_dob DATE,
    diagnosis TEXT,
    operation_raw TEXT,
    operation_short VARCHAR(255),
    role VARCHAR(50),
    anatomical_regions JSONB,
    procedures JSONB,
    implant_types JSONB,
    notes TEXT,
    duration INTEGER,
    surgeon VARCHAR(255),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

// The list endpoint filters on user_id and orders by date; both need an
// index to stay cheap as the log grows.
const CREATE_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_op_katalog_user ON op_katalog_operations(user_id)";
const CREATE_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_op_katalog_date ON op_katalog_operations(date)";

/// Creates the operations table and its indexes when missing.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the DDL fails.
#[instrument(skip(pool))]
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_TABLE).execute(pool).await?;
    sqlx::query(CREATE_USER_INDEX).execute(pool).await?;
    sqlx::query(CREATE_DATE_INDEX).execute(pool).await?;

    debug!(table = OPERATIONS_TABLE, "Schema initialized");

    Ok(())
}
