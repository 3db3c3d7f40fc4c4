//! SQL statements for the operation record CRUD operations.
//!
//! Every statement is parameterized and scoped to a `user_id` partition;
//! mutations match on `id AND user_id` so a caller can never touch another
//! partition's rows, even with a correctly guessed id.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use tracing::debug;

use opkatalog_core::{OperationDraft, OperationRecord};
use opkatalog_storage::StorageError;

use crate::error::map_sqlx_error;

const SELECT_FOR_USER: &str = "\
SELECT id, date, patient_id, patient_name, patient_dob, diagnosis, \
       operation_raw, operation_short, role, anatomical_regions, \
       procedures, implant_types, notes, duration, surgeon, \
       created_at, updated_at \
FROM op_katalog_operations \
WHERE user_id = $1 \
ORDER BY date DESC, id DESC";

const INSERT_ONE: &str = "\
INSERT INTO op_katalog_operations \
    (user_id, date, patient_id, patient_name, patient_dob, diagnosis, \
     operation_raw, operation_short, role, anatomical_regions, \
     procedures, implant_types, notes, duration, surgeon) \
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
RETURNING id";

const UPDATE_ONE: &str = "\
UPDATE op_katalog_operations SET \
    date = $1, \
    patient_id = $2, \
    patient_name = $3, \
    patient_dob = $4, \
    diagnosis = $5, \
    operation_raw = $6, \
    operation_short = $7, \
    role = $8, \
    anatomical_regions = $9, \
    procedures = $10, \
    implant_types = $11, \
    notes = $12, \
    duration = $13, \
    surgeon = $14, \
    updated_at = CURRENT_TIMESTAMP \
WHERE id = $15 AND user_id = $16";

const DELETE_ONE: &str = "DELETE FROM op_katalog_operations WHERE id = $1 AND user_id = $2";

const DELETE_ALL_FOR_USER: &str = "DELETE FROM op_katalog_operations WHERE user_id = $1";

/// One row of the operations table, in column shape.
///
/// JSONB array columns decode through [`Json`]; `NULL` arrays are coerced
/// to empty vectors when converting to the external record shape.
#[derive(Debug, sqlx::FromRow)]
struct OperationRow {
    id: i32,
    date: Option<NaiveDate>,
    patient_id: Option<String>,
    patient_name: Option<String>,
    patient_dob: Option<NaiveDate>,
    diagnosis: Option<String>,
    operation_raw: Option<String>,
    operation_short: Option<String>,
    role: Option<String>,
    anatomical_regions: Option<Json<Vec<String>>>,
    procedures: Option<Json<Vec<String>>>,
    implant_types: Option<Json<Vec<String>>>,
    notes: Option<String>,
    duration: Option<i32>,
    surgeon: Option<String>,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
}

impl From<OperationRow> for OperationRecord {
    fn from(row: OperationRow) -> Self {
        Self {
            id: row.id,
            date: row.date,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            patient_dob: row.patient_dob,
            diagnosis: row.diagnosis,
            operation_raw: row.operation_raw,
            operation_short: row.operation_short,
            role: row.role,
            anatomical_regions: row.anatomical_regions.map(|j| j.0).unwrap_or_default(),
            procedures: row.procedures.map(|j| j.0).unwrap_or_default(),
            implant_types: row.implant_types.map(|j| j.0).unwrap_or_default(),
            notes: row.notes,
            duration: row.duration,
            surgeon: row.surgeon,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Binds the 14 non-key draft fields in column order.
fn bind_draft<'q>(
    query: Query<'q, Postgres, PgArguments>,
    draft: &'q OperationDraft,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(draft.date)
        .bind(draft.patient_id.as_deref())
        .bind(draft.patient_name.as_deref())
        .bind(draft.patient_dob)
        .bind(draft.diagnosis.as_deref())
        .bind(draft.operation_raw.as_deref())
        .bind(draft.operation_short.as_deref())
        .bind(draft.role.as_deref())
        .bind(Json(&draft.anatomical_regions))
        .bind(Json(&draft.procedures))
        .bind(Json(&draft.implant_types))
        .bind(draft.notes.as_deref())
        .bind(draft.duration)
        .bind(draft.surgeon.as_deref())
}

/// Returns all records for `user_id`, newest date first.
pub async fn list(pool: &PgPool, user_id: &str) -> Result<Vec<OperationRecord>, StorageError> {
    let rows: Vec<OperationRow> = sqlx::query_as(SELECT_FOR_USER)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(map_sqlx_error)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Inserts a single record and returns the server-assigned id.
pub async fn create(
    pool: &PgPool,
    user_id: &str,
    draft: &OperationDraft,
) -> Result<i32, StorageError> {
    let id: i32 = bind_draft(sqlx::query(INSERT_ONE).bind(user_id), draft)
        .fetch_one(pool)
        .await
        .and_then(|row| {
            use sqlx::Row as _;
            row.try_get(0)
        })
        .map_err(map_sqlx_error)?;

    debug!(id, user_id, "Operation created");

    Ok(id)
}

/// Replaces the non-key fields of one record, refreshing `updated_at`.
/// Returns the number of rows matched (0 or 1).
pub async fn update(
    pool: &PgPool,
    id: i32,
    user_id: &str,
    draft: &OperationDraft,
) -> Result<u64, StorageError> {
    let result = bind_draft(sqlx::query(UPDATE_ONE), draft)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(map_sqlx_error)?;

    debug!(
        id,
        user_id,
        rows_affected = result.rows_affected(),
        "Operation update executed"
    );

    Ok(result.rows_affected())
}

/// Deletes at most one record matching both `id` and `user_id`.
pub async fn delete(pool: &PgPool, id: i32, user_id: &str) -> Result<(), StorageError> {
    let result = sqlx::query(DELETE_ONE)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(map_sqlx_error)?;

    debug!(
        id,
        user_id,
        rows_affected = result.rows_affected(),
        "Operation delete executed"
    );

    Ok(())
}

/// Inserts a batch of records inside one transaction.
///
/// Any failed insert aborts the transaction; the rollback is issued by
/// sqlx when the uncommitted transaction is dropped.
pub async fn bulk_import(
    pool: &PgPool,
    user_id: &str,
    drafts: &[OperationDraft],
) -> Result<usize, StorageError> {
    let mut tx = pool.begin().await.map_err(map_sqlx_error)?;

    for draft in drafts {
        bind_draft(sqlx::query(INSERT_ONE).bind(user_id), draft)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
    }

    tx.commit().await.map_err(map_sqlx_error)?;

    debug!(user_id, imported = drafts.len(), "Bulk import committed");

    Ok(drafts.len())
}

/// Deletes all records for `user_id`, returning the count removed.
pub async fn clear(pool: &PgPool, user_id: &str) -> Result<u64, StorageError> {
    let result = sqlx::query(DELETE_ALL_FOR_USER)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(map_sqlx_error)?;

    debug!(
        user_id,
        deleted = result.rows_affected(),
        "Clear executed"
    );

    Ok(result.rows_affected())
}

/// Trivial connectivity probe.
pub async fn ping(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(map_sqlx_error)?;

    Ok(())
}
