//! Database repository for the operator directory.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{NewOperator, Operator, OperatorContact, OperatorRole};

/// Database repository for operator records.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all operators, most recently created first.
    pub async fn list_operators(&self) -> Result<Vec<Operator>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, name, role, sub_district, experience,
                      contact_phone, contact_email, contact_address,
                      status, created_at, updated_at
               FROM operators ORDER BY created_at DESC, rowid DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(operator_from_row).collect()
    }

    /// Persist a new operator and return the stored record.
    pub async fn create_operator(&self, new: &NewOperator) -> Result<Operator, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        sqlx::query(
            r#"INSERT INTO operators (
                id, name, role, sub_district, experience,
                contact_phone, contact_email, contact_address,
                status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&new.name)
        .bind(new.role.as_str())
        .bind(&new.sub_district)
        .bind(&new.experience)
        .bind(&new.contact.phone)
        .bind(&new.contact.email)
        .bind(&new.contact.address)
        .bind(&new.status)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Operator {
            id,
            name: new.name.clone(),
            role: new.role,
            sub_district: new.sub_district.clone(),
            experience: new.experience.clone(),
            contact: new.contact.clone(),
            status: new.status.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Delete an operator. Returns whether a record was removed.
    pub async fn delete_operator(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM operators WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn operator_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Operator, AppError> {
    let id: String = row.get("id");
    let stored_role: String = row.get("role");
    let role = OperatorRole::parse(&stored_role).ok_or_else(|| {
        tracing::warn!(operator_id = %id, role = %stored_role, "stored operator has unknown role");
        AppError::Database(format!("Operator {} has unknown role {:?}", id, stored_role))
    })?;

    Ok(Operator {
        id,
        name: row.get("name"),
        role,
        sub_district: row.get("sub_district"),
        experience: row.get("experience"),
        contact: OperatorContact {
            phone: row.get("contact_phone"),
            email: row.get("contact_email"),
            address: row.get("contact_address"),
        },
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
