//! PostgreSQL store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{Department, DepartmentId, Employee, ProfileUpdate, UserProfile};
use sqlx::{FromRow, PgPool};

use super::filter::{FilterQuery, bind_args};
use super::{
    Credential, DepartmentFilter, DepartmentStore, EmployeeFilter, EmployeeStore, StoreError,
    StoreResult, UserStore,
};

const DEPARTMENT_COLUMNS: &str = "id, name, owner_id, created_at, updated_at";
const EMPLOYEE_COLUMNS: &str =
    "e.identity_number, e.name, e.gender, e.department_id, e.employee_image_uri";
const PROFILE_COLUMNS: &str = "email, name, user_image_uri, company_name, company_image_uri";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error, turning unique violations into `Conflict(key)`
fn db_err(op: &'static str, key: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            StoreError::Conflict(key.to_string())
        }
        other => StoreError::backend(op, other),
    }
}

fn backend(op: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| StoreError::backend(op, e)
}

/// `employees.department_id` references a department that is gone, or a
/// department delete found employees committed after its guard ran
fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[derive(FromRow)]
struct DepartmentRow {
    id: i64,
    name: String,
    owner_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Department {
            id: DepartmentId(row.id),
            name: row.name,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct EmployeeRow {
    identity_number: String,
    name: String,
    gender: String,
    department_id: i64,
    employee_image_uri: String,
}

impl EmployeeRow {
    fn into_employee(self, op: &'static str) -> StoreResult<Employee> {
        let gender = self
            .gender
            .parse()
            .map_err(|e| StoreError::backend(op, e))?;
        Ok(Employee {
            identity_number: self.identity_number,
            name: self.name,
            gender,
            department_id: DepartmentId(self.department_id),
            employee_image_uri: self.employee_image_uri,
        })
    }
}

#[derive(FromRow)]
struct CredentialRow {
    id: i64,
    email: String,
    password_hash: String,
}

impl From<CredentialRow> for Credential {
    fn from(row: CredentialRow) -> Self {
        Credential {
            principal_id: row.id,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

#[derive(FromRow)]
struct ProfileRow {
    email: String,
    name: Option<String>,
    user_image_uri: Option<String>,
    company_name: Option<String>,
    company_image_uri: Option<String>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            email: row.email,
            name: row.name,
            user_image_uri: row.user_image_uri,
            company_name: row.company_name,
            company_image_uri: row.company_image_uri,
        }
    }
}

// ── Departments ──

#[async_trait]
impl DepartmentStore for PgStore {
    async fn insert_department(&self, owner_id: i64, name: &str) -> StoreResult<Department> {
        let row: DepartmentRow = sqlx::query_as(&format!(
            "INSERT INTO departments (name, owner_id) VALUES ($1, $2) RETURNING {DEPARTMENT_COLUMNS}"
        ))
        .bind(name)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("department.insert", "department name"))?;
        Ok(row.into())
    }

    async fn department_name_taken(&self, name: &str) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM departments WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(backend("department.name_taken"))
    }

    async fn find_department(
        &self,
        owner_id: i64,
        id: DepartmentId,
    ) -> StoreResult<Option<Department>> {
        let row: Option<DepartmentRow> = sqlx::query_as(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id.get())
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend("department.find"))?;
        Ok(row.map(Into::into))
    }

    async fn list_departments(
        &self,
        owner_id: i64,
        filter: &DepartmentFilter,
    ) -> StoreResult<Vec<Department>> {
        let mut q = FilterQuery::new(format!("SELECT {DEPARTMENT_COLUMNS} FROM departments"));
        q.eq("owner_id", owner_id)
            .contains_ci("name", filter.name.as_deref())
            .order_by("id ASC");
        let (sql, args) = q.build(filter.page);

        let rows: Vec<DepartmentRow> = bind_args(sqlx::query_as(&sql), args)
            .fetch_all(&self.pool)
            .await
            .map_err(backend("department.list"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn rename_department(
        &self,
        owner_id: i64,
        id: DepartmentId,
        name: &str,
    ) -> StoreResult<Option<Department>> {
        let row: Option<DepartmentRow> = sqlx::query_as(&format!(
            "UPDATE departments SET name = $1, updated_at = NOW() \
             WHERE id = $2 AND owner_id = $3 RETURNING {DEPARTMENT_COLUMNS}"
        ))
        .bind(name)
        .bind(id.get())
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("department.rename", "department name"))?;
        Ok(row.map(Into::into))
    }

    async fn count_employees(&self, id: DepartmentId) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE department_id = $1")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(backend("department.count_employees"))
    }

    async fn delete_department(&self, owner_id: i64, id: DepartmentId) -> StoreResult<u64> {
        let result = sqlx::query(
            "DELETE FROM departments d WHERE d.id = $1 AND d.owner_id = $2 \
             AND NOT EXISTS (SELECT 1 FROM employees e WHERE e.department_id = d.id)",
        )
        .bind(id.get())
        .bind(owner_id)
        .execute(&self.pool)
        .await;
        match result {
            Ok(done) => Ok(done.rows_affected()),
            Err(e) if is_foreign_key_violation(&e) => Ok(0),
            Err(e) => Err(StoreError::backend("department.delete", e)),
        }
    }
}

// ── Employees ──

#[async_trait]
impl EmployeeStore for PgStore {
    async fn identity_taken(&self, identity_number: &str) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM employees WHERE identity_number = $1)")
            .bind(identity_number)
            .fetch_one(&self.pool)
            .await
            .map_err(backend("employee.identity_taken"))
    }

    async fn insert_employee(
        &self,
        owner_id: i64,
        employee: &Employee,
    ) -> StoreResult<Option<Employee>> {
        // Inserts nothing when the department is not owned by the caller
        let row = sqlx::query_as(&format!(
            "INSERT INTO employees AS e \
             (identity_number, name, gender, department_id, employee_image_uri) \
             SELECT $1, $2, $3, d.id, $4 FROM departments d WHERE d.id = $5 AND d.owner_id = $6 \
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(&employee.identity_number)
        .bind(&employee.name)
        .bind(employee.gender.as_str())
        .bind(&employee.employee_image_uri)
        .bind(employee.department_id.get())
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        let row: Option<EmployeeRow> = match row {
            Err(e) if is_foreign_key_violation(&e) => return Ok(None),
            other => other.map_err(db_err("employee.insert", "identity number"))?,
        };
        row.map(|r| r.into_employee("employee.insert")).transpose()
    }

    async fn find_employee(
        &self,
        owner_id: i64,
        identity_number: &str,
    ) -> StoreResult<Option<Employee>> {
        let row: Option<EmployeeRow> = sqlx::query_as(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees e \
             JOIN departments d ON d.id = e.department_id \
             WHERE e.identity_number = $1 AND d.owner_id = $2"
        ))
        .bind(identity_number)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend("employee.find"))?;
        row.map(|r| r.into_employee("employee.find")).transpose()
    }

    async fn list_employees(
        &self,
        owner_id: i64,
        filter: &EmployeeFilter,
    ) -> StoreResult<Vec<Employee>> {
        let mut q = FilterQuery::new(format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees e JOIN departments d ON d.id = e.department_id"
        ));
        q.eq("d.owner_id", owner_id)
            .starts_with("e.identity_number", filter.identity_number.as_deref())
            .contains_ci("e.name", filter.name.as_deref())
            .eq_opt("e.gender", filter.gender.map(|g| g.as_str()))
            .eq_opt("e.department_id", filter.department_id.map(DepartmentId::get))
            .order_by("e.identity_number ASC");
        let (sql, args) = q.build(filter.page);

        let rows: Vec<EmployeeRow> = bind_args(sqlx::query_as(&sql), args)
            .fetch_all(&self.pool)
            .await
            .map_err(backend("employee.list"))?;
        rows.into_iter()
            .map(|r| r.into_employee("employee.list"))
            .collect()
    }

    async fn update_employee(
        &self,
        owner_id: i64,
        employee: &Employee,
    ) -> StoreResult<Option<Employee>> {
        let row = sqlx::query_as(&format!(
            "UPDATE employees e SET name = $1, gender = $2, department_id = $3, \
             employee_image_uri = $4, updated_at = NOW() \
             WHERE e.identity_number = $5 \
             AND EXISTS (SELECT 1 FROM departments cur WHERE cur.id = e.department_id AND cur.owner_id = $6) \
             AND EXISTS (SELECT 1 FROM departments dst WHERE dst.id = $3 AND dst.owner_id = $6) \
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(&employee.name)
        .bind(employee.gender.as_str())
        .bind(employee.department_id.get())
        .bind(&employee.employee_image_uri)
        .bind(&employee.identity_number)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        let row: Option<EmployeeRow> = match row {
            Err(e) if is_foreign_key_violation(&e) => return Ok(None),
            other => other.map_err(backend("employee.update"))?,
        };
        row.map(|r| r.into_employee("employee.update")).transpose()
    }

    async fn delete_employee(&self, owner_id: i64, identity_number: &str) -> StoreResult<u64> {
        let result = sqlx::query(
            "DELETE FROM employees e USING departments d \
             WHERE e.identity_number = $1 AND d.id = e.department_id AND d.owner_id = $2",
        )
        .bind(identity_number)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(backend("employee.delete"))?;
        Ok(result.rows_affected())
    }
}

// ── Users ──

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, email: &str, password_hash: &str) -> StoreResult<Credential> {
        let row: CredentialRow = sqlx::query_as(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) \
             RETURNING id, email, password_hash",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("user.insert", "email"))?;
        Ok(row.into())
    }

    async fn find_credential(&self, email: &str) -> StoreResult<Option<Credential>> {
        let row: Option<CredentialRow> =
            sqlx::query_as("SELECT id, email, password_hash FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend("user.find_credential"))?;
        Ok(row.map(Into::into))
    }

    async fn find_profile(&self, user_id: i64) -> StoreResult<Option<UserProfile>> {
        let row: Option<ProfileRow> =
            sqlx::query_as(&format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"))
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend("user.find_profile"))?;
        Ok(row.map(Into::into))
    }

    async fn email_taken_by_other(&self, email: &str, except_id: i64) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND id <> $2)")
            .bind(email)
            .bind(except_id)
            .fetch_one(&self.pool)
            .await
            .map_err(backend("user.email_taken"))
    }

    async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<UserProfile>> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!(
            "UPDATE users SET email = $1, name = $2, user_image_uri = $3, \
             company_name = $4, company_image_uri = $5, updated_at = NOW() \
             WHERE id = $6 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(&update.email)
        .bind(&update.name)
        .bind(&update.user_image_uri)
        .bind(&update.company_name)
        .bind(&update.company_image_uri)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("user.update_profile", "email"))?;
        Ok(row.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INIT_SQL: &str = include_str!("../../migrations/0001_init.sql");

    fn employees_table() -> &'static str {
        let start = INIT_SQL.find("CREATE TABLE IF NOT EXISTS employees").unwrap();
        let end = start + INIT_SQL[start..].find(");").unwrap();
        &INIT_SQL[start..end]
    }

    #[test]
    fn test_employee_department_is_a_restricting_foreign_key() {
        let table = employees_table();
        let column = table
            .lines()
            .find(|l| l.trim_start().starts_with("department_id"))
            .unwrap();
        assert!(column.contains("REFERENCES departments (id)"));
        assert!(!table.contains("CASCADE"));
        assert!(!table.contains("SET NULL"));
    }

    #[test]
    fn test_non_database_errors_are_not_foreign_key_violations() {
        assert!(!is_foreign_key_violation(&sqlx::Error::RowNotFound));
        assert!(!is_foreign_key_violation(&sqlx::Error::PoolTimedOut));
    }
}
