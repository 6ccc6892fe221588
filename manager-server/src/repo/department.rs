//! Department repository

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{Department, DepartmentId, DepartmentQuery};
use shared::util::non_blank;

use super::conflict_as;
use crate::db::{DepartmentFilter, DepartmentStore, Page};
use crate::error::ServiceResult;

impl DepartmentFilter {
    pub fn from_query(query: &DepartmentQuery) -> Self {
        Self {
            name: non_blank(query.name.as_deref()).map(str::to_string),
            page: Page::parse(query.limit.as_deref(), query.offset.as_deref()),
        }
    }
}

#[derive(Clone)]
pub struct DepartmentRepository {
    store: Arc<dyn DepartmentStore>,
}

impl DepartmentRepository {
    pub fn new(store: Arc<dyn DepartmentStore>) -> Self {
        Self { store }
    }

    /// Create a department. Names are unique across all owners.
    pub async fn create(&self, owner_id: i64, name: &str) -> ServiceResult<Department> {
        if self.store.department_name_taken(name).await? {
            return Err(AppError::new(ErrorCode::DepartmentNameExists).into());
        }

        // The unique index still guards a concurrent insert of the same name
        let department = self
            .store
            .insert_department(owner_id, name)
            .await
            .map_err(conflict_as(ErrorCode::DepartmentNameExists))?;

        tracing::info!(
            principal_id = owner_id,
            department_id = %department.id,
            "Department created"
        );
        Ok(department)
    }

    pub async fn list(
        &self,
        owner_id: i64,
        filter: &DepartmentFilter,
    ) -> ServiceResult<Vec<Department>> {
        Ok(self.store.list_departments(owner_id, filter).await?)
    }

    /// Lookup scoped to the owner; foreign and missing ids both yield `DepartmentNotFound`
    pub async fn find_by_id(&self, owner_id: i64, id: DepartmentId) -> ServiceResult<Department> {
        self.store
            .find_department(owner_id, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound).into())
    }

    pub async fn update(
        &self,
        owner_id: i64,
        id: DepartmentId,
        name: &str,
    ) -> ServiceResult<Department> {
        let current = self.find_by_id(owner_id, id).await?;
        if current.name != name && self.store.department_name_taken(name).await? {
            return Err(AppError::new(ErrorCode::DepartmentNameExists).into());
        }

        let updated = self
            .store
            .rename_department(owner_id, id, name)
            .await
            .map_err(conflict_as(ErrorCode::DepartmentNameExists))?
            .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound))?;

        tracing::info!(principal_id = owner_id, department_id = %id, "Department renamed");
        Ok(updated)
    }

    pub async fn count_employees(&self, id: DepartmentId) -> ServiceResult<i64> {
        Ok(self.store.count_employees(id).await?)
    }

    /// Delete a department that no employee references
    pub async fn delete(&self, owner_id: i64, id: DepartmentId) -> ServiceResult<()> {
        self.find_by_id(owner_id, id).await?;
        if self.count_employees(id).await? > 0 {
            return Err(AppError::new(ErrorCode::DepartmentHasEmployees).into());
        }

        if self.store.delete_department(owner_id, id).await? == 0 {
            // Lost a race: either the row is gone or an employee was added
            self.find_by_id(owner_id, id).await?;
            return Err(AppError::new(ErrorCode::DepartmentHasEmployees).into());
        }

        tracing::info!(principal_id = owner_id, department_id = %id, "Department deleted");
        Ok(())
    }
}
