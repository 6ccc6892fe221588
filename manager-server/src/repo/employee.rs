//! Employee repository
//!
//! Employees are owned through their department: every operation only sees
//! employees whose department belongs to the acting principal. Identity
//! numbers are unique across all owners.

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    DepartmentId, Employee, EmployeeCreate, EmployeeQuery, EmployeeUpdate, Gender,
};
use shared::util::non_blank;

use super::conflict_as;
use crate::db::{DepartmentStore, EmployeeFilter, EmployeeStore, Page};
use crate::error::ServiceResult;

fn parse_gender(raw: &str) -> Result<Gender, AppError> {
    raw.parse()
        .map_err(|_| AppError::new(ErrorCode::InvalidGender).with_detail("gender", raw))
}

fn parse_department_id(raw: &str) -> Result<DepartmentId, AppError> {
    raw.parse().map_err(|_| {
        AppError::validation("departmentId must be a department identifier")
            .with_detail("field", "departmentId")
    })
}

impl EmployeeFilter {
    /// Build a filter from raw query-string values; blank values are ignored
    pub fn from_query(query: &EmployeeQuery) -> Result<Self, AppError> {
        Ok(Self {
            identity_number: non_blank(query.identity_number.as_deref()).map(str::to_string),
            name: non_blank(query.name.as_deref()).map(str::to_string),
            gender: non_blank(query.gender.as_deref())
                .map(parse_gender)
                .transpose()?,
            department_id: non_blank(query.department_id.as_deref())
                .map(parse_department_id)
                .transpose()?,
            page: Page::parse(query.limit.as_deref(), query.offset.as_deref()),
        })
    }
}

#[derive(Clone)]
pub struct EmployeeRepository {
    employees: Arc<dyn EmployeeStore>,
    departments: Arc<dyn DepartmentStore>,
}

impl EmployeeRepository {
    pub fn new(employees: Arc<dyn EmployeeStore>, departments: Arc<dyn DepartmentStore>) -> Self {
        Self {
            employees,
            departments,
        }
    }

    /// Resolve `department_id` under `owner_id` or fail with `DepartmentNotFound`
    async fn owned_department(&self, owner_id: i64, id: DepartmentId) -> ServiceResult<()> {
        match self.departments.find_department(owner_id, id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::new(ErrorCode::DepartmentNotFound)
                .with_detail("departmentId", id.to_string())
                .into()),
        }
    }

    /// Gender, identity uniqueness and department ownership are all checked
    /// before anything is written.
    pub async fn create(&self, owner_id: i64, data: &EmployeeCreate) -> ServiceResult<Employee> {
        let gender = parse_gender(&data.gender)?;
        let department_id = parse_department_id(&data.department_id)?;

        if self.employees.identity_taken(&data.identity_number).await? {
            return Err(AppError::new(ErrorCode::EmployeeIdentityExists).into());
        }
        self.owned_department(owner_id, department_id).await?;

        let employee = Employee {
            identity_number: data.identity_number.clone(),
            name: data.name.clone(),
            gender,
            department_id,
            employee_image_uri: data.employee_image_uri.clone(),
        };

        let created = self
            .employees
            .insert_employee(owner_id, &employee)
            .await
            .map_err(conflict_as(ErrorCode::EmployeeIdentityExists))?
            .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound))?;

        tracing::info!(
            principal_id = owner_id,
            identity_number = %created.identity_number,
            department_id = %created.department_id,
            "Employee created"
        );
        Ok(created)
    }

    pub async fn list(&self, owner_id: i64, filter: &EmployeeFilter) -> ServiceResult<Vec<Employee>> {
        Ok(self.employees.list_employees(owner_id, filter).await?)
    }

    pub async fn find(&self, owner_id: i64, identity_number: &str) -> ServiceResult<Employee> {
        self.employees
            .find_employee(owner_id, identity_number)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound).into())
    }

    /// Replace name, gender, department and image of an existing employee
    pub async fn update(
        &self,
        owner_id: i64,
        identity_number: &str,
        data: &EmployeeUpdate,
    ) -> ServiceResult<Employee> {
        self.find(owner_id, identity_number).await?;

        let gender = parse_gender(&data.gender)?;
        let department_id = parse_department_id(&data.department_id)?;
        self.owned_department(owner_id, department_id).await?;

        let employee = Employee {
            identity_number: identity_number.to_string(),
            name: data.name.clone(),
            gender,
            department_id,
            employee_image_uri: data.employee_image_uri.clone(),
        };

        let updated = self
            .employees
            .update_employee(owner_id, &employee)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

        tracing::info!(principal_id = owner_id, identity_number, "Employee updated");
        Ok(updated)
    }

    pub async fn delete(&self, owner_id: i64, identity_number: &str) -> ServiceResult<()> {
        self.find(owner_id, identity_number).await?;

        if self.employees.delete_employee(owner_id, identity_number).await? == 0 {
            return Err(AppError::new(ErrorCode::EmployeeNotFound).into());
        }

        tracing::info!(principal_id = owner_id, identity_number, "Employee deleted");
        Ok(())
    }
}
