//! In-memory store for tests and local runs
//!
//! All tables sit behind one lock, so every conditional write checks its
//! precondition and applies the change atomically, like the SQL statements
//! in `PgStore`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use shared::models::{Department, DepartmentId, Employee, ProfileUpdate, UserProfile};

use super::filter::Page;
use super::{
    Credential, DepartmentFilter, DepartmentStore, EmployeeFilter, EmployeeStore, StoreError,
    StoreResult, UserStore,
};

#[derive(Debug, Clone)]
struct UserRow {
    email: String,
    password_hash: String,
    profile: UserProfile,
}

#[derive(Debug, Default)]
struct Tables {
    departments: BTreeMap<i64, Department>,
    next_department_id: i64,
    employees: BTreeMap<String, Employee>,
    users: BTreeMap<i64, UserRow>,
    next_user_id: i64,
}

impl Tables {
    fn owned_department(&self, owner_id: i64, id: DepartmentId) -> Option<&Department> {
        self.departments
            .get(&id.get())
            .filter(|d| d.owner_id == owner_id)
    }

    fn visible_employee(&self, owner_id: i64, identity_number: &str) -> Option<&Employee> {
        self.employees
            .get(identity_number)
            .filter(|e| self.owned_department(owner_id, e.department_id).is_some())
    }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

fn paginate<T>(items: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    items
        .skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn insert_department(&self, owner_id: i64, name: &str) -> StoreResult<Department> {
        let mut t = self.tables.write();
        if t.departments.values().any(|d| d.name == name) {
            return Err(StoreError::Conflict("department name".into()));
        }
        t.next_department_id += 1;
        let now = Utc::now();
        let department = Department {
            id: DepartmentId(t.next_department_id),
            name: name.to_string(),
            owner_id,
            created_at: now,
            updated_at: now,
        };
        t.departments
            .insert(department.id.get(), department.clone());
        Ok(department)
    }

    async fn department_name_taken(&self, name: &str) -> StoreResult<bool> {
        Ok(self.tables.read().departments.values().any(|d| d.name == name))
    }

    async fn find_department(
        &self,
        owner_id: i64,
        id: DepartmentId,
    ) -> StoreResult<Option<Department>> {
        Ok(self.tables.read().owned_department(owner_id, id).cloned())
    }

    async fn list_departments(
        &self,
        owner_id: i64,
        filter: &DepartmentFilter,
    ) -> StoreResult<Vec<Department>> {
        let t = self.tables.read();
        let matching = t
            .departments
            .values()
            .filter(|d| d.owner_id == owner_id)
            .filter(|d| contains_ci(&d.name, filter.name.as_deref()))
            .cloned();
        Ok(paginate(matching, filter.page))
    }

    async fn rename_department(
        &self,
        owner_id: i64,
        id: DepartmentId,
        name: &str,
    ) -> StoreResult<Option<Department>> {
        let mut t = self.tables.write();
        if t.owned_department(owner_id, id).is_none() {
            return Ok(None);
        }
        if t
            .departments
            .values()
            .any(|d| d.name == name && d.id != id)
        {
            return Err(StoreError::Conflict("department name".into()));
        }
        Ok(t.departments.get_mut(&id.get()).map(|d| {
            d.name = name.to_string();
            d.updated_at = Utc::now();
            d.clone()
        }))
    }

    async fn count_employees(&self, id: DepartmentId) -> StoreResult<i64> {
        let t = self.tables.read();
        Ok(t.employees
            .values()
            .filter(|e| e.department_id == id)
            .count() as i64)
    }

    async fn delete_department(&self, owner_id: i64, id: DepartmentId) -> StoreResult<u64> {
        let mut t = self.tables.write();
        let has_employees = t.employees.values().any(|e| e.department_id == id);
        if t.owned_department(owner_id, id).is_none() || has_employees {
            return Ok(0);
        }
        t.departments.remove(&id.get());
        Ok(1)
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn identity_taken(&self, identity_number: &str) -> StoreResult<bool> {
        Ok(self.tables.read().employees.contains_key(identity_number))
    }

    async fn insert_employee(
        &self,
        owner_id: i64,
        employee: &Employee,
    ) -> StoreResult<Option<Employee>> {
        let mut t = self.tables.write();
        if t.owned_department(owner_id, employee.department_id).is_none() {
            return Ok(None);
        }
        if t.employees.contains_key(&employee.identity_number) {
            return Err(StoreError::Conflict("identity number".into()));
        }
        t.employees
            .insert(employee.identity_number.clone(), employee.clone());
        Ok(Some(employee.clone()))
    }

    async fn find_employee(
        &self,
        owner_id: i64,
        identity_number: &str,
    ) -> StoreResult<Option<Employee>> {
        Ok(self
            .tables
            .read()
            .visible_employee(owner_id, identity_number)
            .cloned())
    }

    async fn list_employees(
        &self,
        owner_id: i64,
        filter: &EmployeeFilter,
    ) -> StoreResult<Vec<Employee>> {
        let t = self.tables.read();
        let matching = t
            .employees
            .values()
            .filter(|e| t.owned_department(owner_id, e.department_id).is_some())
            .filter(|e| {
                filter
                    .identity_number
                    .as_deref()
                    .is_none_or(|p| e.identity_number.starts_with(p))
            })
            .filter(|e| contains_ci(&e.name, filter.name.as_deref()))
            .filter(|e| filter.gender.is_none_or(|g| e.gender == g))
            .filter(|e| filter.department_id.is_none_or(|d| e.department_id == d))
            .cloned();
        Ok(paginate(matching, filter.page))
    }

    async fn update_employee(
        &self,
        owner_id: i64,
        employee: &Employee,
    ) -> StoreResult<Option<Employee>> {
        let mut t = self.tables.write();
        if t.visible_employee(owner_id, &employee.identity_number).is_none()
            || t.owned_department(owner_id, employee.department_id).is_none()
        {
            return Ok(None);
        }
        t.employees
            .insert(employee.identity_number.clone(), employee.clone());
        Ok(Some(employee.clone()))
    }

    async fn delete_employee(&self, owner_id: i64, identity_number: &str) -> StoreResult<u64> {
        let mut t = self.tables.write();
        if t.visible_employee(owner_id, identity_number).is_none() {
            return Ok(0);
        }
        t.employees.remove(identity_number);
        Ok(1)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, email: &str, password_hash: &str) -> StoreResult<Credential> {
        let mut t = self.tables.write();
        if t.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict("email".into()));
        }
        t.next_user_id += 1;
        let id = t.next_user_id;
        t.users.insert(
            id,
            UserRow {
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                profile: UserProfile {
                    email: email.to_string(),
                    name: None,
                    user_image_uri: None,
                    company_name: None,
                    company_image_uri: None,
                },
            },
        );
        Ok(Credential {
            principal_id: id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    async fn find_credential(&self, email: &str) -> StoreResult<Option<Credential>> {
        let t = self.tables.read();
        Ok(t.users
            .iter()
            .find(|(_, u)| u.email == email)
            .map(|(id, u)| Credential {
                principal_id: *id,
                email: u.email.clone(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn find_profile(&self, user_id: i64) -> StoreResult<Option<UserProfile>> {
        Ok(self
            .tables
            .read()
            .users
            .get(&user_id)
            .map(|u| u.profile.clone()))
    }

    async fn email_taken_by_other(&self, email: &str, except_id: i64) -> StoreResult<bool> {
        let t = self.tables.read();
        Ok(t.users
            .iter()
            .any(|(id, u)| *id != except_id && u.email == email))
    }

    async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> StoreResult<Option<UserProfile>> {
        let mut t = self.tables.write();
        if t
            .users
            .iter()
            .any(|(id, u)| *id != user_id && u.email == update.email)
        {
            return Err(StoreError::Conflict("email".into()));
        }
        Ok(t.users.get_mut(&user_id).map(|u| {
            u.email = update.email.clone();
            u.profile = UserProfile {
                email: update.email.clone(),
                name: Some(update.name.clone()),
                user_image_uri: Some(update.user_image_uri.clone()),
                company_name: Some(update.company_name.clone()),
                company_image_uri: Some(update.company_image_uri.clone()),
            };
            u.profile.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Gender;

    fn employee(id: &str, name: &str, gender: Gender, dept: DepartmentId) -> Employee {
        Employee {
            identity_number: id.to_string(),
            name: name.to_string(),
            gender,
            department_id: dept,
            employee_image_uri: "https://cdn.example.com/e.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_department_names_are_global() {
        let store = MemoryStore::new();
        store.insert_department(1, "Engineering").await.unwrap();
        let err = store.insert_department(2, "Engineering").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_department_delete_is_conditional() {
        let store = MemoryStore::new();
        let dept = store.insert_department(1, "Engineering").await.unwrap();
        store
            .insert_employee(1, &employee("XX12345", "Jane Doe", Gender::Female, dept.id))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(store.delete_department(1, dept.id).await.unwrap(), 0);
        assert_eq!(store.count_employees(dept.id).await.unwrap(), 1);

        store.delete_employee(1, "XX12345").await.unwrap();
        assert_eq!(store.delete_department(2, dept.id).await.unwrap(), 0);
        assert_eq!(store.delete_department(1, dept.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_employee_insert_requires_owned_department() {
        let store = MemoryStore::new();
        let dept = store.insert_department(1, "Engineering").await.unwrap();
        let e = employee("XX12345", "Jane Doe", Gender::Female, dept.id);

        assert!(store.insert_employee(2, &e).await.unwrap().is_none());
        assert!(store.insert_employee(1, &e).await.unwrap().is_some());
        assert!(matches!(
            store.insert_employee(1, &e).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_employee_list_filters_and_pages() {
        let store = MemoryStore::new();
        let eng = store.insert_department(1, "Engineering").await.unwrap();
        let ops = store.insert_department(1, "Operations").await.unwrap();
        let other = store.insert_department(2, "Elsewhere").await.unwrap();
        for (id, name, gender, dept) in [
            ("AB001", "Alice Smith", Gender::Female, eng.id),
            ("AB002", "Bob Stone", Gender::Male, eng.id),
            ("CD003", "Carol Smithers", Gender::Female, ops.id),
            ("AB004", "Dan Brown", Gender::Male, other.id),
        ] {
            let owner = if dept == other.id { 2 } else { 1 };
            store
                .insert_employee(owner, &employee(id, name, gender, dept))
                .await
                .unwrap()
                .unwrap();
        }

        let all = store
            .list_employees(1, &EmployeeFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let smiths = store
            .list_employees(
                1,
                &EmployeeFilter {
                    name: Some("SMITH".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(smiths.len(), 2);

        let ab_women = store
            .list_employees(
                1,
                &EmployeeFilter {
                    identity_number: Some("AB".into()),
                    gender: Some(Gender::Female),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(ab_women.len(), 1);
        assert_eq!(ab_women[0].identity_number, "AB001");

        let second_page = store
            .list_employees(
                1,
                &EmployeeFilter {
                    page: Page {
                        limit: 2,
                        offset: 2,
                    },
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].identity_number, "CD003");
    }

    #[tokio::test]
    async fn test_profile_email_conflict_excludes_self() {
        let store = MemoryStore::new();
        let a = store.insert_user("a@acme.io", "hash-a").await.unwrap();
        store.insert_user("b@acme.io", "hash-b").await.unwrap();

        let mut update = ProfileUpdate {
            email: "a@acme.io".into(),
            name: "Ada Owner".into(),
            user_image_uri: "https://cdn.acme.io/a.png".into(),
            company_name: "Acme".into(),
            company_image_uri: "https://cdn.acme.io/logo.png".into(),
        };
        assert!(
            store
                .update_profile(a.principal_id, &update)
                .await
                .unwrap()
                .is_some()
        );

        update.email = "b@acme.io".into();
        assert!(matches!(
            store.update_profile(a.principal_id, &update).await,
            Err(StoreError::Conflict(_))
        ));
    }
}
