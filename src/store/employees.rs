//! Employee records.

use tracing::info;

use crate::error::{HrError, HrResult};
use crate::models::{Employee, EmployeeInput};

use super::{HrStore, parse_amount};

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    emp_id: i64,
    name: String,
    department: String,
    designation: String,
    basic_salary: String,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = HrError;

    fn try_from(row: EmployeeRow) -> HrResult<Self> {
        Ok(Employee {
            emp_id: row.emp_id,
            name: row.name,
            department: row.department,
            designation: row.designation,
            basic_salary: parse_amount("basic_salary", &row.basic_salary)?,
        })
    }
}

const EMPLOYEE_COLUMNS: &str = "emp_id, name, department, designation, basic_salary";

impl HrStore {
    /// Adds an employee.
    pub async fn create_employee(&self, input: EmployeeInput) -> HrResult<Employee> {
        let input = input.validated()?;
        let result = sqlx::query(
            "INSERT INTO employees (name, department, designation, basic_salary) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&input.name)
        .bind(&input.department)
        .bind(&input.designation)
        .bind(input.basic_salary.to_string())
        .execute(self.pool())
        .await?;

        let employee = Employee {
            emp_id: result.last_insert_rowid(),
            name: input.name,
            department: input.department,
            designation: input.designation,
            basic_salary: input.basic_salary,
        };
        info!(emp_id = employee.emp_id, name = %employee.name, "Created employee");
        Ok(employee)
    }

    /// Fetches an employee by id.
    pub async fn get_employee(&self, emp_id: i64) -> HrResult<Employee> {
        sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {} FROM employees WHERE emp_id = ?1",
            EMPLOYEE_COLUMNS
        ))
        .bind(emp_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| HrError::not_found("employee", emp_id))?
        .try_into()
    }

    /// Lists every employee ordered by id.
    pub async fn list_employees(&self) -> HrResult<Vec<Employee>> {
        sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {} FROM employees ORDER BY emp_id",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(Employee::try_from)
        .collect()
    }

    /// Replaces an employee's editable fields.
    pub async fn update_employee(&self, emp_id: i64, input: EmployeeInput) -> HrResult<Employee> {
        let input = input.validated()?;
        let result = sqlx::query(
            "UPDATE employees SET name = ?1, department = ?2, designation = ?3, basic_salary = ?4 WHERE emp_id = ?5",
        )
        .bind(&input.name)
        .bind(&input.department)
        .bind(&input.designation)
        .bind(input.basic_salary.to_string())
        .bind(emp_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(HrError::not_found("employee", emp_id));
        }
        info!(emp_id, "Updated employee");
        Ok(Employee {
            emp_id,
            name: input.name,
            department: input.department,
            designation: input.designation,
            basic_salary: input.basic_salary,
        })
    }

    /// Deletes an employee with all their records.
    ///
    /// Performance, leave, attendance and payroll rows are removed and any
    /// user account linked to the employee is unlinked, in one transaction.
    pub async fn delete_employee(&self, emp_id: i64) -> HrResult<()> {
        let mut tx = self.pool().begin().await?;

        for table in ["performance", "leaves", "attendance", "payroll"] {
            sqlx::query(&format!("DELETE FROM {} WHERE emp_id = ?1", table))
                .bind(emp_id)
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("UPDATE users SET emp_id = NULL WHERE emp_id = ?1")
            .bind(emp_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM employees WHERE emp_id = ?1")
            .bind(emp_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(HrError::not_found("employee", emp_id));
        }
        tx.commit().await?;
        info!(emp_id, "Deleted employee and related records");
        Ok(())
    }
}
