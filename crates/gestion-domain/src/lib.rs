mod client;
mod company;
mod contract;
mod department;
mod employee;
mod errors;
mod ids;
mod project;
mod validate;

pub use client::Client;
pub use company::Company;
pub use contract::{Contract, MONEDA_POR_DEFECTO};
pub use department::Department;
pub use employee::Employee;
pub use errors::{DomainError, Result};
pub use ids::{ClientId, CompanyId, ContractId, DepartmentId, EmployeeId, ProjectId, TypedId};
pub use project::Project;
