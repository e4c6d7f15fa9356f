// Archivo: plan.rs
// Propósito: plan de escritura explícito del reconciliador. Cada operación
// de alto nivel primero valida y arma la secuencia completa de escrituras
// (este plan) y recién después la ejecuta contra el almacenamiento, de modo
// que un fallo de validación nunca deja escrituras parciales. La ejecución
// en sí no es transaccional: un corte a mitad de plan puede aplicar un
// prefijo (limitación aceptada, no hay write-ahead log).
use crate::store::EntityStore;
use gestion_domain::{Client, Company, Contract, Department, Employee, Project, Result};
use gestion_domain::{ClientId, CompanyId, ContractId, DepartmentId, EmployeeId, ProjectId};

/// Una escritura individual contra el almacenamiento.
#[derive(Debug, Clone)]
pub enum WriteOp {
    InsertCompany(Company),
    InsertDepartment(Department),
    InsertEmployee(Employee),
    InsertClient(Client),
    InsertProject(Project),
    InsertContract(Contract),
    SaveCompany(Company),
    SaveDepartment(Department),
    SaveEmployee(Employee),
    SaveClient(Client),
    SaveProject(Project),
    SaveContract(Contract),
    DeleteCompany(CompanyId),
    DeleteDepartment(DepartmentId),
    DeleteEmployee(EmployeeId),
    DeleteClient(ClientId),
    DeleteProject(ProjectId),
    DeleteContract(ContractId),
}

/// Secuencia ordenada de escrituras, construida completa antes de tocar el
/// almacenamiento.
#[derive(Debug, Default)]
pub struct WritePlan {
    ops: Vec<WriteOp>,
}

impl WritePlan {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Aplica las escrituras en orden. Los errores del almacenamiento se
    /// propagan sin reintento.
    pub fn execute(self, store: &dyn EntityStore) -> Result<()> {
        log::debug!("ejecutando plan de {} escrituras", self.ops.len());
        for op in self.ops {
            match op {
                WriteOp::InsertCompany(e) => store.companies().insert(e)?,
                WriteOp::InsertDepartment(e) => store.departments().insert(e)?,
                WriteOp::InsertEmployee(e) => store.employees().insert(e)?,
                WriteOp::InsertClient(e) => store.clients().insert(e)?,
                WriteOp::InsertProject(e) => store.projects().insert(e)?,
                WriteOp::InsertContract(e) => store.contracts().insert(e)?,
                WriteOp::SaveCompany(e) => {
                    store.companies().save(e)?;
                }
                WriteOp::SaveDepartment(e) => {
                    store.departments().save(e)?;
                }
                WriteOp::SaveEmployee(e) => {
                    store.employees().save(e)?;
                }
                WriteOp::SaveClient(e) => {
                    store.clients().save(e)?;
                }
                WriteOp::SaveProject(e) => {
                    store.projects().save(e)?;
                }
                WriteOp::SaveContract(e) => {
                    store.contracts().save(e)?;
                }
                WriteOp::DeleteCompany(id) => store.companies().delete(&id)?,
                WriteOp::DeleteDepartment(id) => store.departments().delete(&id)?,
                WriteOp::DeleteEmployee(id) => store.employees().delete(&id)?,
                WriteOp::DeleteClient(id) => store.clients().delete(&id)?,
                WriteOp::DeleteProject(id) => store.projects().delete(&id)?,
                WriteOp::DeleteContract(id) => store.contracts().delete(&id)?,
            }
        }
        Ok(())
    }
}
