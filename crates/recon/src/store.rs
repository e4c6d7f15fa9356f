// Archivo: store.rs
// Propósito: definir el contrato de almacenamiento que consume el núcleo:
// `StoredEntity` (entidad con id tipado y nombre de colección),
// `Collection<E>` (operaciones por colección) y `EntityStore` (acceso
// tipado a las seis colecciones). Las implementaciones concretas viven en
// `stubs` (memoria) y en el crate de persistencia.
use gestion_domain::{Client, Company, Contract, Department, Employee, Project, Result, TypedId};
use gestion_domain::{ClientId, CompanyId, ContractId, DepartmentId, EmployeeId, ProjectId};

/// Entidad almacenable: asocia el tipo con su id tipado, el nombre de su
/// colección y una etiqueta legible (usada por el filtro por nombre).
pub trait StoredEntity: Clone + Send + Sync + 'static {
    type Id: TypedId;

    /// Nombre de la colección en el almacenamiento.
    const COLLECTION: &'static str;

    fn id(&self) -> Self::Id;

    /// Texto representativo de la entidad para búsquedas por nombre.
    fn label(&self) -> &str;
}

impl StoredEntity for Company {
    type Id = CompanyId;

    const COLLECTION: &'static str = "companies";

    fn id(&self) -> CompanyId {
        self.id()
    }

    fn label(&self) -> &str {
        self.name()
    }
}

impl StoredEntity for Department {
    type Id = DepartmentId;

    const COLLECTION: &'static str = "departments";

    fn id(&self) -> DepartmentId {
        self.id()
    }

    fn label(&self) -> &str {
        self.name()
    }
}

impl StoredEntity for Employee {
    type Id = EmployeeId;

    const COLLECTION: &'static str = "employees";

    fn id(&self) -> EmployeeId {
        self.id()
    }

    fn label(&self) -> &str {
        self.name()
    }
}

impl StoredEntity for Client {
    type Id = ClientId;

    const COLLECTION: &'static str = "clients";

    fn id(&self) -> ClientId {
        self.id()
    }

    fn label(&self) -> &str {
        self.name()
    }
}

impl StoredEntity for Project {
    type Id = ProjectId;

    const COLLECTION: &'static str = "projects";

    fn id(&self) -> ProjectId {
        self.id()
    }

    fn label(&self) -> &str {
        self.name()
    }
}

impl StoredEntity for Contract {
    type Id = ContractId;

    const COLLECTION: &'static str = "contracts";

    fn id(&self) -> ContractId {
        self.id()
    }

    // Los contratos no tienen nombre propio; las condiciones hacen de texto
    // representativo.
    fn label(&self) -> &str {
        self.terms()
    }
}

/// Operaciones de una colección tipada. Corresponden a
/// `findById` / `insert` / `updateById` / `deleteById` / `findMany` del
/// contrato con el colaborador de almacenamiento.
pub trait Collection<E: StoredEntity>: Send + Sync {
    /// Inserta una entidad nueva. `Conflict` si el id ya existe.
    fn insert(&self, entity: E) -> Result<()>;

    /// Busca por id. `Ok(None)` si no existe.
    fn find(&self, id: &E::Id) -> Result<Option<E>>;

    /// Reemplaza la fila con el mismo id. `NotFound` si no existe.
    fn save(&self, entity: E) -> Result<E>;

    /// Elimina por id. `NotFound` si no existe.
    fn delete(&self, id: &E::Id) -> Result<()>;

    /// Lista ordenada por id ascendente con desplazamiento y límite.
    fn list(&self, skip: i64, limit: i64) -> Result<Vec<E>>;

    /// Cantidad de filas de la colección.
    fn count(&self) -> Result<i64>;

    /// Todas las filas ordenadas por id ascendente.
    fn all(&self) -> Result<Vec<E>> {
        self.list(0, i64::MAX)
    }

    /// Filtro por nombre (subcadena, sin distinguir mayúsculas) sobre la
    /// etiqueta de la entidad.
    fn find_by_name(&self, needle: &str) -> Result<Vec<E>> {
        let needle = needle.to_lowercase();
        Ok(self.all()?
               .into_iter()
               .filter(|e| e.label().to_lowercase().contains(&needle))
               .collect())
    }
}

/// Acceso tipado a las seis colecciones del dominio. Se pasa explícitamente
/// a reconciliador y ensamblador; no hay handles globales.
pub trait EntityStore: Send + Sync {
    fn companies(&self) -> &dyn Collection<Company>;
    fn departments(&self) -> &dyn Collection<Department>;
    fn employees(&self) -> &dyn Collection<Employee>;
    fn clients(&self) -> &dyn Collection<Client>;
    fn projects(&self) -> &dyn Collection<Project>;
    fn contracts(&self) -> &dyn Collection<Contract>;
}
