// Implementación Diesel del contrato `EntityStore`/`Collection` de recon.
// Cada colección es una tabla; las filas guardan los ids en forma externa
// (Text) y las listas de relación como arreglos JSON serializados. La
// conversión fila <-> entidad revalida los datos al salir: una fila corrupta
// se reporta como `Unavailable`.
use crate::schema;
use crate::schema::clients::dsl as clients_dsl;
use crate::schema::companies::dsl as companies_dsl;
use crate::schema::contracts::dsl as contracts_dsl;
use crate::schema::departments::dsl as departments_dsl;
use crate::schema::employees::dsl as employees_dsl;
use crate::schema::projects::dsl as projects_dsl;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use gestion_domain::{Client, ClientId, Company, CompanyId, Contract, ContractId, Department, DepartmentId,
                     DomainError, Employee, EmployeeId, Project, ProjectId, Result, TypedId};
use recon::store::{Collection, EntityStore};
use std::sync::Arc;
use uuid::Uuid;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

#[cfg(all(feature = "pg", not(test)))]
type DbConn = diesel::PgConnection;
#[cfg(any(test, not(feature = "pg")))]
type DbConn = diesel::SqliteConnection;
type DbPool = Pool<ConnectionManager<DbConn>>;

/// Store Diesel que implementa `EntityStore`.
pub struct DieselEntityStore {
  pool: Arc<DbPool>,
}

impl DieselEntityStore {
  /// Crea el store con un pool de conexiones y aplica las migraciones
  /// embebidas.
  pub fn new(database_url: &str) -> Result<Self> {
    let manager = ConnectionManager::<DbConn>::new(database_url);
    let pool = Pool::builder().max_size(4)
                              .build(manager)
                              .map_err(|e| DomainError::Unavailable(format!("pool: {}", e)))?;
    let store = DieselEntityStore { pool: Arc::new(pool) };
    let mut conn = store.conn()?;
    #[cfg(any(test, not(feature = "pg")))]
    {
      let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut conn);
      let _ = diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut conn);
    }
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Unavailable(format!("migraciones: {}", e)))?;
    log::info!("store inicializado en {}", database_url);
    Ok(store)
  }

  fn conn_raw(&self) -> std::result::Result<PooledConnection<ConnectionManager<DbConn>>, r2d2::Error> {
    self.pool.get()
  }

  fn conn(&self) -> Result<PooledConnection<ConnectionManager<DbConn>>> {
    self.conn_raw().map_err(|e| DomainError::Unavailable(format!("pool: {}", e)))
  }
}

/// Construye el store leyendo `GESTION_DB_URL` (o `DATABASE_URL`) del
/// entorno; si ninguna está definida usa el archivo `gestion.db`.
pub fn new_from_env() -> Result<DieselEntityStore> {
  let _ = dotenvy::dotenv();
  let url = std::env::var("GESTION_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                           .unwrap_or_else(|_| "gestion.db".to_string());
  DieselEntityStore::new(&url)
}

fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> Result<T> {
  res.map_err(|e| match e {
       DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
         DomainError::Conflict(format!("violación de unicidad: {}", info.message()))
       }
       other => DomainError::Unavailable(format!("db: {}", other)),
     })
}

// ----- conversión de ids y listas en la frontera -----

fn parse_id<I: TypedId>(raw: &str) -> Result<I> {
  Uuid::parse_str(raw).map(I::from_raw)
                      .map_err(|_| DomainError::Unavailable(format!("fila corrupta: id inválido {}", raw)))
}

fn encode_ids<I: TypedId>(ids: &[I]) -> Result<String> {
  serde_json::to_string(&ids.iter().map(TypedId::external).collect::<Vec<String>>())
    .map_err(|e| DomainError::Unavailable(format!("serializando ids: {}", e)))
}

fn decode_ids<I: TypedId>(raw: &str) -> Result<Vec<I>> {
  let externos: Vec<String> =
    serde_json::from_str(raw).map_err(|e| DomainError::Unavailable(format!("fila corrupta: lista de ids: {}", e)))?;
  externos.iter().map(|s| parse_id(s)).collect()
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
  raw.parse::<NaiveDate>()
     .map_err(|_| DomainError::Unavailable(format!("fila corrupta: fecha inválida {}", raw)))
}

// ----- filas Diesel por tabla -----

#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = schema::companies)]
struct CompanyRow {
  id: String,
  name: String,
  tax_id: String,
  legal_name: String,
  trade_name: String,
  contact_email: String,
  department_ids: String,
}

impl CompanyRow {
  fn from_entity(entity: &Company) -> Result<Self> {
    Ok(Self { id: entity.id().external(),
              name: entity.name().to_string(),
              tax_id: entity.tax_id().to_string(),
              legal_name: entity.legal_name().to_string(),
              trade_name: entity.trade_name().to_string(),
              contact_email: entity.contact_email().to_string(),
              department_ids: encode_ids(entity.department_ids())? })
  }

  fn into_entity(self) -> Result<Company> {
    Company::from_parts(parse_id(&self.id)?,
                        &self.name,
                        &self.tax_id,
                        &self.legal_name,
                        &self.trade_name,
                        &self.contact_email,
                        decode_ids(&self.department_ids)?)
  }
}

#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = schema::departments)]
struct DepartmentRow {
  id: String,
  name: String,
  budget: f64,
  status: String,
  company_id: String,
  employee_ids: String,
}

impl DepartmentRow {
  fn from_entity(entity: &Department) -> Result<Self> {
    Ok(Self { id: entity.id().external(),
              name: entity.name().to_string(),
              budget: entity.budget(),
              status: entity.status().to_string(),
              company_id: entity.company_id().external(),
              employee_ids: encode_ids(entity.employee_ids())? })
  }

  fn into_entity(self) -> Result<Department> {
    Department::from_parts(parse_id(&self.id)?,
                           &self.name,
                           self.budget,
                           &self.status,
                           parse_id(&self.company_id)?,
                           decode_ids(&self.employee_ids)?)
  }
}

#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = schema::employees)]
struct EmployeeRow {
  id: String,
  email: String,
  name: String,
  role: String,
  salary: f64,
  phone: String,
  department_id: String,
  project_ids: String,
}

impl EmployeeRow {
  fn from_entity(entity: &Employee) -> Result<Self> {
    Ok(Self { id: entity.id().external(),
              email: entity.email().to_string(),
              name: entity.name().to_string(),
              role: entity.role().to_string(),
              salary: entity.salary(),
              phone: entity.phone().to_string(),
              department_id: entity.department_id().external(),
              project_ids: encode_ids(entity.project_ids())? })
  }

  fn into_entity(self) -> Result<Employee> {
    Employee::from_parts(parse_id(&self.id)?,
                         &self.email,
                         &self.name,
                         &self.role,
                         self.salary,
                         &self.phone,
                         parse_id(&self.department_id)?,
                         decode_ids(&self.project_ids)?)
  }
}

#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = schema::clients)]
struct ClientRow {
  id: String,
  name: String,
  tax_id: String,
  legal_name: String,
  trade_name: String,
  contact_email: String,
  project_ids: String,
}

impl ClientRow {
  fn from_entity(entity: &Client) -> Result<Self> {
    Ok(Self { id: entity.id().external(),
              name: entity.name().to_string(),
              tax_id: entity.tax_id().to_string(),
              legal_name: entity.legal_name().to_string(),
              trade_name: entity.trade_name().to_string(),
              contact_email: entity.contact_email().to_string(),
              project_ids: encode_ids(entity.project_ids())? })
  }

  fn into_entity(self) -> Result<Client> {
    Client::from_parts(parse_id(&self.id)?,
                       &self.name,
                       &self.tax_id,
                       &self.legal_name,
                       &self.trade_name,
                       &self.contact_email,
                       decode_ids(&self.project_ids)?)
  }
}

// treat_none_as_null: limpiar el contrato debe escribir NULL, no omitir la
// columna.
#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = schema::projects, treat_none_as_null = true)]
struct ProjectRow {
  id: String,
  name: String,
  description: String,
  employee_ids: String,
  contract_id: Option<String>,
  client_id: String,
}

impl ProjectRow {
  fn from_entity(entity: &Project) -> Result<Self> {
    Ok(Self { id: entity.id().external(),
              name: entity.name().to_string(),
              description: entity.description().to_string(),
              employee_ids: encode_ids(entity.employee_ids())?,
              contract_id: entity.contract_id().map(|c| c.external()),
              client_id: entity.client_id().external() })
  }

  fn into_entity(self) -> Result<Project> {
    let contract_id = match self.contract_id.as_deref() {
      Some(raw) => Some(parse_id(raw)?),
      None => None,
    };
    Project::from_parts(parse_id(&self.id)?,
                        &self.name,
                        &self.description,
                        decode_ids(&self.employee_ids)?,
                        contract_id,
                        parse_id(&self.client_id)?)
  }
}

#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = schema::contracts, treat_none_as_null = true)]
struct ContractRow {
  id: String,
  terms: String,
  status: String,
  valid_from: String,
  valid_until: Option<String>,
  max_quantity: i32,
  total_value: f64,
  currency: String,
  project_id: String,
}

impl ContractRow {
  fn from_entity(entity: &Contract) -> Result<Self> {
    Ok(Self { id: entity.id().external(),
              terms: entity.terms().to_string(),
              status: entity.status().to_string(),
              valid_from: entity.valid_from().to_string(),
              valid_until: entity.valid_until().map(|d| d.to_string()),
              max_quantity: entity.max_quantity(),
              total_value: entity.total_value(),
              currency: entity.currency().to_string(),
              project_id: entity.project_id().external() })
  }

  fn into_entity(self) -> Result<Contract> {
    let valid_until = match self.valid_until.as_deref() {
      Some(raw) => Some(parse_date(raw)?),
      None => None,
    };
    Contract::from_parts(parse_id(&self.id)?,
                         &self.terms,
                         &self.status,
                         parse_date(&self.valid_from)?,
                         valid_until,
                         self.max_quantity,
                         self.total_value,
                         &self.currency,
                         parse_id(&self.project_id)?)
  }
}

// ----- colecciones -----

impl Collection<Company> for DieselEntityStore {
  fn insert(&self, entity: Company) -> Result<()> {
    let mut conn = self.conn()?;
    let row = CompanyRow::from_entity(&entity)?;
    map_db_err(diesel::insert_into(companies_dsl::companies).values(&row).execute(&mut conn))?;
    Ok(())
  }

  fn find(&self, lookup: &CompanyId) -> Result<Option<Company>> {
    let mut conn = self.conn()?;
    let row = map_db_err(companies_dsl::companies.filter(companies_dsl::id.eq(lookup.external()))
                                                 .first::<CompanyRow>(&mut conn)
                                                 .optional())?;
    row.map(CompanyRow::into_entity).transpose()
  }

  fn save(&self, entity: Company) -> Result<Company> {
    let mut conn = self.conn()?;
    let row = CompanyRow::from_entity(&entity)?;
    let n = map_db_err(diesel::update(companies_dsl::companies.filter(companies_dsl::id.eq(&row.id))).set(&row)
                                                                                                     .execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en companies", entity.id())));
    }
    Ok(entity)
  }

  fn delete(&self, lookup: &CompanyId) -> Result<()> {
    let mut conn = self.conn()?;
    let n = map_db_err(diesel::delete(companies_dsl::companies.filter(companies_dsl::id.eq(lookup.external()))).execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en companies", lookup)));
    }
    Ok(())
  }

  fn list(&self, skip: i64, limit: i64) -> Result<Vec<Company>> {
    let mut conn = self.conn()?;
    let rows = map_db_err(companies_dsl::companies.order(companies_dsl::id.asc())
                                                  .offset(skip.max(0))
                                                  .limit(limit)
                                                  .load::<CompanyRow>(&mut conn))?;
    rows.into_iter().map(CompanyRow::into_entity).collect()
  }

  fn count(&self) -> Result<i64> {
    let mut conn = self.conn()?;
    map_db_err(companies_dsl::companies.count().get_result(&mut conn))
  }
}

impl Collection<Department> for DieselEntityStore {
  fn insert(&self, entity: Department) -> Result<()> {
    let mut conn = self.conn()?;
    let row = DepartmentRow::from_entity(&entity)?;
    map_db_err(diesel::insert_into(departments_dsl::departments).values(&row).execute(&mut conn))?;
    Ok(())
  }

  fn find(&self, lookup: &DepartmentId) -> Result<Option<Department>> {
    let mut conn = self.conn()?;
    let row = map_db_err(departments_dsl::departments.filter(departments_dsl::id.eq(lookup.external()))
                                                     .first::<DepartmentRow>(&mut conn)
                                                     .optional())?;
    row.map(DepartmentRow::into_entity).transpose()
  }

  fn save(&self, entity: Department) -> Result<Department> {
    let mut conn = self.conn()?;
    let row = DepartmentRow::from_entity(&entity)?;
    let n = map_db_err(diesel::update(departments_dsl::departments.filter(departments_dsl::id.eq(&row.id))).set(&row)
                                                                                                           .execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en departments", entity.id())));
    }
    Ok(entity)
  }

  fn delete(&self, lookup: &DepartmentId) -> Result<()> {
    let mut conn = self.conn()?;
    let n =
      map_db_err(diesel::delete(departments_dsl::departments.filter(departments_dsl::id.eq(lookup.external()))).execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en departments", lookup)));
    }
    Ok(())
  }

  fn list(&self, skip: i64, limit: i64) -> Result<Vec<Department>> {
    let mut conn = self.conn()?;
    let rows = map_db_err(departments_dsl::departments.order(departments_dsl::id.asc())
                                                      .offset(skip.max(0))
                                                      .limit(limit)
                                                      .load::<DepartmentRow>(&mut conn))?;
    rows.into_iter().map(DepartmentRow::into_entity).collect()
  }

  fn count(&self) -> Result<i64> {
    let mut conn = self.conn()?;
    map_db_err(departments_dsl::departments.count().get_result(&mut conn))
  }
}

impl Collection<Employee> for DieselEntityStore {
  fn insert(&self, entity: Employee) -> Result<()> {
    let mut conn = self.conn()?;
    let row = EmployeeRow::from_entity(&entity)?;
    map_db_err(diesel::insert_into(employees_dsl::employees).values(&row).execute(&mut conn))?;
    Ok(())
  }

  fn find(&self, lookup: &EmployeeId) -> Result<Option<Employee>> {
    let mut conn = self.conn()?;
    let row = map_db_err(employees_dsl::employees.filter(employees_dsl::id.eq(lookup.external()))
                                                 .first::<EmployeeRow>(&mut conn)
                                                 .optional())?;
    row.map(EmployeeRow::into_entity).transpose()
  }

  fn save(&self, entity: Employee) -> Result<Employee> {
    let mut conn = self.conn()?;
    let row = EmployeeRow::from_entity(&entity)?;
    let n = map_db_err(diesel::update(employees_dsl::employees.filter(employees_dsl::id.eq(&row.id))).set(&row)
                                                                                                     .execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en employees", entity.id())));
    }
    Ok(entity)
  }

  fn delete(&self, lookup: &EmployeeId) -> Result<()> {
    let mut conn = self.conn()?;
    let n = map_db_err(diesel::delete(employees_dsl::employees.filter(employees_dsl::id.eq(lookup.external()))).execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en employees", lookup)));
    }
    Ok(())
  }

  fn list(&self, skip: i64, limit: i64) -> Result<Vec<Employee>> {
    let mut conn = self.conn()?;
    let rows = map_db_err(employees_dsl::employees.order(employees_dsl::id.asc())
                                                  .offset(skip.max(0))
                                                  .limit(limit)
                                                  .load::<EmployeeRow>(&mut conn))?;
    rows.into_iter().map(EmployeeRow::into_entity).collect()
  }

  fn count(&self) -> Result<i64> {
    let mut conn = self.conn()?;
    map_db_err(employees_dsl::employees.count().get_result(&mut conn))
  }
}

impl Collection<Client> for DieselEntityStore {
  fn insert(&self, entity: Client) -> Result<()> {
    let mut conn = self.conn()?;
    let row = ClientRow::from_entity(&entity)?;
    map_db_err(diesel::insert_into(clients_dsl::clients).values(&row).execute(&mut conn))?;
    Ok(())
  }

  fn find(&self, lookup: &ClientId) -> Result<Option<Client>> {
    let mut conn = self.conn()?;
    let row = map_db_err(clients_dsl::clients.filter(clients_dsl::id.eq(lookup.external()))
                                             .first::<ClientRow>(&mut conn)
                                             .optional())?;
    row.map(ClientRow::into_entity).transpose()
  }

  fn save(&self, entity: Client) -> Result<Client> {
    let mut conn = self.conn()?;
    let row = ClientRow::from_entity(&entity)?;
    let n = map_db_err(diesel::update(clients_dsl::clients.filter(clients_dsl::id.eq(&row.id))).set(&row)
                                                                                               .execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en clients", entity.id())));
    }
    Ok(entity)
  }

  fn delete(&self, lookup: &ClientId) -> Result<()> {
    let mut conn = self.conn()?;
    let n = map_db_err(diesel::delete(clients_dsl::clients.filter(clients_dsl::id.eq(lookup.external()))).execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en clients", lookup)));
    }
    Ok(())
  }

  fn list(&self, skip: i64, limit: i64) -> Result<Vec<Client>> {
    let mut conn = self.conn()?;
    let rows = map_db_err(clients_dsl::clients.order(clients_dsl::id.asc())
                                              .offset(skip.max(0))
                                              .limit(limit)
                                              .load::<ClientRow>(&mut conn))?;
    rows.into_iter().map(ClientRow::into_entity).collect()
  }

  fn count(&self) -> Result<i64> {
    let mut conn = self.conn()?;
    map_db_err(clients_dsl::clients.count().get_result(&mut conn))
  }
}

impl Collection<Project> for DieselEntityStore {
  fn insert(&self, entity: Project) -> Result<()> {
    let mut conn = self.conn()?;
    let row = ProjectRow::from_entity(&entity)?;
    map_db_err(diesel::insert_into(projects_dsl::projects).values(&row).execute(&mut conn))?;
    Ok(())
  }

  fn find(&self, lookup: &ProjectId) -> Result<Option<Project>> {
    let mut conn = self.conn()?;
    let row = map_db_err(projects_dsl::projects.filter(projects_dsl::id.eq(lookup.external()))
                                               .first::<ProjectRow>(&mut conn)
                                               .optional())?;
    row.map(ProjectRow::into_entity).transpose()
  }

  fn save(&self, entity: Project) -> Result<Project> {
    let mut conn = self.conn()?;
    let row = ProjectRow::from_entity(&entity)?;
    let n = map_db_err(diesel::update(projects_dsl::projects.filter(projects_dsl::id.eq(&row.id))).set(&row)
                                                                                                  .execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en projects", entity.id())));
    }
    Ok(entity)
  }

  fn delete(&self, lookup: &ProjectId) -> Result<()> {
    let mut conn = self.conn()?;
    let n = map_db_err(diesel::delete(projects_dsl::projects.filter(projects_dsl::id.eq(lookup.external()))).execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en projects", lookup)));
    }
    Ok(())
  }

  fn list(&self, skip: i64, limit: i64) -> Result<Vec<Project>> {
    let mut conn = self.conn()?;
    let rows = map_db_err(projects_dsl::projects.order(projects_dsl::id.asc())
                                                .offset(skip.max(0))
                                                .limit(limit)
                                                .load::<ProjectRow>(&mut conn))?;
    rows.into_iter().map(ProjectRow::into_entity).collect()
  }

  fn count(&self) -> Result<i64> {
    let mut conn = self.conn()?;
    map_db_err(projects_dsl::projects.count().get_result(&mut conn))
  }
}

impl Collection<Contract> for DieselEntityStore {
  fn insert(&self, entity: Contract) -> Result<()> {
    let mut conn = self.conn()?;
    let row = ContractRow::from_entity(&entity)?;
    map_db_err(diesel::insert_into(contracts_dsl::contracts).values(&row).execute(&mut conn))?;
    Ok(())
  }

  fn find(&self, lookup: &ContractId) -> Result<Option<Contract>> {
    let mut conn = self.conn()?;
    let row = map_db_err(contracts_dsl::contracts.filter(contracts_dsl::id.eq(lookup.external()))
                                                 .first::<ContractRow>(&mut conn)
                                                 .optional())?;
    row.map(ContractRow::into_entity).transpose()
  }

  fn save(&self, entity: Contract) -> Result<Contract> {
    let mut conn = self.conn()?;
    let row = ContractRow::from_entity(&entity)?;
    let n = map_db_err(diesel::update(contracts_dsl::contracts.filter(contracts_dsl::id.eq(&row.id))).set(&row)
                                                                                                     .execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en contracts", entity.id())));
    }
    Ok(entity)
  }

  fn delete(&self, lookup: &ContractId) -> Result<()> {
    let mut conn = self.conn()?;
    let n = map_db_err(diesel::delete(contracts_dsl::contracts.filter(contracts_dsl::id.eq(lookup.external()))).execute(&mut conn))?;
    if n == 0 {
      return Err(DomainError::NotFound(format!("Fila {} inexistente en contracts", lookup)));
    }
    Ok(())
  }

  fn list(&self, skip: i64, limit: i64) -> Result<Vec<Contract>> {
    let mut conn = self.conn()?;
    let rows = map_db_err(contracts_dsl::contracts.order(contracts_dsl::id.asc())
                                                  .offset(skip.max(0))
                                                  .limit(limit)
                                                  .load::<ContractRow>(&mut conn))?;
    rows.into_iter().map(ContractRow::into_entity).collect()
  }

  fn count(&self) -> Result<i64> {
    let mut conn = self.conn()?;
    map_db_err(contracts_dsl::contracts.count().get_result(&mut conn))
  }
}

impl EntityStore for DieselEntityStore {
  fn companies(&self) -> &dyn Collection<Company> {
    self
  }

  fn departments(&self) -> &dyn Collection<Department> {
    self
  }

  fn employees(&self) -> &dyn Collection<Employee> {
    self
  }

  fn clients(&self) -> &dyn Collection<Client> {
    self
  }

  fn projects(&self) -> &dyn Collection<Project> {
    self
  }

  fn contracts(&self) -> &dyn Collection<Contract> {
    self
  }
}
