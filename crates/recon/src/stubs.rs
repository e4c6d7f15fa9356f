// Archivo: stubs.rs
// Propósito: implementación en memoria del contrato de almacenamiento, para
// pruebas y wiring rápido. No es durable. Cada colección guarda sus filas en
// un `BTreeMap` con clave uuid, lo que da el orden estable por id ascendente
// que exige el contrato de listado.
use crate::store::{Collection, EntityStore, StoredEntity};
use gestion_domain::{Client, Company, Contract, Department, DomainError, Employee, Project, Result, TypedId};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Colección en memoria genérica sobre cualquier `StoredEntity`.
pub struct MemCollection<E: StoredEntity> {
    rows: Mutex<BTreeMap<Uuid, E>>,
}

impl<E: StoredEntity> MemCollection<E> {
    pub fn new() -> Self {
        Self { rows: Mutex::new(BTreeMap::new()) }
    }

    /// Helper para mapear `Mutex::lock()` en un `Result` con
    /// `DomainError::Unavailable`.
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<Uuid, E>>> {
        self.rows
            .lock()
            .map_err(|e| DomainError::Unavailable(format!("mutex de {} envenenado: {:?}", E::COLLECTION, e)))
    }
}

impl<E: StoredEntity> Default for MemCollection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: StoredEntity> Collection<E> for MemCollection<E> {
    fn insert(&self, entity: E) -> Result<()> {
        let mut rows = self.lock()?;
        let key = entity.id().raw();
        if rows.contains_key(&key) {
            return Err(DomainError::Conflict(format!("Ya existe una fila {} en {}", entity.id(), E::COLLECTION)));
        }
        rows.insert(key, entity);
        Ok(())
    }

    fn find(&self, id: &E::Id) -> Result<Option<E>> {
        Ok(self.lock()?.get(&id.raw()).cloned())
    }

    fn save(&self, entity: E) -> Result<E> {
        let mut rows = self.lock()?;
        let key = entity.id().raw();
        if !rows.contains_key(&key) {
            return Err(DomainError::NotFound(format!("Fila {} inexistente en {}", entity.id(), E::COLLECTION)));
        }
        rows.insert(key, entity.clone());
        Ok(entity)
    }

    fn delete(&self, id: &E::Id) -> Result<()> {
        let mut rows = self.lock()?;
        if rows.remove(&id.raw()).is_none() {
            return Err(DomainError::NotFound(format!("Fila {} inexistente en {}", id, E::COLLECTION)));
        }
        Ok(())
    }

    fn list(&self, skip: i64, limit: i64) -> Result<Vec<E>> {
        let rows = self.lock()?;
        Ok(rows.values()
               .skip(skip.max(0) as usize)
               .take(limit.max(0).min(rows.len() as i64) as usize)
               .cloned()
               .collect())
    }

    fn count(&self) -> Result<i64> {
        Ok(self.lock()?.len() as i64)
    }
}

/// Almacenamiento en memoria con las seis colecciones del dominio.
#[derive(Default)]
pub struct InMemoryStore {
    companies: MemCollection<Company>,
    departments: MemCollection<Department>,
    employees: MemCollection<Employee>,
    clients: MemCollection<Client>,
    projects: MemCollection<Project>,
    contracts: MemCollection<Contract>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for InMemoryStore {
    fn companies(&self) -> &dyn Collection<Company> {
        &self.companies
    }

    fn departments(&self) -> &dyn Collection<Department> {
        &self.departments
    }

    fn employees(&self) -> &dyn Collection<Employee> {
        &self.employees
    }

    fn clients(&self) -> &dyn Collection<Client> {
        &self.clients
    }

    fn projects(&self) -> &dyn Collection<Project> {
        &self.projects
    }

    fn contracts(&self) -> &dyn Collection<Contract> {
        &self.contracts
    }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn insert_twice_is_conflict() {
    let store = InMemoryStore::new();
    let company = Company::new("Acme", "12345678000190", "Acme SA", "Acme", "contato@acme.com", vec![]).unwrap();
    store.companies().insert(company.clone()).unwrap();
    match store.companies().insert(company) {
      Err(DomainError::Conflict(_)) => {}
      other => panic!("se esperaba Conflict, se obtuvo {:?}", other),
    }
  }

  #[test]
  fn save_of_missing_row_is_not_found() {
    let store = InMemoryStore::new();
    let company = Company::new("Acme", "12345678000190", "Acme SA", "Acme", "contato@acme.com", vec![]).unwrap();
    assert!(matches!(store.companies().save(company), Err(DomainError::NotFound(_))));
  }

  #[test]
  fn list_is_ordered_and_paginated() {
    let store = InMemoryStore::new();
    for i in 0..5 {
      let c = Company::new(&format!("Empresa {}", i), "12345678000190", "Razón", "Fantasía", "c@e.com", vec![]).unwrap();
      store.companies().insert(c).unwrap();
    }
    let all = store.companies().all().unwrap();
    let mut ids: Vec<_> = all.iter().map(|c| c.id().raw()).collect();
    ids.sort();
    assert_eq!(ids, all.iter().map(|c| c.id().raw()).collect::<Vec<_>>());

    let second_page = store.companies().list(2, 2).unwrap();
    assert_eq!(second_page.len(), 2);
    assert_eq!(second_page[0].id(), all[2].id());
  }
}
