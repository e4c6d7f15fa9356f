//! Persistencia Diesel para el contrato `EntityStore` de recon.
//! Este crate expone el módulo `schema` y el store Diesel
//! (`DieselEntityStore`) con sus migraciones embebidas. Por defecto se
//! compila el backend SQLite; la feature `pg` habilita Postgres (nunca en
//! tests).

pub mod schema;
mod store_persistence;

pub use store_persistence::{new_from_env, DieselEntityStore, MIGRATIONS};
