//! Crate `recon` — reconciliación de relaciones sobre un almacenamiento
//! tipado
//!
//! Este crate define el contrato de almacenamiento que consume el núcleo
//! (`EntityStore`/`Collection`), el motor de diferencias de relaciones
//! (`relation_diff`), el reconciliador (`Reconciler`) con su plan de
//! escritura explícito (`WritePlan`), el ensamblador de vistas detalladas
//! (`DetailAssembler`) y una implementación en memoria útil para pruebas
//! (`InMemoryStore`). La capa `GestionService` orquesta todo para ser
//! invocada desde un handler HTTP u otro transporte.
//!
//! Diseño resumido:
//! - Referencias bidireccionales: el lado dueño es la fuente de verdad y el
//!   reconciliador mantiene la cara inversa en cada alta/cambio/baja.
//! - Política estricta: toda referencia foránea se resuelve antes de emitir
//!   la primera escritura; un id que no resuelve aborta con `NotFound` y el
//!   almacenamiento queda intacto.
//! - Sin transacciones ni aislamiento: el plan se ejecuta como escrituras
//!   independientes en secuencia (limitación aceptada del alcance).
//!
//! Ejemplo rápido:
//! ```rust
//! use recon::service::GestionService;
//! use recon::stubs::InMemoryStore;
//! use std::sync::Arc;
//! let service = GestionService::new(Arc::new(InMemoryStore::new()));
//! assert_eq!(service.count_companies().unwrap(), 0);
//! ```
pub mod assembler;
pub mod diff;
pub mod plan;
pub mod reconciler;
pub mod service;
pub mod store;
pub mod stubs;

pub use assembler::*;
pub use diff::*;
pub use plan::*;
pub use reconciler::*;
pub use service::*;
pub use store::*;
pub use stubs::*;
