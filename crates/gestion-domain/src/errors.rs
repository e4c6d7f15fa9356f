// errors.rs
use thiserror::Error;

/// Errores del dominio de gestión.
///
/// - `NotFound`: entidad o referencia a otra colección inexistente.
/// - `Conflict`: intento de alterar un vínculo de propiedad inmutable o de
///   duplicar un valor único.
/// - `Validation`: datos de entrada malformados o relación requerida ausente.
/// - `Unavailable`: fallo de E/S del almacenamiento; se propaga sin reintentos.
#[derive(Debug, Error, Clone)]
pub enum DomainError {
  #[error("No encontrado: {0}")]
  NotFound(String),
  #[error("Conflicto: {0}")]
  Conflict(String),
  #[error("Error de validación: {0}")]
  Validation(String),
  #[error("Almacenamiento no disponible: {0}")]
  Unavailable(String),
}

/// Alias de resultado usado por las APIs del workspace.
pub type Result<T> = std::result::Result<T, DomainError>;
