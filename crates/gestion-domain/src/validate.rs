// validate.rs
// Chequeos compartidos por los constructores de entidades.
use crate::{DomainError, Result};

pub(crate) fn texto_obligatorio(valor: &str, campo: &str) -> Result<()> {
  if valor.trim().is_empty() {
    return Err(DomainError::Validation(format!("{} no puede estar vacío", campo)));
  }
  Ok(())
}

pub(crate) fn email_valido(email: &str) -> Result<()> {
  let email = email.trim();
  let (local, dominio) = email.split_once('@')
                              .ok_or_else(|| DomainError::Validation(format!("Email inválido: {}", email)))?;
  if local.is_empty() || dominio.is_empty() || !dominio.contains('.') || email.chars().any(char::is_whitespace) {
    return Err(DomainError::Validation(format!("Email inválido: {}", email)));
  }
  Ok(())
}

pub(crate) fn solo_digitos(valor: &str, campo: &str) -> Result<()> {
  if valor.is_empty() || !valor.chars().all(|c| c.is_ascii_digit()) {
    return Err(DomainError::Validation(format!("{} debe contener sólo dígitos", campo)));
  }
  Ok(())
}

pub(crate) fn no_negativo(valor: f64, campo: &str) -> Result<()> {
  if !valor.is_finite() || valor < 0.0 {
    return Err(DomainError::Validation(format!("{} no puede ser negativo", campo)));
  }
  Ok(())
}
