//! Store sobre PostgreSQL
//!
//! Las implementaciones de cada trait viven junto al trait en su módulo.

use sqlx::PgPool;

use crate::utils::errors::AppError;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Traducir violaciones de restricciones a la taxonomía de errores
pub(crate) fn map_db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        let detail = db_err
            .constraint()
            .map(str::to_string)
            .unwrap_or_else(|| db_err.message().to_string());

        match db_err.code().as_deref() {
            // unique_violation
            Some("23505") => return AppError::DuplicateKey(detail),
            // foreign_key_violation, check_violation
            Some("23503") | Some("23514") => return AppError::Constraint(detail),
            _ => {}
        }
    }
    AppError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = map_db_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
