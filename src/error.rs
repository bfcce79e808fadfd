use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

/// Coarse classification used by whatever transport sits in front of the use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    Infrastructure,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Database(e) if is_unique_violation(e) => ErrorKind::Conflict,
            AppError::Database(_) => ErrorKind::Infrastructure,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Unauthorized => ErrorKind::Unauthorized,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Internal | AppError::InternalWithMsg(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, AppError::Database(e) if is_unique_violation(e))
    }

    /// Message safe to hand back to a caller. Logging the full error is left to the boundary.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(e) if is_unique_violation(e) => "Resource already exists (duplicate entry)".to_string(),
            AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => "Internal error".to_string(),
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e.as_database_error() {
        Some(db_err) => {
            if db_err.is_unique_violation() {
                return true;
            }
            let code = db_err.code().unwrap_or_default();
            // 2067 / 1555 = SQLite unique / primary key constraint
            // 23505 = PostgreSQL unique violation
            code == "2067" || code == "1555" || code == "23505"
        }
        None => false,
    }
}
