use std::fmt;

/// Internal failure classification for paths that need to pick a status
/// code without sniffing message strings.
#[derive(Debug)]
pub enum AppError {
    Database(String),
    NotFound(String),
    InvalidRequest(String),
    Unauthorized(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "{} not found", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_missing_thing() {
        let e = AppError::NotFound("QR code qr-42".to_string());
        assert_eq!(e.to_string(), "QR code qr-42 not found");
    }
}
