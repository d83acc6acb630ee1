//! 几何内核错误定义

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(u64),
}

impl GeometryError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        GeometryError::InvalidGeometry(message.into())
    }
}

pub type Result<T> = std::result::Result<T, GeometryError>;
