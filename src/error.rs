use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")] Database(#[from] sea_orm::DbErr),

    #[error("QR encoding error: {0}")] Qr(#[from] qrcode::types::QrError),

    #[error("Image error: {0}")] Image(#[from] image::ImageError),

    #[error("I/O error: {0}")] Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")] Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
