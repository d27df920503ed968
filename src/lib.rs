pub mod equirect;
pub mod export;
pub mod ingest;
pub mod orientation;
pub mod point;
pub mod read_elements;
pub mod record;
pub mod rectangle;
pub mod session;
