pub mod config;
pub mod error;
pub mod horde;
pub mod ids;
pub mod mapping;
pub mod openai;
pub mod server;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use horde::HordeClient;
pub use ids::{IdGenerator, UuidGenerator};
pub use server::build_router;
