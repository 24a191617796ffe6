pub mod app;
pub mod app_state;
pub mod appointment_handlers;
pub mod config;
pub mod db;
pub mod doctor_handlers;
pub mod extract;
pub mod passwords;
pub mod patient_handlers;
pub mod prescription_handlers;
pub mod repo;
pub mod responses;
pub mod session_handlers;
pub mod staff_handlers;
pub mod validation;

pub use app::router;
pub use app_state::AppState;
pub use config::ClinicConfig;
