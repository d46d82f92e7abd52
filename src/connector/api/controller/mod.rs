pub mod chart_controller;
pub mod chat_controller;

pub use chart_controller::{ChartController, ChartView};
pub use chat_controller::ChatController;
