pub mod check_handler;

pub use check_handler::handle_check;
