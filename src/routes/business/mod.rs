mod handler;

pub use handler::search_businesses;
