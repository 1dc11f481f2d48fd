mod engine;
mod interface;
mod middleware;

pub use middleware::BindingParser;
