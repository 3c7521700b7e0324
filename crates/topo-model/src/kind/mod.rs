mod context;
pub use context::ContextType;
