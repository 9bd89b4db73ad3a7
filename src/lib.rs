// Great-circle distance math
pub mod geo;

// Position report model and validation
pub mod report;

// Per-entity position history
pub mod history;

// Geo-fence model and catalog
pub mod fence;

// Notification model and sink
pub mod notify;

// Geo-fence evaluation engine
pub mod engine;

// TOML configuration
pub mod config;

// HTTP and WebSocket APIs
pub mod api;
