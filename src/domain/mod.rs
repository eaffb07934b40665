// Domain layer - Dashboard documents and theme catalog
pub mod dashboard;
pub mod theme;
