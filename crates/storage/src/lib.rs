pub mod repository;
pub mod seed_data;
pub mod sqlite;
