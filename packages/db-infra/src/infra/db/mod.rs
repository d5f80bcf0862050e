pub mod core;

pub use core::{
    build_admin_pool, connect_pool, orchestrate_migration, run_migration, sanitize_db_url,
};
