pub mod create_category;
pub mod create_superuser;
pub mod initdb;
pub mod serve;

pub use create_category::create_category;
pub use create_superuser::create_superuser;
pub use initdb::init_database;
pub use serve::serve;
