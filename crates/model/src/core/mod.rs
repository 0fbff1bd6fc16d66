pub mod data_type;
pub mod record;
pub mod sql_type;
pub mod value;
