pub mod accuracy_ops;
pub mod config_ops;
pub mod translate_ops;
