pub mod enrich_use_case;
pub mod ports;
pub mod train_use_case;
