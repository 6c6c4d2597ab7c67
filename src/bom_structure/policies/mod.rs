mod quantity_mode;

pub use quantity_mode::QuantityMode;
