pub mod analyze;
pub mod assumptions;
pub mod financing;
pub mod market;
