pub mod labels;
pub mod panels;
pub mod plot;
pub mod table;
