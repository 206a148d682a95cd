pub mod footer;
pub mod tab_bar;
pub mod table;
