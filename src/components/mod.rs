pub mod diff_table;
pub mod help;
pub mod status_bar;
