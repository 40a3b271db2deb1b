pub mod memory_form;
pub mod static_page;
