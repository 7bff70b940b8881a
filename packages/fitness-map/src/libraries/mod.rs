pub mod location_fetch;
pub mod page_template;
