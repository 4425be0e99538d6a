pub mod index_page;
pub mod manifest_generator;
pub mod site_builder;
pub mod sort_engine;
pub mod table_renderer;
pub mod table_view;
