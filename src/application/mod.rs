pub mod use_cases;

pub use use_cases::manifest_generator::generate_manifest;
pub use use_cases::site_builder::SiteBuilder;
pub use use_cases::table_renderer::SortLinks;
pub use use_cases::table_view::TableLoader;
