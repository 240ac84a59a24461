pub mod browser;
pub mod traits;

pub use browser::HmallBrowser;
pub use traits::SchedulePage;
