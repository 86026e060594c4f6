pub mod forecast;
pub mod insight;
pub mod location;
pub mod settings;

pub use forecast::*;
pub use insight::*;
pub use location::*;
pub use settings::Settings;
