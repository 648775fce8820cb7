pub mod console;
pub mod logging;
pub mod settings;
pub mod version;
