//! Client composition root and its event loop

mod driver;
mod state;

pub use driver::run;
pub use state::ClientApp;
