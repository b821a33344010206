//! HTML page and browser-flow handlers.

pub mod home;
mod redirect;
mod shorten_form;

pub use home::home_handler;
pub use redirect::redirect_handler;
pub use shorten_form::shorten_form_handler;
