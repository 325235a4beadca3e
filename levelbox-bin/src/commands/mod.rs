pub mod cat;
pub mod create;
pub mod current;
pub mod list;
pub mod validate;

pub use cat::run as cat;
pub use create::run as create;
pub use current::run as current;
pub use list::run as list;
pub use validate::run as validate;
