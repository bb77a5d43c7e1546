//! Company domain entities.

pub mod kind;
pub mod model;

pub use kind::{CompanyRole, Industry};
pub use model::{Company, CompanyLinks, CreateCompany};
