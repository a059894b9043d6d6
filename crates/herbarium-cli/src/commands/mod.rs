pub mod extract;
pub mod inspect;
pub mod profiles;
