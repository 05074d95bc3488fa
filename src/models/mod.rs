//! Data structures shared by the registry core and its service layer.

pub mod certificate;
pub mod metadata;
pub mod role;
pub mod university;
