pub mod info;
pub mod vehicles;
