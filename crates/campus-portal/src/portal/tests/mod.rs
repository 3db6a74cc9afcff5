mod common;
mod registration;
