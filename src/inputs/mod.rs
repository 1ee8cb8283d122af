/// Domain list files:
pub mod domains;
