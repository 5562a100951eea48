pub mod homework;
