pub mod ajax;
