pub mod sales_controller;
