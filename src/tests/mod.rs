mod routing_tests;
mod utils;
