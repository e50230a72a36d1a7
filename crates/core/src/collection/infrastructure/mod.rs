pub mod directory_collector;
