pub mod sample_plan;
