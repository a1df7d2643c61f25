mod config_test;
mod pagination_test;
mod pipeline_test;
mod polling_test;
