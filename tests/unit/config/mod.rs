// Config unit tests

mod test_config;
