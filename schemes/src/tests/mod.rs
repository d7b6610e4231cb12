pub mod test_suite;
