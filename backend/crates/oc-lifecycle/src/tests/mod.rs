mod log_reader;
