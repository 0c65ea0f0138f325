use clap::Parser;

/// Initialise logging and parse the command line for a sweep or scenario
/// binary.
pub fn init<T: Parser>() -> T {
    env_logger::init();

    T::parse()
}
