
#[cfg(test)]
mod tests {
    use crate::signal::Signal;

    #[test]
    fn test_signal_names() {
        assert_eq!(Signal::Interrupt.to_string(), "interrupt");
        assert_eq!(Signal::Terminate.to_string(), "terminated");
        assert_eq!(Signal::Quit.to_string(), "quit");
        assert_eq!(Signal::Shutdown.to_string().to_uppercase(), "SHUTDOWN");
    }
}
