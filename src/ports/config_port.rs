//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// `Some(Err(raw))` when the key is present but not a number.
    fn get_double_opt(&self, section: &str, key: &str) -> Option<Result<f64, String>> {
        self.get_string(section, key)
            .map(|raw| raw.trim().parse::<f64>().map_err(|_| raw))
    }
}
