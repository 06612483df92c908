//! Driver tests

mod test_driver;

pub(crate) fn sources(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(path, source)| (path.to_string(), source.to_string()))
        .collect()
}
