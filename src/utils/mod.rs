pub mod logging;
pub mod prompt;
#[cfg(test)]
pub mod test_utils;
pub mod text_field;
pub mod url;
