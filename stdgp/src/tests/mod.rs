mod common;
mod test_variation;
