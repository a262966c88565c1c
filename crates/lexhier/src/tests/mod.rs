mod regressions;
pub(crate) mod utils;
