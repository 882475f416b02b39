pub(crate) mod generator;
pub(crate) mod numeric;
pub(crate) mod session;
