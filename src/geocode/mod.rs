pub(crate) mod cache;
pub(crate) mod nominatim;
pub(crate) mod store;
pub(crate) mod throttle;
