pub(crate) mod builder;
pub(crate) mod html;
